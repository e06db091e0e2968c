//! Session state and the generic session controller
//!
//! The controller owns the lifecycle (`Idle → Ready → Running ⇄ Paused →
//! Terminated`), the frame and elapsed-second counters, and scoring. It has no
//! timers of its own: a driver calls [`Controller::advance_tick`] every
//! `tick_interval_ms` and [`Controller::advance_clock`] every second.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::engine::{Engine, GameKind, Input};
use super::grid::TextGrid;
use super::rng::GameRng;
use crate::tuning::Tier;
use crate::{apply_multiplier, format_multiplier};

/// Whether a finished run may be recorded on the leaderboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Marathon,
    Practice,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Marathon => "marathon",
            Mode::Practice => "practice",
        }
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cause {
    /// Stopped by the player
    Finished,
    /// Ended by the engine (collision, blocked spawn)
    Crashed,
}

impl Cause {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cause::Finished => "finished",
            Cause::Crashed => "crashed",
        }
    }
}

/// Controller lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// No run yet (or a tier preview)
    Idle,
    /// Started, waiting for the engine's grace condition
    Ready,
    Running,
    Paused,
    Terminated(Cause),
}

/// HUD status field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ready,
    Playing,
    Paused,
    Finished,
    Crashed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Ready => "ready",
            Status::Playing => "playing",
            Status::Paused => "paused",
            Status::Finished => "finished",
            Status::Crashed => "crashed",
        }
    }
}

/// Per-run state shared between controller and engine
#[derive(Debug, Clone)]
pub struct Session {
    tier: Tier,
    mode: Mode,
    tick_interval_ms: u64,
    frame: u64,
    elapsed_secs: u64,
    base_score: u64,
    pending_termination: Option<Cause>,
    rng: GameRng,
}

impl Session {
    pub fn new(tier: Tier, mode: Mode, seed: u32) -> Self {
        Self {
            tier,
            mode,
            tick_interval_ms: 100,
            frame: 0,
            elapsed_secs: 0,
            base_score: 0,
            pending_termination: None,
            rng: GameRng::new(seed),
        }
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn seed(&self) -> u32 {
        self.rng.seed()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn base_score(&self) -> u64 {
        self.base_score
    }

    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms
    }

    pub fn set_tick_interval_ms(&mut self, ms: u64) {
        self.tick_interval_ms = ms.max(1);
    }

    /// Advance the tick counter; called by the controller before each step
    pub(crate) fn next_frame(&mut self) {
        self.frame += 1;
    }

    pub fn add_score(&mut self, points: u64) {
        self.base_score = self.base_score.saturating_add(points);
    }

    pub fn rng(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    /// Ask the controller to end the run after the current step.
    /// The first request wins.
    pub fn request_termination(&mut self, cause: Cause) {
        if self.pending_termination.is_none() {
            self.pending_termination = Some(cause);
        }
    }

    pub fn pending_termination(&self) -> Option<Cause> {
        self.pending_termination
    }

    pub fn final_score(&self) -> u64 {
        apply_multiplier(self.base_score, self.tier.profile().multiplier_pct)
    }
}

/// Emitted exactly once when a started session ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminationEvent {
    pub game: GameKind,
    pub cause: Cause,
    pub base_score: u64,
    pub final_score: u64,
    pub tier: Tier,
    pub mode: Mode,
    pub seed: u32,
}

impl TerminationEvent {
    /// Game-over block appended below the final board
    pub fn summary(&self) -> Vec<String> {
        let profile = self.tier.profile();
        vec![
            format!("Game Over — {}.", self.cause.as_str()),
            format!("Base: {}", self.base_score),
            format!("Difficulty: {}", profile.label()),
            format!("Final: {}", self.final_score),
            format!("Seed: {}", self.seed),
        ]
    }
}

/// Plain HUD values, refreshed by the driver after each tick and clock advance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    pub status: Status,
    pub elapsed_secs: u64,
    pub base_score: u64,
    /// `normal ×1.25`
    pub multiplier: String,
    /// `20 → ×1.25`
    pub score_line: String,
    pub total: u64,
}

/// Registry of running games, consulted by input-suppression outside the core
pub trait ActivityRegistry {
    fn register(&self, game: GameKind);
    fn deregister(&self, game: GameKind);
}

/// Result of routing one key press
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InputOutcome {
    pub handled: bool,
    pub termination: Option<TerminationEvent>,
}

/// Generic session controller for one game instance
pub struct Controller<E: Engine = Box<dyn Engine>> {
    engine: E,
    tier: Tier,
    mode: Mode,
    lifecycle: Lifecycle,
    session: Session,
    last_termination: Option<TerminationEvent>,
    registry: Option<Rc<dyn ActivityRegistry>>,
}

impl<E: Engine> Controller<E> {
    /// Create an idle controller and render the tier preview
    pub fn new(engine: E, tier: Tier, mode: Mode) -> Self {
        let mut controller = Self {
            engine,
            tier,
            mode,
            lifecycle: Lifecycle::Idle,
            session: Session::new(tier, mode, 0),
            last_termination: None,
            registry: None,
        };
        controller.preview();
        controller
    }

    pub fn with_registry(mut self, registry: Rc<dyn ActivityRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn last_termination(&self) -> Option<&TerminationEvent> {
        self.last_termination.as_ref()
    }

    /// True while a run is started and not yet terminated
    pub fn is_active(&self) -> bool {
        matches!(
            self.lifecycle,
            Lifecycle::Ready | Lifecycle::Running | Lifecycle::Paused
        )
    }

    pub fn tick_interval_ms(&self) -> u64 {
        self.session.tick_interval_ms()
    }

    /// Change the tier. Ignored by a running session; re-inits the preview otherwise.
    pub fn select_tier(&mut self, tier: Tier) {
        self.tier = tier;
        if !self.is_active() {
            self.preview();
        }
    }

    /// Change the mode for the next start
    pub fn select_mode(&mut self, mode: Mode) {
        self.mode = mode;
        if !self.is_active() {
            self.preview();
        }
    }

    fn preview(&mut self) {
        self.session = Session::new(self.tier, self.mode, 0);
        self.engine.init(&mut self.session, self.tier.profile());
        self.lifecycle = Lifecycle::Idle;
        self.last_termination = None;
    }

    /// Start with a freshly drawn seed. No-op while active.
    pub fn start(&mut self) -> bool {
        self.start_with_seed(GameRng::fresh_seed())
    }

    /// Start a reproducible run. No-op while active.
    pub fn start_with_seed(&mut self, seed: u32) -> bool {
        if self.is_active() {
            return false;
        }

        self.session = Session::new(self.tier, self.mode, seed);
        self.last_termination = None;
        self.engine.init(&mut self.session, self.tier.profile());
        self.lifecycle = Lifecycle::Ready;
        if let Some(registry) = &self.registry {
            registry.register(self.engine.kind());
        }
        log::info!(
            "{} started: tier={} mode={} seed={} tick={}ms",
            self.engine.kind(),
            self.tier,
            self.mode.as_str(),
            seed,
            self.session.tick_interval_ms()
        );

        if self.session.pending_termination().is_some() {
            self.finish_pending();
        } else {
            self.arm_if_ready();
        }
        true
    }

    /// Stop the run (cause `finished`). No-op when not active.
    pub fn stop(&mut self) -> Option<TerminationEvent> {
        if !self.is_active() {
            return None;
        }
        Some(self.terminate(Cause::Finished))
    }

    /// Toggle pause. Returns the new paused state; no-op when not active.
    pub fn toggle_pause(&mut self) -> bool {
        self.lifecycle = match self.lifecycle {
            Lifecycle::Ready | Lifecycle::Running => Lifecycle::Paused,
            Lifecycle::Paused => {
                if self.engine.is_armed() {
                    Lifecycle::Running
                } else {
                    Lifecycle::Ready
                }
            }
            other => other,
        };
        self.lifecycle == Lifecycle::Paused
    }

    /// One fixed tick: advance the frame counter and step the engine once
    pub fn advance_tick(&mut self) -> Option<TerminationEvent> {
        if !matches!(self.lifecycle, Lifecycle::Ready | Lifecycle::Running) {
            return None;
        }

        self.session.next_frame();
        self.engine.step(&mut self.session);

        if self.session.pending_termination().is_some() {
            return self.finish_pending();
        }
        self.arm_if_ready();
        None
    }

    /// One elapsed second
    pub fn advance_clock(&mut self) {
        if matches!(self.lifecycle, Lifecycle::Ready | Lifecycle::Running) {
            self.session.elapsed_secs += 1;
        }
    }

    /// Route a key press. Pause and stop are handled here; the rest go to the engine.
    pub fn input(&mut self, input: Input) -> InputOutcome {
        if !self.is_active() {
            return InputOutcome::default();
        }

        match input {
            Input::Pause => {
                self.toggle_pause();
                InputOutcome {
                    handled: true,
                    termination: None,
                }
            }
            Input::Stop => InputOutcome {
                handled: true,
                termination: self.stop(),
            },
            _ if self.lifecycle == Lifecycle::Paused => InputOutcome::default(),
            _ => {
                let handled = self.engine.on_input(input, &mut self.session);
                let termination = if self.session.pending_termination().is_some() {
                    self.finish_pending()
                } else {
                    self.arm_if_ready();
                    None
                };
                InputOutcome {
                    handled,
                    termination,
                }
            }
        }
    }

    pub fn status(&self) -> Status {
        match self.lifecycle {
            Lifecycle::Idle | Lifecycle::Ready => Status::Ready,
            Lifecycle::Running => Status::Playing,
            Lifecycle::Paused => Status::Paused,
            Lifecycle::Terminated(Cause::Finished) => Status::Finished,
            Lifecycle::Terminated(Cause::Crashed) => Status::Crashed,
        }
    }

    pub fn hud(&self) -> Hud {
        let profile = self.session.tier().profile();
        let base_score = self.session.base_score();
        Hud {
            status: self.status(),
            elapsed_secs: self.session.elapsed_secs(),
            base_score,
            multiplier: profile.label(),
            score_line: format!("{} → {}", base_score, format_multiplier(profile.multiplier_pct)),
            total: self.session.final_score(),
        }
    }

    /// Text buffer for the render sink: the ready banner before the first tick,
    /// the board afterwards, plus the game-over summary once terminated.
    pub fn screen(&self) -> TextGrid {
        if self.session.frame() == 0 && !matches!(self.lifecycle, Lifecycle::Terminated(_)) {
            return self.banner();
        }

        let board = self.engine.render();
        match &self.last_termination {
            Some(event) => {
                let mut lines = board.lines();
                lines.push(String::new());
                lines.extend(event.summary());
                TextGrid::from_lines(&lines)
            }
            None => board,
        }
    }

    fn banner(&self) -> TextGrid {
        let kind = self.engine.kind();
        TextGrid::from_lines(&[
            format!("ASCII {} ready.", kind.title()),
            format!("Difficulty: {}", self.session.tier().profile().label()),
            format!("{} · P pause · Q stop.", self.engine.controls()),
        ])
    }

    fn arm_if_ready(&mut self) {
        if self.lifecycle == Lifecycle::Ready && self.engine.is_armed() {
            self.lifecycle = Lifecycle::Running;
            log::debug!("{} running at frame {}", self.engine.kind(), self.session.frame());
        }
    }

    fn finish_pending(&mut self) -> Option<TerminationEvent> {
        let cause = self.session.pending_termination.take()?;
        Some(self.terminate(cause))
    }

    fn terminate(&mut self, cause: Cause) -> TerminationEvent {
        self.session.pending_termination = None;
        self.lifecycle = Lifecycle::Terminated(cause);
        if let Some(registry) = &self.registry {
            registry.deregister(self.engine.kind());
        }

        let event = TerminationEvent {
            game: self.engine.kind(),
            cause,
            base_score: self.session.base_score(),
            final_score: self.session.final_score(),
            tier: self.session.tier(),
            mode: self.session.mode(),
            seed: self.session.seed(),
        };
        log::info!(
            "{} {}: base={} final={} tier={} seed={}",
            event.game,
            cause.as_str(),
            event.base_score,
            event.final_score,
            event.tier,
            event.seed
        );
        self.last_termination = Some(event.clone());
        event
    }
}
