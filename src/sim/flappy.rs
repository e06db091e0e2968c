//! Flight game: one actor under gravity, gap columns scrolling left
//!
//! Starts in a waiting sub-state: no gravity and no spawning until the first
//! jump, so a run cannot end before the player has touched a key.

use super::engine::{Engine, GameKind, Input};
use super::grid::TextGrid;
use super::session::{Cause, Session};
use crate::consts::*;
use crate::tuning::{DifficultyProfile, FlappyTuning, Tier};

/// The flying actor
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub x: i32,
    /// Row position (continuous, 0 is the top)
    pub y: f64,
    /// Rows per tick, positive is down
    pub vy: f64,
}

impl Actor {
    /// Row used for collision and drawing
    pub fn row(&self) -> i32 {
        self.y.round() as i32
    }
}

/// A wall column with a passable gap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Obstacle {
    pub x: i32,
    pub gap_y: usize,
    pub gap_h: usize,
}

impl Obstacle {
    pub fn blocks_row(&self, row: i32) -> bool {
        row < self.gap_y as i32 || row >= (self.gap_y + self.gap_h) as i32
    }
}

/// Pre-input grace sub-state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flight {
    Waiting,
    Flying,
}

#[derive(Debug, Clone)]
pub struct FlappyEngine {
    pub actor: Actor,
    pub obstacles: Vec<Obstacle>,
    pub flight: Flight,
    /// Steps taken since the first jump
    pub flight_ticks: u64,
    tuning: FlappyTuning,
}

impl Default for FlappyEngine {
    fn default() -> Self {
        Self {
            actor: Self::start_actor(),
            obstacles: Vec::new(),
            flight: Flight::Waiting,
            flight_ticks: 0,
            tuning: Tier::Normal.profile().flappy,
        }
    }
}

impl FlappyEngine {
    fn start_actor() -> Actor {
        Actor {
            x: FLAPPY_ACTOR_COLUMN,
            y: (FLAPPY_HEIGHT / 2) as f64,
            vy: 0.0,
        }
    }

    /// Spawn a column at the right edge with a jittered gap
    fn spawn_obstacle(&mut self, session: &mut Session) {
        let rng = session.rng();
        let mut gap_h = self.tuning.gap_base as i64;
        if rng.chance(0.25) {
            gap_h -= 1;
        }
        if rng.chance(0.25) {
            gap_h += 1;
        }
        let gap_h = (gap_h.max(FLAPPY_MIN_GAP as i64)) as usize;

        let span = FLAPPY_GROUND.saturating_sub(FLAPPY_GAP_MARGIN + gap_h);
        let gap_y = (rng.next_f64() * span as f64).floor() as usize + FLAPPY_GAP_MARGIN;

        log::debug!("flappy obstacle gap_y={} gap_h={}", gap_y, gap_h);
        self.obstacles.push(Obstacle {
            x: FLAPPY_WIDTH as i32 - 1,
            gap_y,
            gap_h,
        });
    }
}

impl Engine for FlappyEngine {
    fn kind(&self) -> GameKind {
        GameKind::Flappy
    }

    fn init(&mut self, session: &mut Session, profile: &DifficultyProfile) {
        self.tuning = profile.flappy;
        self.actor = Self::start_actor();
        self.obstacles.clear();
        self.flight = Flight::Waiting;
        self.flight_ticks = 0;
        session.set_tick_interval_ms(self.tuning.tick_ms);
    }

    fn step(&mut self, session: &mut Session) {
        if self.flight == Flight::Waiting {
            return;
        }
        self.flight_ticks += 1;

        self.actor.vy += FLAPPY_GRAVITY;
        self.actor.y += self.actor.vy;
        let row = self.actor.row();
        if row < 0 || row >= FLAPPY_GROUND as i32 {
            session.request_termination(Cause::Crashed);
            return;
        }

        if (self.flight_ticks - 1) % self.tuning.spawn_every == 0 {
            self.spawn_obstacle(session);
        }

        let mut passed = 0;
        for obstacle in &mut self.obstacles {
            obstacle.x -= 1;
            if obstacle.x == self.actor.x - 1 {
                passed += 1;
            }
        }
        session.add_score(passed);

        if self
            .obstacles
            .iter()
            .any(|o| o.x == self.actor.x && o.blocks_row(row))
        {
            session.request_termination(Cause::Crashed);
            return;
        }

        self.obstacles.retain(|o| o.x >= 0);
    }

    fn on_input(&mut self, input: Input, _session: &mut Session) -> bool {
        match input {
            Input::Up | Input::Action => {
                self.actor.vy = FLAPPY_JUMP_VELOCITY;
                self.flight = Flight::Flying;
                true
            }
            _ => false,
        }
    }

    fn is_armed(&self) -> bool {
        self.flight == Flight::Flying
    }

    fn render(&self) -> TextGrid {
        let mut grid = TextGrid::new(FLAPPY_WIDTH, FLAPPY_HEIGHT);
        for x in 0..FLAPPY_WIDTH as i32 {
            for y in FLAPPY_GROUND..FLAPPY_HEIGHT {
                grid.put(x, y as i32, '_');
            }
        }
        for obstacle in &self.obstacles {
            for y in 0..FLAPPY_GROUND as i32 {
                if obstacle.blocks_row(y) {
                    grid.put(obstacle.x, y, '|');
                }
            }
        }
        grid.put(self.actor.x, self.actor.row(), '>');
        grid
    }

    fn controls(&self) -> &'static str {
        "Space/↑ jump"
    }
}
