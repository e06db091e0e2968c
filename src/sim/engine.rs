//! Engine contract shared by the four games

use serde::{Deserialize, Serialize};

use super::grid::TextGrid;
use super::session::Session;
use super::{FlappyEngine, RoadEngine, SnakeEngine, TetrisEngine};
use crate::tuning::DifficultyProfile;

/// Recognised key presses. Everything else is dropped by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Input {
    Up,
    Down,
    Left,
    Right,
    /// Jump (flappy) / rotate (tetris)
    Action,
    Pause,
    Stop,
}

/// Which game an engine plays; also the leaderboard key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Flappy,
    Snake,
    Tetris,
    Road,
}

impl GameKind {
    pub const ALL: [GameKind; 4] = [GameKind::Flappy, GameKind::Snake, GameKind::Tetris, GameKind::Road];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Flappy => "flappy",
            GameKind::Snake => "snake",
            GameKind::Tetris => "tetris",
            GameKind::Road => "road",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "flappy" => Some(GameKind::Flappy),
            "snake" => Some(GameKind::Snake),
            "tetris" => Some(GameKind::Tetris),
            "road" => Some(GameKind::Road),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            GameKind::Flappy => "Flappy",
            GameKind::Snake => "Snake",
            GameKind::Tetris => "Tetris",
            GameKind::Road => "Road",
        }
    }

    /// Fresh engine for this game
    pub fn engine(&self) -> Box<dyn Engine> {
        match self {
            GameKind::Flappy => Box::new(FlappyEngine::default()),
            GameKind::Snake => Box::new(SnakeEngine::default()),
            GameKind::Tetris => Box::new(TetrisEngine::default()),
            GameKind::Road => Box::new(RoadEngine::default()),
        }
    }
}

impl std::fmt::Display for GameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A deterministic step simulation driven by the session controller.
///
/// Engines never own timing. `init` runs on every start (and on tier preview),
/// `step` once per tick while the session is ready or running, `on_input` for
/// each movement/action key. Termination is requested through
/// [`Session::request_termination`].
pub trait Engine {
    fn kind(&self) -> GameKind;

    /// Reset all game state and set the session's tick interval
    fn init(&mut self, session: &mut Session, profile: &DifficultyProfile);

    fn step(&mut self, session: &mut Session);

    /// Returns whether the input was consumed
    fn on_input(&mut self, input: Input, session: &mut Session) -> bool;

    /// Grace condition for leaving the ready state
    fn is_armed(&self) -> bool {
        true
    }

    /// Current board
    fn render(&self) -> TextGrid;

    /// One-line control help for the ready screen
    fn controls(&self) -> &'static str;
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn kind(&self) -> GameKind {
        (**self).kind()
    }

    fn init(&mut self, session: &mut Session, profile: &DifficultyProfile) {
        (**self).init(session, profile)
    }

    fn step(&mut self, session: &mut Session) {
        (**self).step(session)
    }

    fn on_input(&mut self, input: Input, session: &mut Session) -> bool {
        (**self).on_input(input, session)
    }

    fn is_armed(&self) -> bool {
        (**self).is_armed()
    }

    fn render(&self) -> TextGrid {
        (**self).render()
    }

    fn controls(&self) -> &'static str {
        (**self).controls()
    }
}
