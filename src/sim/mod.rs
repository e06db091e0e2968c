//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed discrete tick only, driven from outside via `advance_tick`/`advance_clock`
//! - Session-seeded RNG only
//! - No rendering, storage or platform dependencies

pub mod engine;
pub mod flappy;
pub mod grid;
pub mod rng;
pub mod road;
pub mod session;
pub mod snake;
pub mod tetris;

pub use engine::{Engine, GameKind, Input};
pub use flappy::FlappyEngine;
pub use grid::TextGrid;
pub use rng::GameRng;
pub use road::RoadEngine;
pub use session::{
    ActivityRegistry, Cause, Controller, Hud, InputOutcome, Lifecycle, Mode, Session, Status,
    TerminationEvent,
};
pub use snake::SnakeEngine;
pub use tetris::TetrisEngine;
