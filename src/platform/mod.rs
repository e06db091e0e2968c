//! Platform abstraction layer
//!
//! Handles the terminal side of the game:
//! - Key mapping into the recognised input set
//! - Wall-clock scheduling of ticks and the one-second clock
//! - The "any session active" registry

pub mod clock;
pub mod input;
pub mod registry;

pub use clock::{Due, Scheduler};
pub use input::{Command, map_key};
pub use registry::ActiveRegistry;
