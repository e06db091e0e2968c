//! ASCII Arcade - four text-grid arcade games on one session core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (session lifecycle, scoring, the four engines)
//! - `tuning`: Difficulty tiers and per-game balance constants
//! - `highscores`: Per-game top 10 leaderboards
//! - `persistence`: Leaderboard file store with export/import
//! - `platform`: Terminal input mapping, wall-clock scheduling, active-session registry
//! - `renderer`: Terminal render sink for text buffers and the HUD
//! - `settings`: TOML configuration

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{HighScores, Leaderboards};
pub use settings::Settings;
pub use tuning::{DifficultyProfile, Tier};

/// Game configuration constants
pub mod consts {
    /// Elapsed-time clock period (ms)
    pub const CLOCK_PERIOD_MS: u64 = 1000;

    /// Flappy field
    pub const FLAPPY_WIDTH: usize = 60;
    pub const FLAPPY_HEIGHT: usize = 20;
    /// First ground row; the actor crashes on reaching it
    pub const FLAPPY_GROUND: usize = FLAPPY_HEIGHT - 2;
    pub const FLAPPY_ACTOR_COLUMN: i32 = 8;
    /// Downward acceleration per tick (rows/tick²)
    pub const FLAPPY_GRAVITY: f64 = 0.35;
    /// Velocity set by a jump (rows/tick, negative is up)
    pub const FLAPPY_JUMP_VELOCITY: f64 = -1.8;
    /// Rows kept clear above and below a gap when placing it
    pub const FLAPPY_GAP_MARGIN: usize = 3;
    pub const FLAPPY_MIN_GAP: usize = 3;

    /// Snake play area (interior, border drawn around it)
    pub const SNAKE_WIDTH: i32 = 28;
    pub const SNAKE_HEIGHT: i32 = 18;
    pub const SNAKE_FOOD_BONUS: u64 = 5;

    /// Tetris well
    pub const TETRIS_WIDTH: usize = 10;
    pub const TETRIS_HEIGHT: usize = 18;
    pub const TETRIS_POINTS_PER_LINE: u64 = 10;

    /// Road field
    pub const ROAD_WIDTH: i32 = 27;
    pub const ROAD_HEIGHT: i32 = 22;
    /// Ticks between lane drift decisions
    pub const ROAD_DRIFT_PERIOD: u64 = 25;
    pub const ROAD_MIN_LANE_WIDTH: i32 = 9;
    pub const ROAD_MAX_LANE_WIDTH: i32 = 17;
    /// Probability that a drift narrows the lane
    pub const ROAD_NARROW_CHANCE: f64 = 0.6;
    /// Horizontal distance beyond which an obstacle level with the car counts as dodged
    pub const ROAD_DODGE_DISTANCE: i32 = 2;
}

/// Scale a base score by a multiplier expressed in hundredths, rounding half up.
/// Saturates at `u64::MAX`.
#[inline]
pub fn apply_multiplier(base: u64, multiplier_pct: u32) -> u64 {
    let scaled = (base as u128 * multiplier_pct as u128 + 50) / 100;
    u64::try_from(scaled).unwrap_or(u64::MAX)
}

/// Format a hundredths multiplier as `×1.25`
pub fn format_multiplier(multiplier_pct: u32) -> String {
    format!("×{}.{:02}", multiplier_pct / 100, multiplier_pct % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_multiplier_rounds_half_up() {
        assert_eq!(apply_multiplier(20, 125), 25);
        assert_eq!(apply_multiplier(30, 200), 60);
        assert_eq!(apply_multiplier(1, 125), 1);
        assert_eq!(apply_multiplier(2, 125), 3); // 2.5 -> 3
        assert_eq!(apply_multiplier(0, 160), 0);
    }

    #[test]
    fn test_apply_multiplier_saturates() {
        assert_eq!(apply_multiplier(u64::MAX, 100), u64::MAX);
        assert_eq!(apply_multiplier(u64::MAX, 200), u64::MAX);

        let mut session = sim::Session::new(tuning::Tier::Insane, sim::Mode::Marathon, 1);
        session.add_score(u64::MAX);
        session.add_score(1);
        assert_eq!(session.base_score(), u64::MAX);
        assert_eq!(session.final_score(), u64::MAX);
    }

    #[test]
    fn test_format_multiplier() {
        assert_eq!(format_multiplier(100), "×1.00");
        assert_eq!(format_multiplier(160), "×1.60");
        assert_eq!(format_multiplier(200), "×2.00");
    }

    proptest::proptest! {
        #[test]
        fn prop_final_score_is_nearest_rounding(base in 0u64..1_000_000, tier in 0usize..4) {
            let pct = tuning::Tier::ALL[tier].profile().multiplier_pct;
            let exact = base * pct as u64;
            let total = apply_multiplier(base, pct);
            proptest::prop_assert!(total * 100 + 50 > exact);
            proptest::prop_assert!(total * 100 <= exact + 50);
            proptest::prop_assert!(total >= base);
        }
    }
}
