//! Difficulty tiers and per-game balance
//!
//! Static table, captured once when a session starts.

use serde::{Deserialize, Serialize};

use crate::format_multiplier;

/// Difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Easy,
    #[default]
    Normal,
    Hard,
    Insane,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Easy, Tier::Normal, Tier::Hard, Tier::Insane];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Easy => "easy",
            Tier::Normal => "normal",
            Tier::Hard => "hard",
            Tier::Insane => "insane",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Tier::Easy),
            "normal" | "norm" => Some(Tier::Normal),
            "hard" => Some(Tier::Hard),
            "insane" => Some(Tier::Insane),
            _ => None,
        }
    }

    /// Balance profile for this tier
    pub fn profile(&self) -> &'static DifficultyProfile {
        match self {
            Tier::Easy => &EASY,
            Tier::Normal => &NORMAL,
            Tier::Hard => &HARD,
            Tier::Insane => &INSANE,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flight game constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlappyTuning {
    pub tick_ms: u64,
    /// Ticks between obstacle spawns
    pub spawn_every: u64,
    /// Nominal gap height before jitter
    pub gap_base: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnakeTuning {
    pub tick_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TetrisTuning {
    /// Gravity period: one row per tick
    pub tick_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadTuning {
    pub tick_ms: u64,
    /// Ticks between obstacle spawns
    pub spawn_every: u64,
}

/// Tier profile: score multiplier plus every game's tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    pub tier: Tier,
    /// Score multiplier in hundredths (125 = ×1.25)
    pub multiplier_pct: u32,
    pub flappy: FlappyTuning,
    pub snake: SnakeTuning,
    pub tetris: TetrisTuning,
    pub road: RoadTuning,
}

impl DifficultyProfile {
    /// `normal ×1.25`
    pub fn label(&self) -> String {
        format!("{} {}", self.tier, format_multiplier(self.multiplier_pct))
    }
}

static EASY: DifficultyProfile = DifficultyProfile {
    tier: Tier::Easy,
    multiplier_pct: 100,
    flappy: FlappyTuning { tick_ms: 80, spawn_every: 26, gap_base: 6 },
    snake: SnakeTuning { tick_ms: 140 },
    tetris: TetrisTuning { tick_ms: 900 },
    road: RoadTuning { tick_ms: 110, spawn_every: 12 },
};

static NORMAL: DifficultyProfile = DifficultyProfile {
    tier: Tier::Normal,
    multiplier_pct: 125,
    flappy: FlappyTuning { tick_ms: 65, spawn_every: 22, gap_base: 6 },
    snake: SnakeTuning { tick_ms: 120 },
    tetris: TetrisTuning { tick_ms: 750 },
    road: RoadTuning { tick_ms: 95, spawn_every: 9 },
};

static HARD: DifficultyProfile = DifficultyProfile {
    tier: Tier::Hard,
    multiplier_pct: 160,
    flappy: FlappyTuning { tick_ms: 55, spawn_every: 18, gap_base: 6 },
    snake: SnakeTuning { tick_ms: 95 },
    tetris: TetrisTuning { tick_ms: 550 },
    road: RoadTuning { tick_ms: 80, spawn_every: 7 },
};

static INSANE: DifficultyProfile = DifficultyProfile {
    tier: Tier::Insane,
    multiplier_pct: 200,
    flappy: FlappyTuning { tick_ms: 45, spawn_every: 14, gap_base: 5 },
    snake: SnakeTuning { tick_ms: 80 },
    tetris: TetrisTuning { tick_ms: 420 },
    road: RoadTuning { tick_ms: 65, spawn_every: 5 },
};
