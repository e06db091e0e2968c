//! High score leaderboard system
//!
//! One top 10 board per game. Only marathon runs are eligible.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::sim::{GameKind, Mode, TerminationEvent};
use crate::tuning::Tier;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;
/// Maximum display name length
pub const MAX_NAME_LEN: usize = 10;
/// Name recorded when the prompt is left empty or cancelled
pub const DEFAULT_NAME: &str = "ANON";

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    /// Final (multiplied) score
    pub score: u64,
    pub difficulty: Tier,
    /// Session seed, for replaying the run
    pub seed: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: u64,
}

/// High score leaderboard for one game
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new entry (if it qualifies).
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_entry(&mut self, entry: HighScoreEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }

        // Find insertion point (sorted descending by score, ties keep earlier entries first)
        let pos = self.entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        // Trim to max size
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Re-sort and trim, for boards loaded from outside
    pub fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Table rows: rank, name, score, difficulty
    pub fn table(&self) -> Vec<String> {
        if self.entries.is_empty() {
            return vec!["—".to_string()];
        }
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{:>2}  {:<10}  {:>8}  {}", i + 1, e.name, e.score, e.difficulty))
            .collect()
    }
}

/// Trim, upper-case and cap a player name; empty or cancelled becomes `ANON`
pub fn normalize_name(raw: Option<&str>) -> String {
    let name: String = raw
        .unwrap_or("")
        .trim()
        .to_uppercase()
        .chars()
        .take(MAX_NAME_LEN)
        .collect();
    if name.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        name
    }
}

/// Current Unix time in milliseconds
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Boards for every game, keyed by game
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Leaderboards {
    pub boards: BTreeMap<GameKind, HighScores>,
}

impl Leaderboards {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(&self, game: GameKind) -> Option<&HighScores> {
        self.boards.get(&game)
    }

    pub fn board_mut(&mut self, game: GameKind) -> &mut HighScores {
        self.boards.entry(game).or_default()
    }

    /// Whether a finished run may ask for a name: marathon only, and the score must qualify
    pub fn is_eligible(&self, event: &TerminationEvent) -> bool {
        if event.mode != Mode::Marathon {
            return false;
        }
        match self.boards.get(&event.game) {
            Some(board) => board.qualifies(event.final_score),
            None => event.final_score > 0,
        }
    }

    /// Rank a finished run would take, shown before asking for a name
    pub fn potential_rank(&self, event: &TerminationEvent) -> Option<usize> {
        if event.mode != Mode::Marathon {
            return None;
        }
        match self.boards.get(&event.game) {
            Some(board) => board.potential_rank(event.final_score),
            None => (event.final_score > 0).then_some(1),
        }
    }

    /// Record a finished run. `name` is the raw prompt answer (None when cancelled).
    /// Returns the rank achieved, or None when the run is not eligible.
    pub fn record(
        &mut self,
        event: &TerminationEvent,
        name: Option<&str>,
        timestamp: u64,
    ) -> Option<usize> {
        if !self.is_eligible(event) {
            return None;
        }
        let entry = HighScoreEntry {
            name: normalize_name(name),
            score: event.final_score,
            difficulty: event.tier,
            seed: event.seed,
            timestamp,
        };
        let rank = self.board_mut(event.game).add_entry(entry);
        if let Some(rank) = rank {
            log::info!("{} high score #{}: {}", event.game, rank, event.final_score);
        }
        rank
    }

    /// Clear one game's board
    pub fn reset(&mut self, game: GameKind) {
        self.boards.remove(&game);
        log::info!("{} leaderboard reset", game);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Cause, Controller};

    fn entry(score: u64) -> HighScoreEntry {
        HighScoreEntry {
            name: "AAA".to_string(),
            score,
            difficulty: Tier::Normal,
            seed: 1,
            timestamp: 0,
        }
    }

    fn event(game: GameKind, mode: Mode, final_score: u64) -> TerminationEvent {
        TerminationEvent {
            game,
            cause: Cause::Crashed,
            base_score: final_score,
            final_score,
            tier: Tier::Easy,
            mode,
            seed: 42,
        }
    }

    #[test]
    fn test_qualifies() {
        let mut board = HighScores::new();
        assert!(!board.qualifies(0));
        assert!(board.qualifies(1));
        for s in 1..=10 {
            board.add_entry(entry(s * 10));
        }
        assert_eq!(board.entries.len(), 10);
        assert!(!board.qualifies(10));
        assert!(board.qualifies(11));
        assert_eq!(board.potential_rank(1000), Some(1));
        assert_eq!(board.potential_rank(5), None);
    }

    #[test]
    fn test_add_keeps_top_ten_sorted() {
        let mut board = HighScores::new();
        for s in [50, 10, 90, 30, 70, 20, 80, 40, 60, 100, 55, 5] {
            board.add_entry(entry(s));
        }
        let scores: Vec<u64> = board.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![100, 90, 80, 70, 60, 55, 50, 40, 30, 20]);
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name(Some("  bob ")), "BOB");
        assert_eq!(normalize_name(Some("abcdefghijklmnop")), "ABCDEFGHIJ");
        assert_eq!(normalize_name(Some("   ")), "ANON");
        assert_eq!(normalize_name(None), "ANON");
    }

    #[test]
    fn test_practice_never_recorded() {
        let mut boards = Leaderboards::new();
        assert_eq!(boards.record(&event(GameKind::Snake, Mode::Practice, 500), Some("x"), 0), None);
        assert!(boards.board(GameKind::Snake).is_none());
    }

    #[test]
    fn test_record_per_game() {
        let mut boards = Leaderboards::new();
        assert_eq!(boards.record(&event(GameKind::Snake, Mode::Marathon, 25), None, 7), Some(1));
        assert_eq!(boards.record(&event(GameKind::Road, Mode::Marathon, 0), None, 7), None);

        let snake = boards.board(GameKind::Snake).unwrap();
        assert_eq!(snake.entries[0].name, "ANON");
        assert_eq!(snake.entries[0].seed, 42);
        assert_eq!(snake.entries[0].difficulty, Tier::Easy);
        assert!(boards.board(GameKind::Road).is_none());

        boards.reset(GameKind::Snake);
        assert!(boards.board(GameKind::Snake).is_none());
    }

    #[test]
    fn test_potential_rank_matches_record() {
        let mut boards = Leaderboards::new();
        assert_eq!(boards.potential_rank(&event(GameKind::Snake, Mode::Marathon, 0)), None);
        assert_eq!(boards.potential_rank(&event(GameKind::Snake, Mode::Practice, 90)), None);

        let first = event(GameKind::Snake, Mode::Marathon, 40);
        assert_eq!(boards.potential_rank(&first), Some(1));
        assert_eq!(boards.record(&first, None, 1), Some(1));

        let second = event(GameKind::Snake, Mode::Marathon, 30);
        assert_eq!(boards.potential_rank(&second), Some(2));
        assert_eq!(boards.record(&second, None, 2), Some(2));
    }

    #[test]
    fn test_stopped_marathon_run_is_recordable() {
        let mut controller = Controller::new(GameKind::Road.engine(), Tier::Easy, Mode::Marathon);
        controller.start_with_seed(3);
        for _ in 0..3 {
            assert!(controller.advance_tick().is_none());
        }
        let stopped = controller.stop().unwrap();
        assert_eq!(stopped.cause, Cause::Finished);

        let mut boards = Leaderboards::new();
        assert_eq!(boards.potential_rank(&stopped), Some(1));
        assert_eq!(boards.record(&stopped, Some("ray"), 5), Some(1));
        assert_eq!(boards.board(GameKind::Road).unwrap().entries[0].score, 3);
    }

    #[test]
    fn test_serde_shape() {
        let mut boards = Leaderboards::new();
        boards.record(&event(GameKind::Tetris, Mode::Marathon, 60), Some("ana"), 1);
        let json = serde_json::to_string(&boards).unwrap();
        assert!(json.contains("\"tetris\""));
        assert!(json.contains("\"difficulty\":\"easy\""));
        let back: Leaderboards = serde_json::from_str(&json).unwrap();
        assert_eq!(back, boards);
    }
}
