//! Export/import of every leaderboard as one keyed JSON document
//!
//! Keys look like `asciiArcade_snake_lb_v1`; anything else in an imported
//! document is ignored.
//!
//! Each value is a JSON array of entries carrying `seed` and `timestamp`.
//! Browser-storage dumps, where every board is a string-encoded array with a
//! `date` field, are not this format and fail to import.

use std::collections::BTreeMap;

use super::store::StoreError;
use crate::highscores::{HighScoreEntry, HighScores, Leaderboards};
use crate::sim::GameKind;

const KEY_PREFIX: &str = "asciiArcade_";
const KEY_SUFFIX: &str = "_lb_v1";

/// Document key for a game's board
pub fn storage_key(game: GameKind) -> String {
    format!("{KEY_PREFIX}{}{KEY_SUFFIX}", game.as_str())
}

fn game_for_key(key: &str) -> Option<GameKind> {
    let name = key.strip_prefix(KEY_PREFIX)?.strip_suffix(KEY_SUFFIX)?;
    GameKind::from_str(name)
}

/// Serialize all boards into an export document
pub fn export_document(boards: &Leaderboards) -> Result<String, StoreError> {
    let doc: BTreeMap<String, &Vec<HighScoreEntry>> = boards
        .boards
        .iter()
        .map(|(game, board)| (storage_key(*game), &board.entries))
        .collect();
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Merge an export document into `boards`, replacing each board it carries.
///
/// The document is fully parsed before anything is touched, so a malformed
/// document leaves `boards` unchanged. Returns the games imported.
pub fn import_document(boards: &mut Leaderboards, json: &str) -> Result<Vec<GameKind>, StoreError> {
    let doc: BTreeMap<String, serde_json::Value> = serde_json::from_str(json)?;

    let mut parsed = Vec::new();
    for (key, value) in doc {
        let Some(game) = game_for_key(&key) else {
            log::debug!("import skipping foreign key {}", key);
            continue;
        };
        let entries: Vec<HighScoreEntry> = serde_json::from_value(value)?;
        let mut board = HighScores { entries };
        board.normalize();
        parsed.push((game, board));
    }

    if parsed.is_empty() {
        return Err(StoreError::EmptyImport);
    }

    let games: Vec<GameKind> = parsed.iter().map(|(game, _)| *game).collect();
    for (game, board) in parsed {
        boards.boards.insert(game, board);
    }
    log::info!("Imported leaderboards: {:?}", games);
    Ok(games)
}
