//! Leaderboard persistence
//!
//! Features:
//! - One JSON file holding every game's board
//! - Unreadable or corrupt files load as empty boards
//! - Export of all boards to a single keyed document, and import back

pub mod store;
pub mod transfer;

pub use store::{ScoreStore, StoreError};
pub use transfer::{export_document, import_document, storage_key};
