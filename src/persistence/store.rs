//! JSON file store for all leaderboards

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::highscores::Leaderboards;

/// Errors from reading or writing persisted data
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("document has no arcade leaderboards")]
    EmptyImport,
}

impl StoreError {
    pub fn io(path: &Path, source: io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// File-backed leaderboard store
#[derive(Debug, Clone)]
pub struct ScoreStore {
    path: PathBuf,
}

impl ScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all boards. Missing or corrupt files yield empty boards.
    pub fn load(&self) -> Leaderboards {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No high scores at {}, starting fresh", self.path.display());
                return Leaderboards::new();
            }
            Err(e) => {
                log::warn!("Could not read {}: {}", self.path.display(), e);
                return Leaderboards::new();
            }
        };

        match serde_json::from_str::<Leaderboards>(&json) {
            Ok(mut boards) => {
                for board in boards.boards.values_mut() {
                    board.normalize();
                }
                log::info!("Loaded {} leaderboards", boards.boards.len());
                boards
            }
            Err(e) => {
                log::warn!("Ignoring corrupt high scores in {}: {}", self.path.display(), e);
                Leaderboards::new()
            }
        }
    }

    /// Write all boards, via a temp file so a failed write keeps the old file
    pub fn save(&self, boards: &Leaderboards) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(boards)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::io(&self.path, e))?;
        log::info!("High scores saved to {}", self.path.display());
        Ok(())
    }
}
