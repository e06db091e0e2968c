//! Game settings and preferences
//!
//! Read from `settings.toml`; every field is optional and falls back to a
//! default. Command-line flags override what is loaded here.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::persistence::StoreError;
use crate::sim::Mode;
use crate::tuning::Tier;

/// Default config file name, looked up in the working directory
pub const DEFAULT_SETTINGS_FILE: &str = "settings.toml";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub general: General,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct General {
    /// Tier selected at launch
    #[serde(default)]
    pub tier: Tier,
    /// Marathon records scores, practice never does
    #[serde(default)]
    pub mode: Mode,
    /// Leaderboard file
    #[serde(default = "default_scores_path")]
    pub scores_path: PathBuf,
}

fn default_scores_path() -> PathBuf {
    PathBuf::from("ascii-arcade-scores.json")
}

impl Default for General {
    fn default() -> Self {
        Self {
            tier: Tier::default(),
            mode: Mode::default(),
            scores_path: default_scores_path(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML text
    pub fn from_toml(text: &str) -> Result<Self, StoreError> {
        Ok(toml::from_str(text)?)
    }

    /// Load settings; a missing file gives defaults, a broken one is an error
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        match fs::read_to_string(path) {
            Ok(text) => {
                let settings = Self::from_toml(&text)?;
                log::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Ok(Self::default())
            }
            Err(e) => Err(StoreError::io(path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.general.tier, Tier::Normal);
        assert_eq!(settings.general.mode, Mode::Marathon);
    }

    #[test]
    fn test_partial_file() {
        let settings = Settings::from_toml("[general]\ntier = \"insane\"\nmode = \"practice\"\n").unwrap();
        assert_eq!(settings.general.tier, Tier::Insane);
        assert_eq!(settings.general.mode, Mode::Practice);
        assert_eq!(settings.general.scores_path, default_scores_path());
    }

    #[test]
    fn test_bad_value_is_error() {
        assert!(matches!(
            Settings::from_toml("[general]\ntier = \"nightmare\"\n"),
            Err(StoreError::Toml(_))
        ));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("ascii-arcade-no-such-settings.toml");
        assert_eq!(Settings::load(&path).unwrap(), Settings::default());
    }
}
