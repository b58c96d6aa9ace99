//! TOML-based application configuration.
//!
//! Stored at `~/.config/taskwiki/config.toml`. The `WIKI_ROOT`
//! environment variable overrides the configured root so scripts and
//! tests can point the engine elsewhere without touching the file.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory of the wiki tree.
    #[serde(default)]
    pub root: Option<PathBuf>,
    /// Hours behind today's midnight the today filter still counts done
    /// work.
    #[serde(default = "default_done_lookback_hours")]
    pub done_lookback_hours: u32,
}

fn default_done_lookback_hours() -> u32 {
    0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: None,
            done_lookback_hours: default_done_lookback_hours(),
        }
    }
}

impl Config {
    /// Default configuration file location.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("taskwiki").join("config.toml"))
    }

    /// Load from the default location; a missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::SaveFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        }
        fs::write(path, text).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// The effective wiki root: `WIKI_ROOT` wins over the config file.
    pub fn wiki_root(&self) -> Result<PathBuf, ConfigError> {
        if let Ok(root) = std::env::var("WIKI_ROOT") {
            if !root.is_empty() {
                return Ok(PathBuf::from(root));
            }
        }
        self.root
            .clone()
            .ok_or_else(|| ConfigError::MissingKey("root".into()))
    }

    pub fn done_lookback(&self) -> Duration {
        Duration::hours(i64::from(self.done_lookback_hours))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_fields_missing() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.root, None);
        assert_eq!(config.done_lookback_hours, 0);
    }

    #[test]
    fn load_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            root: Some("/wiki".into()),
            done_lookback_hours: 4,
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.root, Some(PathBuf::from("/wiki")));
        assert_eq!(loaded.done_lookback_hours, 4);
        assert_eq!(loaded.done_lookback(), Duration::hours(4));
    }

    #[test]
    fn parse_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "root = [not toml").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseFailed(_))
        ));
    }

    #[test]
    fn missing_root_is_a_config_error() {
        let config = Config::default();
        if std::env::var("WIKI_ROOT").is_err() {
            assert!(matches!(
                config.wiki_root(),
                Err(ConfigError::MissingKey(_))
            ));
        }
    }
}
