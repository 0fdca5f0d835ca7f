//! Configuration for the console translator

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::console::StreamId;

/// Translator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Standard stream whose console the translator binds to
    pub stream: StreamId,
    /// Character written into erased cells
    pub fill_char: char,
    /// Emulate underline with the background intensity bit. When false,
    /// underline on/off is ignored.
    pub underline_as_intensity: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stream: StreamId::Stdout,
            fill_char: ' ',
            underline_as_intensity: true,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from the default location or return the default
    pub fn load_or_default() -> Self {
        match default_config_path() {
            Some(path) => Self::load_or_default_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from `path`, falling back to the default when the
    /// file is missing or unreadable
    pub fn load_or_default_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                Self::default()
            }
        }
    }
}

/// `~/.config/mochi/conhost.json`
fn default_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("mochi")
            .join("conhost.json")
    })
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
