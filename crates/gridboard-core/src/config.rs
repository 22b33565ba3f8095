// ABOUTME: Tool configuration handling.
// ABOUTME: Loads emission settings from TOML config files.

use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pretty-print emitted JSON
    pub pretty: bool,

    /// Reject panels whose datasource is not a declared input
    pub verify_datasources: bool,

    /// Reject panels that overflow the grid or overlap
    pub verify_layout: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pretty: true,
            verify_datasources: true,
            verify_layout: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

impl Config {
    /// Get the default config file path (~/.config/gridboard/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gridboard").join("config.toml"))
    }

    /// Load config from a path
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config from default path, or return default config if not found
    pub fn load_or_default() -> Self {
        Self::default_path()
            .and_then(|path| Self::load(&path).ok())
            .unwrap_or_default()
    }
}
