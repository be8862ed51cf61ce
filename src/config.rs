//! Configuration management for handoff
//!
//! Handles loading and saving configuration from ~/.config/handoff/config.toml

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::export::{CompressionLevel, ExportError, ExportFormat, TargetProvider};

/// Configuration file name
const CONFIG_FILE: &str = "config.toml";

/// Application name for config directory
const APP_NAME: &str = "handoff";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Default export format (json, markdown, context_prompt)
    #[serde(default)]
    pub default_format: Option<String>,

    /// Default target provider for context prompts
    #[serde(default)]
    pub default_provider: Option<String>,

    /// Default compression level for context prompts
    #[serde(default)]
    pub default_compression: Option<String>,

    /// Override for the export history database path
    #[serde(default)]
    pub history_db: Option<PathBuf>,
}

impl Config {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the config file path
    ///
    /// Returns ~/.config/handoff/config.toml on Linux/macOS
    pub fn config_path() -> ConfigResult<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Get the config directory path
    pub fn config_dir() -> ConfigResult<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join(APP_NAME))
    }

    /// Load configuration from file
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> ConfigResult<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to file
    ///
    /// Creates the config directory if it doesn't exist
    pub fn save(&self) -> ConfigResult<()> {
        let path = Self::config_path()?;
        let dir = Self::config_dir()?;

        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        Ok(())
    }

    /// Check if any configuration is set
    pub fn is_empty(&self) -> bool {
        self.default_format.is_none()
            && self.default_provider.is_none()
            && self.default_compression.is_none()
            && self.history_db.is_none()
    }

    /// Resolve the export format: CLI argument, then config, then `json`.
    ///
    /// Parsing is strict in every case; a bad value in the config file is
    /// surfaced rather than silently replaced.
    pub fn effective_format(&self, cli_format: Option<&str>) -> Result<ExportFormat, ExportError> {
        cli_format
            .or(self.default_format.as_deref())
            .unwrap_or("json")
            .parse()
    }

    /// Resolve the target provider: CLI argument, then config, then generic.
    pub fn effective_provider(&self, cli_provider: Option<&str>) -> TargetProvider {
        cli_provider
            .or(self.default_provider.as_deref())
            .map(TargetProvider::parse_lossy)
            .unwrap_or_default()
    }

    /// Resolve the compression level: CLI argument, then config, then medium.
    pub fn effective_compression(&self, cli_compression: Option<&str>) -> CompressionLevel {
        cli_compression
            .or(self.default_compression.as_deref())
            .map(CompressionLevel::parse_lossy)
            .unwrap_or_default()
    }

    /// Resolve the history database path: config override or the default.
    pub fn effective_history_db(&self) -> PathBuf {
        self.history_db
            .clone()
            .unwrap_or_else(crate::history::default_db_path)
    }
}

/// Format the configuration for display
pub fn format_config(config: &Config) -> String {
    let mut lines = Vec::new();

    lines.push("Current configuration:".to_string());
    lines.push(String::new());

    for (key, value) in [
        ("default_format", &config.default_format),
        ("default_provider", &config.default_provider),
        ("default_compression", &config.default_compression),
    ] {
        match value {
            Some(v) => lines.push(format!("  {} = \"{}\"", key, v)),
            None => lines.push(format!("  {} = (not set)", key)),
        }
    }

    match config.history_db {
        Some(ref path) => lines.push(format!("  history_db = \"{}\"", path.display())),
        None => lines.push(format!(
            "  history_db = (not set, using {})",
            crate::history::default_db_path().display()
        )),
    }

    lines.join("\n")
}
