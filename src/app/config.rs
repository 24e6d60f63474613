//! Configuration for the cassette dump tool

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// How a report is written out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Ruled metadata blocks and program listings
    #[default]
    Text,
    /// The full report as pretty-printed JSON
    Json,
}

/// Tool configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputFormat,
    /// Width of the ruler lines in text output
    pub rule_width: usize,
    /// Print the tool banner before the report
    pub show_banner: bool,
    /// Print each program's header block
    pub show_metadata: bool,
    /// Print each program's statements
    pub show_lines: bool,
    /// `tracing` filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: OutputFormat::Text,
            rule_width: 80,
            show_banner: true,
            show_metadata: true,
            show_lines: true,
            log_filter: "warn".to_string(),
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

    /// Load configuration from default location or return default config
    pub fn load_or_default() -> Self {
        // Try to load from ~/.config/l1cas/config.json
        if let Some(config_path) = default_config_path() {
            if config_path.exists() {
                match Self::load(&config_path) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Ignoring {}: {}", config_path.display(), e);
                    },
                }
            }
        }
        Self::default()
    }

    /// Check values that serde alone cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rule_width == 0 {
            return Err(ConfigError::Invalid("rule_width must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Get the default configuration file path
pub fn default_config_path() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("l1cas")
            .join("config.json")
    })
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
