//! Host configuration, loaded from a JSON file.

use obsb_scheme::SchemeConfig;
use obsb_tasks::BridgeConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::Level;

/// Complete host configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Task bridge settings
    pub bridge: BridgeConfig,

    /// Local file scheme settings
    pub scheme: SchemeConfig,

    /// Log level (`error`, `warn`, `info`, `debug`, `trace`)
    pub log_level: String,

    /// Host loop interval (milliseconds)
    pub tick_interval_ms: u64,

    /// Number of host ticks to run
    pub ticks: u32,

    /// Local page to load into the view
    pub page: Option<PathBuf>,

    /// Canvas size reported with scenes
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            bridge: BridgeConfig::default(),
            scheme: SchemeConfig::default(),
            log_level: String::from("info"),
            tick_interval_ms: 16, // ~60 Hz
            ticks: 120,
            page: None,
            canvas_width: 1920,
            canvas_height: 1080,
        }
    }
}

impl HostConfig {
    /// Load from `path`, or use defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, HostConfigError> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| HostConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                serde_json::from_str(&text)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Parsed log level.
    pub fn level(&self) -> Result<Level, HostConfigError> {
        self.log_level
            .parse()
            .map_err(|_| HostConfigError::LogLevel(self.log_level.clone()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), HostConfigError> {
        self.bridge.validate()?;
        self.scheme.validate()?;
        self.level()?;
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(HostConfigError::EmptyCanvas);
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum HostConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Bridge(#[from] obsb_tasks::ConfigError),

    #[error(transparent)]
    Scheme(#[from] obsb_scheme::ConfigError),

    #[error("Unknown log level {0:?}")]
    LogLevel(String),

    #[error("Canvas size cannot be zero")]
    EmptyCanvas,
}
