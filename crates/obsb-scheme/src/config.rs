//! Local file scheme configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default read chunk (64 KiB)
const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Which origin maps to local files, and how they are streamed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemeConfig {
    /// URL scheme served by the handler
    pub scheme: String,

    /// Host part of the origin; the URL path is the file path
    pub host: String,

    /// Optional directory that every served file must live under
    pub root: Option<PathBuf>,

    /// Bytes read per chunk when streaming a file
    pub chunk_size: usize,
}

impl Default for SchemeConfig {
    fn default() -> Self {
        Self {
            scheme: String::from("http"),
            host: String::from("absolute"),
            root: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl SchemeConfig {
    /// Origin prefix pages use, e.g. `http://absolute/`.
    pub fn origin(&self) -> String {
        format!("{}://{}/", self.scheme, self.host)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scheme.is_empty()
            || !self
                .scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        {
            return Err(ConfigError::InvalidScheme(self.scheme.clone()));
        }
        if self.host.is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid URL scheme: {0:?}")]
    InvalidScheme(String),

    #[error("Scheme host cannot be empty")]
    EmptyHost,

    #[error("Chunk size must be non-zero")]
    ZeroChunkSize,
}
