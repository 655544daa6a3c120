//! Local file scheme handler.
//!
//! Maps `http://absolute/<path>` style URLs onto the local filesystem so
//! pages loaded from disk can reference sibling assets.

use crate::config::SchemeConfig;
use crate::response::FileResponse;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Errors from resolving or opening a local file URL
#[derive(Debug, Error)]
pub enum SchemeError {
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("URL is not served by this handler: {0}")]
    WrongOrigin(String),

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Path escapes the served root: {}", .0.display())]
    OutsideRoot(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SchemeError {
    /// HTTP status the engine should report for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidUrl { .. } | Self::WrongOrigin(_) => 400,
            Self::OutsideRoot(_) => 403,
            Self::NotFound(_) | Self::NotAFile(_) => 404,
            Self::Io { .. } => 500,
        }
    }

    fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound(path.to_path_buf())
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Serves local files for the configured origin.
#[derive(Debug, Clone)]
pub struct SchemeHandler {
    config: SchemeConfig,
    /// Canonical form of `config.root`
    root: Option<PathBuf>,
}

impl SchemeHandler {
    /// Create a handler.
    ///
    /// A configured root that does not exist is an error.
    pub fn new(config: SchemeConfig) -> Result<Self, SchemeError> {
        let root = match &config.root {
            Some(root) => Some(root.canonicalize().map_err(|e| SchemeError::from_io(root, e))?),
            None => None,
        };
        Ok(Self { config, root })
    }

    /// Handler configuration.
    pub fn config(&self) -> &SchemeConfig {
        &self.config
    }

    /// Preferred buffer size for [`FileResponse::read_chunk`].
    pub fn chunk_size(&self) -> usize {
        self.config.chunk_size
    }

    /// Whether `url` belongs to the served origin.
    pub fn handles(&self, url: &str) -> bool {
        Url::parse(url)
            .map(|u| self.matches_origin(&u))
            .unwrap_or(false)
    }

    fn matches_origin(&self, url: &Url) -> bool {
        url.scheme().eq_ignore_ascii_case(&self.config.scheme)
            && url
                .host_str()
                .is_some_and(|h| h.eq_ignore_ascii_case(&self.config.host))
    }

    /// Map a URL onto a local path.
    ///
    /// Query and fragment are ignored. With a root configured, the path
    /// must exist and lie under it.
    pub fn resolve(&self, raw: &str) -> Result<PathBuf, SchemeError> {
        let url = Url::parse(raw).map_err(|e| SchemeError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;
        if !self.matches_origin(&url) {
            return Err(SchemeError::WrongOrigin(raw.to_string()));
        }

        // Re-read the (already normalised, still percent-encoded) path as a
        // file URL so decoding and drive letters follow platform rules.
        let path = Url::parse(&format!("file://{}", url.path()))
            .ok()
            .and_then(|file_url| file_url.to_file_path().ok())
            .ok_or_else(|| SchemeError::InvalidUrl {
                url: raw.to_string(),
                reason: String::from("path is not a valid local file path"),
            })?;
        // No filesystem call accepts an embedded NUL
        if path.as_os_str().as_encoded_bytes().contains(&0) {
            return Err(SchemeError::InvalidUrl {
                url: raw.to_string(),
                reason: String::from("path contains a NUL byte"),
            });
        }

        match &self.root {
            Some(root) => {
                let canonical = path
                    .canonicalize()
                    .map_err(|e| SchemeError::from_io(&path, e))?;
                if !canonical.starts_with(root) {
                    return Err(SchemeError::OutsideRoot(canonical));
                }
                Ok(canonical)
            }
            None => Ok(path),
        }
    }

    /// Resolve and open `url` for streaming.
    pub fn open(&self, url: &str) -> Result<FileResponse, SchemeError> {
        let path = self.resolve(url)?;

        let metadata = fs::metadata(&path).map_err(|e| SchemeError::from_io(&path, e))?;
        if !metadata.is_file() {
            return Err(SchemeError::NotAFile(path));
        }
        let file = File::open(&path).map_err(|e| SchemeError::from_io(&path, e))?;

        let response = FileResponse::new(path, file, metadata.len());
        debug!(
            "Serving {} ({}, {} bytes)",
            response.path().display(),
            response.mime_type(),
            response.length()
        );
        Ok(response)
    }

    /// Build the URL a page would use for a local `path`.
    pub fn url_for(&self, path: &Path) -> Option<String> {
        let file_url = Url::from_file_path(path).ok()?;
        Some(format!(
            "{}://{}{}",
            self.config.scheme,
            self.config.host,
            file_url.path()
        ))
    }
}
