//! Streamed local file responses.

use crate::handler::SchemeError;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

/// Pick the MIME type for a served file.
///
/// Web assets get the types browsers expect for module scripts and fonts;
/// everything else goes through `mime_guess`.
pub fn mime_type_for(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("js" | "mjs") => "text/javascript".to_string(),
        Some("woff2") => "font/woff2".to_string(),
        Some("wasm") => "application/wasm".to_string(),
        _ => mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string(),
    }
}

/// An open local file being streamed to the engine.
#[derive(Debug)]
pub struct FileResponse {
    path: PathBuf,
    file: File,
    mime_type: String,
    length: u64,
    sent: u64,
    finished: bool,
}

impl FileResponse {
    pub(crate) fn new(path: PathBuf, file: File, length: u64) -> Self {
        let mime_type = mime_type_for(&path);
        Self {
            path,
            file,
            mime_type,
            length,
            sent: 0,
            finished: false,
        }
    }

    /// Resolved file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Content type of the file.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// File length at open time.
    pub fn length(&self) -> u64 {
        self.length
    }

    /// HTTP status reported for a successfully opened file.
    pub fn status(&self) -> u16 {
        200
    }

    /// Bytes handed out so far.
    pub fn bytes_sent(&self) -> u64 {
        self.sent
    }

    /// Response headers.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Content-Type", self.mime_type.clone()),
            ("Content-Length", self.length.to_string()),
            ("Access-Control-Allow-Origin", String::from("*")),
        ]
    }

    /// Read the next chunk into `out`.
    ///
    /// Returns the number of bytes written, or `None` once the file is
    /// exhausted. After the first `None` every call returns `None`. An
    /// empty `out` has no room for data and also yields `None`, but does
    /// not end the stream.
    pub fn read_chunk(&mut self, out: &mut [u8]) -> Result<Option<usize>, SchemeError> {
        if self.finished || out.is_empty() {
            return Ok(None);
        }

        loop {
            match self.file.read(out) {
                Ok(0) => {
                    self.finished = true;
                    return Ok(None);
                }
                Ok(n) => {
                    self.sent += n as u64;
                    return Ok(Some(n));
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(SchemeError::Io {
                        path: self.path.clone(),
                        source: e,
                    });
                }
            }
        }
    }
}
