//! Platform queries shared by the engine integration.

use std::path::PathBuf;
use tracing::warn;

/// Absolute path of the running executable.
///
/// Symlinks are resolved where the platform allows it. Returns an empty
/// path if the platform query fails.
pub fn executable_path() -> PathBuf {
    match std::env::current_exe() {
        Ok(path) => path.canonicalize().unwrap_or(path),
        Err(e) => {
            warn!("Failed to resolve executable path: {}", e);
            PathBuf::new()
        }
    }
}
