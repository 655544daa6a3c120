//! obs-browser Local File Scheme
//!
//! Serves files from disk to browser sources over a custom origin
//! (`http://absolute/<path>` by default), so local overlays can load
//! sibling scripts, styles and media with the right content types.
//!
//! Files are streamed in caller-sized chunks rather than read whole.

mod config;
mod handler;
mod response;

pub use config::{ConfigError, SchemeConfig};
pub use handler::{SchemeError, SchemeHandler};
pub use response::{mime_type_for, FileResponse};
