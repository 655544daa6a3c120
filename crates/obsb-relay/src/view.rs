//! Host-side handle to a browser view.

use crate::message::{EngineMessage, ViewId};
use crate::snapshot::ControlLevel;

/// A browser view the relay can talk to.
///
/// Views are shared as `Arc<V>`; a view may be closed while handles to it
/// are still queued, so callers check [`BrowserView::is_valid`] first.
pub trait BrowserView: Send + Sync {
    fn id(&self) -> ViewId;

    /// Whether the view is still open.
    fn is_valid(&self) -> bool;

    /// Permission level granted to the page.
    fn control_level(&self) -> ControlLevel {
        ControlLevel::ReadObs
    }

    /// Send a process message to the page's renderer.
    fn send(&self, message: EngineMessage);
}
