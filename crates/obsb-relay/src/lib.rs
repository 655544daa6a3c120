//! obs-browser JavaScript Bridge Relay
//!
//! Connects page scripts to host state:
//! - Named page requests (`getCurrentScene`, `getStatus`, `getControlLevel`)
//!   answered through page-side callback ids
//! - Host events (scene changes, output state) dispatched as DOM events
//! - Per-page control levels gating what a page may read
//!
//! Every answer and event is delivered on the engine's UI thread through
//! the task bridge.

mod callbacks;
mod message;
mod relay;
mod snapshot;
mod view;

pub use callbacks::CallbackTable;
pub use message::{EngineMessage, PageRequest, RelayMessage, ViewId};
pub use relay::{Relay, RelayError};
pub use snapshot::{ControlLevel, HostEvent, HostState, SceneInfo, StatusSnapshot};
pub use view::BrowserView;
