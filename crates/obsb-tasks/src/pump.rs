//! Engine message-loop integration.
//!
//! On platforms where the host application owns the main run loop, the
//! browser engine cannot run its own loop on that thread. Instead the host
//! hands it cooperative slices of time through [`MessagePump`].

use std::thread::{self, ThreadId};

/// The engine's external message pump.
///
/// Implemented by the engine integration; the bridge treats it as opaque.
pub trait MessagePump {
    /// Perform one unit of pending engine work.
    ///
    /// Returns `true` if more work is immediately pending.
    fn do_message_loop_work(&self) -> bool;

    /// Whether the calling thread is the engine's UI thread.
    fn is_ui_thread(&self) -> bool;
}

/// Identity of the thread designated as the engine's UI thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiThread {
    id: ThreadId,
}

impl UiThread {
    /// Designate the calling thread.
    pub fn current() -> Self {
        Self {
            id: thread::current().id(),
        }
    }

    /// Designate a specific thread.
    pub fn from_id(id: ThreadId) -> Self {
        Self { id }
    }

    /// The designated thread's id.
    pub fn id(&self) -> ThreadId {
        self.id
    }

    /// Whether the calling thread is the designated one.
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.id
    }
}
