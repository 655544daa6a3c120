//! obs-browser Task Bridge
//!
//! Lets the host application hand work to the browser engine's UI thread:
//! - Any thread queues plain or view-targeted tasks
//! - The UI thread drains them one per poll, in FIFO order
//! - The engine's own message loop is pumped in bounded, cooperative slices
//!
//! Pending tasks left at shutdown are handled according to
//! [`ShutdownPolicy`].

mod bridge;
mod config;
mod platform;
mod pump;
mod queue;
mod task;

pub use bridge::TaskBridge;
pub use config::{BridgeConfig, ConfigError, ShutdownPolicy};
pub use platform::executable_path;
pub use pump::{MessagePump, UiThread};
pub use queue::TaskQueue;
pub use task::{PlainWork, Task, ViewWork};
