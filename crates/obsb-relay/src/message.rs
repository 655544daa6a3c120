//! Messages exchanged between page scripts and the host.

use crate::snapshot::ControlLevel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a browser view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewId(pub u64);

impl ViewId {
    /// Create a new view ID.
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "View({})", self.0)
    }
}

/// A named request from a page's script context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Message name, e.g. `getCurrentScene`
    pub name: String,
    /// Page-side callback to answer, if the script passed one
    #[serde(default)]
    pub callback_id: Option<u32>,
    /// Message arguments
    #[serde(default)]
    pub args: serde_json::Value,
}

impl PageRequest {
    /// Parse a request payload.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// Requests the host knows how to answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayMessage {
    /// Current program scene
    GetCurrentScene,
    /// Output status snapshot
    GetStatus,
    /// The page's own permission level
    GetControlLevel,
    /// Anything else
    Unknown(String),
}

impl RelayMessage {
    /// Map a request onto a known message.
    pub fn parse(request: &PageRequest) -> Self {
        match request.name.as_str() {
            "getCurrentScene" => Self::GetCurrentScene,
            "getStatus" => Self::GetStatus,
            "getControlLevel" => Self::GetControlLevel,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Wire name of the message.
    pub fn name(&self) -> &str {
        match self {
            Self::GetCurrentScene => "getCurrentScene",
            Self::GetStatus => "getStatus",
            Self::GetControlLevel => "getControlLevel",
            Self::Unknown(name) => name,
        }
    }

    /// Minimum control level a page needs to send this message.
    pub fn required_level(&self) -> ControlLevel {
        match self {
            Self::GetControlLevel => ControlLevel::None,
            Self::GetCurrentScene | Self::GetStatus => ControlLevel::ReadObs,
            Self::Unknown(_) => ControlLevel::All,
        }
    }
}

/// Messages sent from the host into a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineMessage {
    /// Invoke the page callback registered under `callback_id`
    ExecuteCallback { callback_id: u32, json: String },
    /// Dispatch a DOM `CustomEvent` on the page's window
    DispatchEvent { name: String, detail_json: String },
}
