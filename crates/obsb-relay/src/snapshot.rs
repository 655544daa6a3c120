//! JSON snapshots of host state handed to pages.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Program scene as reported to pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneInfo {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

/// Output status as reported to pages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub recording: bool,
    pub paused: bool,
    pub streaming: bool,
    pub replaybuffer: bool,
    pub virtualcam: bool,
}

/// How much of the host a page may read or control.
///
/// Serialized as its numeric level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ControlLevel {
    None = 0,
    #[default]
    ReadObs = 1,
    ReadUser = 2,
    Basic = 3,
    Advanced = 4,
    All = 5,
}

impl From<ControlLevel> for u8 {
    fn from(level: ControlLevel) -> Self {
        level as u8
    }
}

impl TryFrom<u8> for ControlLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::None,
            1 => Self::ReadObs,
            2 => Self::ReadUser,
            3 => Self::Basic,
            4 => Self::Advanced,
            5 => Self::All,
            other => return Err(format!("invalid control level {}", other)),
        })
    }
}

/// Host-side state the relay reads when answering pages.
pub trait HostState: Send + Sync {
    /// The current program scene, if any.
    fn current_scene(&self) -> Option<SceneInfo>;

    /// Current output status.
    fn status(&self) -> StatusSnapshot;
}

/// Host state changes that pages can listen for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    SceneChanged(SceneInfo),
    SourceVisibleChanged(bool),
    SourceActiveChanged(bool),
    StreamingStarting,
    StreamingStarted,
    StreamingStopping,
    StreamingStopped,
    RecordingStarting,
    RecordingStarted,
    RecordingPaused,
    RecordingUnpaused,
    RecordingStopping,
    RecordingStopped,
    ReplaybufferStarting,
    ReplaybufferStarted,
    ReplaybufferSaved,
    ReplaybufferStopping,
    ReplaybufferStopped,
    VirtualcamStarted,
    VirtualcamStopped,
    Exit,
}

impl HostEvent {
    /// DOM event name dispatched on the page's window.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SceneChanged(_) => "obsSceneChanged",
            Self::SourceVisibleChanged(_) => "obsSourceVisibleChanged",
            Self::SourceActiveChanged(_) => "obsSourceActiveChanged",
            Self::StreamingStarting => "obsStreamingStarting",
            Self::StreamingStarted => "obsStreamingStarted",
            Self::StreamingStopping => "obsStreamingStopping",
            Self::StreamingStopped => "obsStreamingStopped",
            Self::RecordingStarting => "obsRecordingStarting",
            Self::RecordingStarted => "obsRecordingStarted",
            Self::RecordingPaused => "obsRecordingPaused",
            Self::RecordingUnpaused => "obsRecordingUnpaused",
            Self::RecordingStopping => "obsRecordingStopping",
            Self::RecordingStopped => "obsRecordingStopped",
            Self::ReplaybufferStarting => "obsReplaybufferStarting",
            Self::ReplaybufferStarted => "obsReplaybufferStarted",
            Self::ReplaybufferSaved => "obsReplaybufferSaved",
            Self::ReplaybufferStopping => "obsReplaybufferStopping",
            Self::ReplaybufferStopped => "obsReplaybufferStopped",
            Self::VirtualcamStarted => "obsVirtualcamStarted",
            Self::VirtualcamStopped => "obsVirtualcamStopped",
            Self::Exit => "obsExit",
        }
    }

    /// Event `detail` payload.
    pub fn detail(&self) -> Value {
        match self {
            Self::SceneChanged(scene) => json!(scene),
            Self::SourceVisibleChanged(visible) => json!({ "visible": visible }),
            Self::SourceActiveChanged(active) => json!({ "active": active }),
            _ => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_json_shape() {
        let status = StatusSnapshot {
            streaming: true,
            ..StatusSnapshot::default()
        };

        let value = serde_json::to_value(status).unwrap();
        assert_eq!(
            value,
            json!({
                "recording": false,
                "paused": false,
                "streaming": true,
                "replaybuffer": false,
                "virtualcam": false,
            })
        );
    }

    #[test]
    fn test_control_level_is_numeric() {
        assert_eq!(serde_json::to_string(&ControlLevel::Basic).unwrap(), "3");
        assert_eq!(
            serde_json::from_str::<ControlLevel>("5").unwrap(),
            ControlLevel::All
        );
        assert!(serde_json::from_str::<ControlLevel>("9").is_err());
        assert!(ControlLevel::ReadObs < ControlLevel::ReadUser);
    }

    #[test]
    fn test_event_payloads() {
        let scene = SceneInfo {
            name: String::from("Intermission"),
            width: 1920,
            height: 1080,
        };
        let event = HostEvent::SceneChanged(scene);

        assert_eq!(event.name(), "obsSceneChanged");
        assert_eq!(event.detail()["name"], "Intermission");
        assert_eq!(HostEvent::SourceVisibleChanged(true).detail(), json!({ "visible": true }));
        assert!(HostEvent::StreamingStarted.detail().is_null());
    }
}
