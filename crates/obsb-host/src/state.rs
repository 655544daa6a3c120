//! In-process host state.

use obsb_relay::{HostEvent, HostState, SceneInfo, StatusSnapshot};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::info;

#[derive(Debug, Default)]
struct Inner {
    scene: Option<SceneInfo>,
    status: StatusSnapshot,
}

/// Scene and output state shared between the host's threads.
///
/// Every change returns the event pages should see for it.
#[derive(Debug)]
pub struct SimulatedHost {
    width: u32,
    height: u32,
    inner: Mutex<Inner>,
}

impl SimulatedHost {
    /// Create a host with the given canvas size and no scene.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make `name` the program scene.
    pub fn switch_scene(&self, name: &str) -> HostEvent {
        let scene = SceneInfo {
            name: name.to_string(),
            width: self.width,
            height: self.height,
        };
        self.lock().scene = Some(scene.clone());
        info!("Scene switched to {:?}", name);
        HostEvent::SceneChanged(scene)
    }

    pub fn set_streaming(&self, on: bool) -> HostEvent {
        self.lock().status.streaming = on;
        if on {
            HostEvent::StreamingStarted
        } else {
            HostEvent::StreamingStopped
        }
    }

    pub fn set_recording(&self, on: bool) -> HostEvent {
        let mut inner = self.lock();
        inner.status.recording = on;
        if !on {
            inner.status.paused = false;
        }
        if on {
            HostEvent::RecordingStarted
        } else {
            HostEvent::RecordingStopped
        }
    }

    /// Pause or resume recording; `None` if nothing is recording.
    pub fn set_paused(&self, paused: bool) -> Option<HostEvent> {
        let mut inner = self.lock();
        if !inner.status.recording {
            return None;
        }
        inner.status.paused = paused;
        Some(if paused {
            HostEvent::RecordingPaused
        } else {
            HostEvent::RecordingUnpaused
        })
    }
}

impl HostState for SimulatedHost {
    fn current_scene(&self) -> Option<SceneInfo> {
        self.lock().scene.clone()
    }

    fn status(&self) -> StatusSnapshot {
        self.lock().status
    }
}
