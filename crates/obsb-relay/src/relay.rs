//! Relays page requests and host events through the task bridge.
//!
//! Page messages arrive from the engine; answers and events are delivered
//! to views from the UI thread by queuing view tasks on the bridge.

use crate::message::{EngineMessage, PageRequest, RelayMessage};
use crate::snapshot::{ControlLevel, HostEvent, HostState};
use crate::view::BrowserView;
use obsb_tasks::{MessagePump, TaskBridge};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from handling a page message
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Malformed page message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Unknown page message: {0}")]
    UnknownMessage(String),

    #[error("{name} needs control level {required:?}, page has {granted:?}")]
    PermissionDenied {
        name: String,
        required: ControlLevel,
        granted: ControlLevel,
    },
}

/// Bridges page scripts and host state.
pub struct Relay<V, H, P> {
    bridge: Arc<TaskBridge<V, P>>,
    host: Arc<H>,
}

impl<V, H, P> Relay<V, H, P>
where
    V: BrowserView + 'static,
    H: HostState + 'static,
    P: MessagePump,
{
    pub fn new(bridge: Arc<TaskBridge<V, P>>, host: Arc<H>) -> Self {
        Self { bridge, host }
    }

    /// Handle a raw request sent by `view`'s page.
    ///
    /// The answer is computed and delivered on the UI thread the next time
    /// the bridge is drained. Requests without a callback id get no answer.
    pub fn on_page_message(&self, view: Arc<V>, raw: &str) -> Result<(), RelayError> {
        let request = PageRequest::from_json(raw)?;
        let message = RelayMessage::parse(&request);

        if let RelayMessage::Unknown(name) = &message {
            warn!("{} sent unknown message {:?}", view.id(), name);
            return Err(RelayError::UnknownMessage(name.clone()));
        }

        let required = message.required_level();
        let granted = view.control_level();
        if granted < required {
            warn!("{} denied {} ({:?} < {:?})", view.id(), message.name(), granted, required);
            return Err(RelayError::PermissionDenied {
                name: message.name().to_string(),
                required,
                granted,
            });
        }

        let Some(callback_id) = request.callback_id else {
            debug!("{} sent {} without a callback", view.id(), message.name());
            return Ok(());
        };

        let host = self.host.clone();
        self.bridge.queue_view_task(view, move |view| {
            if !view.is_valid() {
                debug!("{} closed before {} was answered", view.id(), message.name());
                return;
            }
            match answer(&message, host.as_ref(), view.control_level()) {
                Ok(json) => view.send(EngineMessage::ExecuteCallback { callback_id, json }),
                Err(e) => warn!("Failed to encode {} answer: {}", message.name(), e),
            }
        });
        Ok(())
    }

    /// Dispatch a host event to every view allowed to read host state.
    ///
    /// Returns how many views the event was queued for.
    pub fn dispatch_event(&self, views: &[Arc<V>], event: &HostEvent) -> usize {
        self.dispatch(views, event.name(), event.detail(), ControlLevel::ReadObs)
    }

    /// Dispatch a custom, host-named event carrying arbitrary `detail`.
    pub fn dispatch_custom(&self, views: &[Arc<V>], name: &str, detail: Value) -> usize {
        self.dispatch(views, name, detail, ControlLevel::ReadObs)
    }

    fn dispatch(&self, views: &[Arc<V>], name: &str, detail: Value, required: ControlLevel) -> usize {
        let detail_json = detail.to_string();
        let mut queued = 0;

        for view in views.iter().filter(|v| v.control_level() >= required) {
            let name = name.to_string();
            let detail_json = detail_json.clone();
            self.bridge.queue_view_task(view.clone(), move |view| {
                if view.is_valid() {
                    view.send(EngineMessage::DispatchEvent { name, detail_json });
                }
            });
            queued += 1;
        }

        debug!("Queued {} for {} view(s)", name, queued);
        queued
    }
}

fn answer<H: HostState + ?Sized>(
    message: &RelayMessage,
    host: &H,
    level: ControlLevel,
) -> Result<String, serde_json::Error> {
    match message {
        RelayMessage::GetCurrentScene => serde_json::to_string(&host.current_scene()),
        RelayMessage::GetStatus => serde_json::to_string(&host.status()),
        RelayMessage::GetControlLevel => serde_json::to_string(&level),
        RelayMessage::Unknown(_) => Ok(Value::Null.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ViewId;
    use crate::snapshot::{SceneInfo, StatusSnapshot};
    use crossbeam_channel::{unbounded, Receiver, Sender};
    use obsb_tasks::{BridgeConfig, UiThread};
    use std::sync::atomic::{AtomicBool, Ordering};

    struct TestPump(UiThread);

    impl MessagePump for TestPump {
        fn do_message_loop_work(&self) -> bool {
            false
        }

        fn is_ui_thread(&self) -> bool {
            self.0.is_current()
        }
    }

    struct TestView {
        id: ViewId,
        valid: AtomicBool,
        level: ControlLevel,
        outbox: Sender<EngineMessage>,
    }

    impl BrowserView for TestView {
        fn id(&self) -> ViewId {
            self.id
        }

        fn is_valid(&self) -> bool {
            self.valid.load(Ordering::SeqCst)
        }

        fn control_level(&self) -> ControlLevel {
            self.level
        }

        fn send(&self, message: EngineMessage) {
            self.outbox.send(message).unwrap();
        }
    }

    struct TestHost;

    impl HostState for TestHost {
        fn current_scene(&self) -> Option<SceneInfo> {
            Some(SceneInfo {
                name: String::from("Main"),
                width: 1280,
                height: 720,
            })
        }

        fn status(&self) -> StatusSnapshot {
            StatusSnapshot {
                recording: true,
                ..StatusSnapshot::default()
            }
        }
    }

    type TestRelay = Relay<TestView, TestHost, TestPump>;

    fn setup() -> (Arc<TaskBridge<TestView, TestPump>>, TestRelay) {
        let bridge = Arc::new(TaskBridge::new(
            TestPump(UiThread::current()),
            BridgeConfig::default(),
        ));
        let relay = Relay::new(bridge.clone(), Arc::new(TestHost));
        (bridge, relay)
    }

    fn view(id: u64, level: ControlLevel) -> (Arc<TestView>, Receiver<EngineMessage>) {
        let (tx, rx) = unbounded();
        let view = Arc::new(TestView {
            id: ViewId::new(id),
            valid: AtomicBool::new(true),
            level,
            outbox: tx,
        });
        (view, rx)
    }

    fn drain(bridge: &TaskBridge<TestView, TestPump>) {
        while bridge.execute_next_task() {}
    }

    #[test]
    fn test_answers_after_drain() {
        let (bridge, relay) = setup();
        let (view, outbox) = view(1, ControlLevel::ReadObs);

        relay
            .on_page_message(view, r#"{"name":"getCurrentScene","callback_id":3}"#)
            .unwrap();
        assert!(outbox.try_recv().is_err());

        drain(&bridge);
        let reply = outbox.try_recv().unwrap();
        let EngineMessage::ExecuteCallback { callback_id, json } = reply else {
            panic!("expected a callback");
        };
        assert_eq!(callback_id, 3);
        let scene: SceneInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(scene.name, "Main");
    }

    #[test]
    fn test_status_and_control_level() {
        let (bridge, relay) = setup();
        let (view, outbox) = view(1, ControlLevel::Basic);

        relay
            .on_page_message(view.clone(), r#"{"name":"getStatus","callback_id":1}"#)
            .unwrap();
        relay
            .on_page_message(view, r#"{"name":"getControlLevel","callback_id":2}"#)
            .unwrap();
        drain(&bridge);

        let replies: Vec<_> = outbox.try_iter().collect();
        assert_eq!(replies.len(), 2);
        match &replies[0] {
            EngineMessage::ExecuteCallback { callback_id: 1, json } => {
                let status: StatusSnapshot = serde_json::from_str(json).unwrap();
                assert!(status.recording);
                assert!(!status.streaming);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            replies[1],
            EngineMessage::ExecuteCallback {
                callback_id: 2,
                json: String::from("3"),
            }
        );
    }

    #[test]
    fn test_closed_view_gets_no_answer() {
        let (bridge, relay) = setup();
        let (view, outbox) = view(1, ControlLevel::ReadObs);

        relay
            .on_page_message(view.clone(), r#"{"name":"getStatus","callback_id":1}"#)
            .unwrap();
        view.valid.store(false, Ordering::SeqCst);
        drop(view);

        drain(&bridge);
        assert!(outbox.try_recv().is_err());
    }

    #[test]
    fn test_rejected_requests() {
        let (bridge, relay) = setup();
        let (view, _outbox) = view(1, ControlLevel::None);

        assert!(matches!(
            relay.on_page_message(view.clone(), "not json"),
            Err(RelayError::Malformed(_))
        ));
        assert!(matches!(
            relay.on_page_message(view.clone(), r#"{"name":"startStreaming","callback_id":1}"#),
            Err(RelayError::UnknownMessage(_))
        ));
        assert!(matches!(
            relay.on_page_message(view.clone(), r#"{"name":"getStatus","callback_id":1}"#),
            Err(RelayError::PermissionDenied { .. })
        ));
        // Allowed at any level, but no callback means nothing to queue
        relay
            .on_page_message(view, r#"{"name":"getControlLevel"}"#)
            .unwrap();

        assert_eq!(bridge.pending(), 0);
    }

    #[test]
    fn test_dispatch_event_to_permitted_views() {
        let (bridge, relay) = setup();
        let (reader, reader_outbox) = view(1, ControlLevel::ReadUser);
        let (blind, blind_outbox) = view(2, ControlLevel::None);
        let (closed, closed_outbox) = view(3, ControlLevel::All);
        closed.valid.store(false, Ordering::SeqCst);

        let queued = relay.dispatch_event(
            &[reader, blind, closed],
            &HostEvent::SourceVisibleChanged(true),
        );
        assert_eq!(queued, 2);
        drain(&bridge);

        assert_eq!(
            reader_outbox.try_recv().unwrap(),
            EngineMessage::DispatchEvent {
                name: String::from("obsSourceVisibleChanged"),
                detail_json: String::from(r#"{"visible":true}"#),
            }
        );
        assert!(blind_outbox.try_recv().is_err());
        assert!(closed_outbox.try_recv().is_err());
    }

    #[test]
    fn test_dispatch_custom_event() {
        let (bridge, relay) = setup();
        let (view, outbox) = view(1, ControlLevel::ReadObs);

        relay.dispatch_custom(&[view], "alertShown", serde_json::json!({ "id": 9 }));
        drain(&bridge);

        assert_eq!(
            outbox.try_recv().unwrap(),
            EngineMessage::DispatchEvent {
                name: String::from("alertShown"),
                detail_json: String::from(r#"{"id":9}"#),
            }
        );
    }
}
