//! Headless engine used when no browser engine is linked.
//!
//! Stands in for the engine's message pump and for a page's renderer side:
//! page script calls register callbacks, and process messages from the host
//! resolve them or record dispatched events.

use obsb_relay::{
    BrowserView, CallbackTable, ControlLevel, EngineMessage, HostState, Relay, RelayError,
    ViewId,
};
use obsb_scheme::{SchemeError, SchemeHandler};
use obsb_tasks::{MessagePump, UiThread};
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Message pump bound to the thread that created it.
pub struct HeadlessEngine {
    ui: UiThread,
    units: AtomicU64,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self {
            ui: UiThread::current(),
            units: AtomicU64::new(0),
        }
    }

    /// Units of engine work performed so far.
    pub fn units(&self) -> u64 {
        self.units.load(Ordering::Relaxed)
    }
}

impl Default for HeadlessEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MessagePump for HeadlessEngine {
    fn do_message_loop_work(&self) -> bool {
        self.units.fetch_add(1, Ordering::Relaxed);
        false
    }

    fn is_ui_thread(&self) -> bool {
        self.ui.is_current()
    }
}

/// Script callback waiting for a JSON answer.
pub type PageCallback = Box<dyn FnOnce(&str) + Send>;

/// A view whose page lives in-process.
pub struct HeadlessView {
    id: ViewId,
    level: ControlLevel,
    open: AtomicBool,
    callbacks: Mutex<CallbackTable<PageCallback>>,
    events: Mutex<Vec<(String, String)>>,
    loaded_bytes: AtomicU64,
}

impl HeadlessView {
    pub fn new(id: ViewId, level: ControlLevel) -> Self {
        Self {
            id,
            level,
            open: AtomicBool::new(true),
            callbacks: Mutex::new(CallbackTable::new()),
            events: Mutex::new(Vec::new()),
            loaded_bytes: AtomicU64::new(0),
        }
    }

    fn callbacks(&self) -> MutexGuard<'_, CallbackTable<PageCallback>> {
        self.callbacks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn events_guard(&self) -> MutexGuard<'_, Vec<(String, String)>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load a page through the local file scheme, streaming it in chunks.
    ///
    /// Returns the number of bytes received.
    pub fn load(&self, scheme: &SchemeHandler, url: &str) -> Result<u64, SchemeError> {
        let mut response = scheme.open(url)?;
        let mut buf = vec![0u8; scheme.chunk_size()];
        let mut total = 0u64;
        while let Some(n) = response.read_chunk(&mut buf)? {
            total += n as u64;
        }
        self.loaded_bytes.store(total, Ordering::Relaxed);
        info!("{} loaded {} ({} bytes, {})", self.id, url, total, response.mime_type());
        Ok(total)
    }

    /// Bytes received by the last successful load.
    pub fn loaded_bytes(&self) -> u64 {
        self.loaded_bytes.load(Ordering::Relaxed)
    }

    /// Page script calling `name` with a completion callback.
    pub fn call<H, P, F>(
        self: &Arc<Self>,
        relay: &Relay<Self, H, P>,
        name: &str,
        callback: F,
    ) -> Result<(), RelayError>
    where
        H: HostState + 'static,
        P: MessagePump,
        F: FnOnce(&str) + Send + 'static,
    {
        let callback_id = self.callbacks().register(Box::new(callback));
        let request = json!({ "name": name, "callback_id": callback_id }).to_string();

        let result = relay.on_page_message(self.clone(), &request);
        if result.is_err() {
            // Nothing will ever answer it
            self.callbacks().take(callback_id);
        }
        result
    }

    /// Callbacks still awaiting an answer.
    pub fn pending_callbacks(&self) -> usize {
        self.callbacks().len()
    }

    /// Events dispatched to the page so far, as `(name, detail_json)`.
    pub fn events(&self) -> Vec<(String, String)> {
        self.events_guard().clone()
    }

    /// Close the view; its script context goes away with it.
    pub fn close(&self) {
        if self.open.swap(false, Ordering::SeqCst) {
            self.callbacks().clear();
            debug!("{} closed", self.id);
        }
    }
}

impl BrowserView for HeadlessView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn is_valid(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    fn control_level(&self) -> ControlLevel {
        self.level
    }

    fn send(&self, message: EngineMessage) {
        match message {
            EngineMessage::ExecuteCallback { callback_id, json } => {
                // Take first so the callback runs without the table locked
                let callback = self.callbacks().take(callback_id);
                match callback {
                    Some(callback) => callback(&json),
                    None => warn!("{} has no callback {}", self.id, callback_id),
                }
            }
            EngineMessage::DispatchEvent { name, detail_json } => {
                debug!("{} received {}", self.id, name);
                self.events_guard().push((name, detail_json));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use obsb_relay::{SceneInfo, StatusSnapshot};
    use obsb_tasks::{BridgeConfig, TaskBridge};
    use std::io::Write;

    struct FixedHost;

    impl HostState for FixedHost {
        fn current_scene(&self) -> Option<SceneInfo> {
            None
        }

        fn status(&self) -> StatusSnapshot {
            StatusSnapshot::default()
        }
    }

    #[test]
    fn test_engine_counts_units() {
        let engine = HeadlessEngine::new();
        assert!(engine.is_ui_thread());

        assert!(!engine.do_message_loop_work());
        assert_eq!(engine.units(), 1);
    }

    #[test]
    fn test_call_resolves_callback() {
        let bridge = Arc::new(TaskBridge::new(HeadlessEngine::new(), BridgeConfig::default()));
        let relay = Relay::new(bridge.clone(), Arc::new(FixedHost));
        let view = Arc::new(HeadlessView::new(ViewId::new(1), ControlLevel::ReadObs));
        let (tx, rx) = crossbeam_channel::unbounded();

        view.call(&relay, "getCurrentScene", move |json| {
            tx.send(json.to_string()).unwrap();
        })
        .unwrap();
        assert_eq!(view.pending_callbacks(), 1);

        while bridge.execute_next_task() {}
        assert_eq!(rx.try_recv().unwrap(), "null");
        assert_eq!(view.pending_callbacks(), 0);
    }

    #[test]
    fn test_failed_call_forgets_callback() {
        let bridge = Arc::new(TaskBridge::new(HeadlessEngine::new(), BridgeConfig::default()));
        let relay = Relay::new(bridge, Arc::new(FixedHost));
        let view = Arc::new(HeadlessView::new(ViewId::new(1), ControlLevel::None));

        assert!(view.call(&relay, "getStatus", |_| {}).is_err());
        assert_eq!(view.pending_callbacks(), 0);
    }

    #[test]
    fn test_closed_view_drops_callbacks() {
        let bridge = Arc::new(TaskBridge::new(HeadlessEngine::new(), BridgeConfig::default()));
        let relay = Relay::new(bridge.clone(), Arc::new(FixedHost));
        let view = Arc::new(HeadlessView::new(ViewId::new(1), ControlLevel::ReadObs));

        view.call(&relay, "getStatus", |_| panic!("answered a closed view"))
            .unwrap();
        view.close();

        while bridge.execute_next_task() {}
        assert!(!view.is_valid());
        assert_eq!(view.pending_callbacks(), 0);
    }

    #[test]
    fn test_load_streams_page() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("index.html");
        std::fs::File::create(&page)
            .unwrap()
            .write_all(&[b'x'; 10_000])
            .unwrap();

        let scheme = SchemeHandler::new(obsb_scheme::SchemeConfig {
            chunk_size: 1024,
            ..Default::default()
        })
        .unwrap();
        let view = HeadlessView::new(ViewId::new(1), ControlLevel::ReadObs);

        let url = scheme.url_for(&page).unwrap();
        assert_eq!(view.load(&scheme, &url).unwrap(), 10_000);
        assert_eq!(view.loaded_bytes(), 10_000);
    }
}
