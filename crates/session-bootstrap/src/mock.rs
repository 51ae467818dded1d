//! Mock capability implementations for testing.
//!
//! Lets the bootstrap flow run without a browser or a meeting service.

use crate::credentials::CredentialSource;
use crate::errors::BootstrapError;
use crate::library::LibraryLoader;
use crate::widget::{EventListener, WidgetEvent, WidgetHandle, WidgetLibrary, WidgetOptions};
use async_trait::async_trait;
use common::secret::SecretString;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Mock credential source.
pub struct MockCredentialSource {
    response: Result<SecretString, BootstrapError>,
    gate: Option<Arc<Notify>>,
    rooms: Mutex<Vec<String>>,
}

impl MockCredentialSource {
    /// Create a source that returns `jwt` immediately.
    pub fn returning(jwt: &str) -> Self {
        Self {
            response: Ok(SecretString::from(jwt)),
            gate: None,
            rooms: Mutex::new(Vec::new()),
        }
    }

    /// Create a source that always fails with a network error.
    pub fn failing() -> Self {
        Self {
            response: Err(BootstrapError::Network(
                "Mock credential endpoint unavailable".to_string(),
            )),
            gate: None,
            rooms: Mutex::new(Vec::new()),
        }
    }

    /// Create a source that returns `jwt` once the returned gate is notified.
    pub fn gated(jwt: &str) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let source = Self {
            response: Ok(SecretString::from(jwt)),
            gate: Some(gate.clone()),
            rooms: Mutex::new(Vec::new()),
        };
        (source, gate)
    }

    /// Rooms requested so far, in order.
    pub fn requested_rooms(&self) -> Vec<String> {
        self.rooms.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CredentialSource for MockCredentialSource {
    async fn fetch(&self, room_name: &str) -> Result<SecretString, BootstrapError> {
        if let Ok(mut rooms) = self.rooms.lock() {
            rooms.push(room_name.to_string());
        }

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        self.response.clone()
    }
}

/// Mock widget session.
#[derive(Default)]
pub struct MockWidgetHandle {
    dispose_count: AtomicUsize,
    listener: Mutex<Option<EventListener>>,
}

impl MockWidgetHandle {
    /// Number of `dispose` calls.
    pub fn dispose_count(&self) -> usize {
        self.dispose_count.load(Ordering::SeqCst)
    }

    /// Whether a listener was registered.
    pub fn has_listener(&self) -> bool {
        self.listener.lock().map(|l| l.is_some()).unwrap_or(false)
    }

    /// Deliver `event` to the registered listener, if any.
    pub fn emit(&self, event: WidgetEvent) {
        let listener = self.listener.lock().ok().and_then(|l| l.clone());
        if let Some(listener) = listener {
            listener(event);
        }
    }
}

impl WidgetHandle for Arc<MockWidgetHandle> {
    fn add_event_listeners(&self, listener: EventListener) {
        if let Ok(mut slot) = self.listener.lock() {
            *slot = Some(listener);
        }
    }

    fn dispose(&self) {
        self.dispose_count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Mock widget library.
#[derive(Default)]
pub struct MockWidgetLibrary {
    fail: bool,
    sessions: Mutex<Vec<(String, WidgetOptions, Arc<MockWidgetHandle>)>>,
}

impl MockWidgetLibrary {
    /// Create a library whose constructor succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a library whose constructor always fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            sessions: Mutex::new(Vec::new()),
        }
    }

    /// Number of widgets constructed.
    pub fn created_count(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// Handles of constructed widgets, in construction order.
    pub fn handles(&self) -> Vec<Arc<MockWidgetHandle>> {
        self.sessions
            .lock()
            .map(|s| s.iter().map(|(_, _, h)| h.clone()).collect())
            .unwrap_or_default()
    }

    /// Domain and options of constructed widgets, in construction order.
    pub fn constructed(&self) -> Vec<(String, WidgetOptions)> {
        self.sessions
            .lock()
            .map(|s| s.iter().map(|(d, o, _)| (d.clone(), o.clone())).collect())
            .unwrap_or_default()
    }
}

impl WidgetLibrary for MockWidgetLibrary {
    fn create_session(
        &self,
        domain: &str,
        options: WidgetOptions,
    ) -> Result<Box<dyn WidgetHandle>, BootstrapError> {
        if self.fail {
            return Err(BootstrapError::Widget(
                "Mock widget construction failed".to_string(),
            ));
        }

        let handle = Arc::new(MockWidgetHandle::default());
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.push((domain.to_string(), options, handle.clone()));
        }

        Ok(Box::new(handle))
    }
}

/// Mock library loader.
pub struct MockLibraryLoader {
    existing: Option<Arc<dyn WidgetLibrary>>,
    loadable: Option<Arc<dyn WidgetLibrary>>,
    load_count: AtomicUsize,
    loaded_urls: Mutex<Vec<String>>,
}

impl MockLibraryLoader {
    /// The library is already present; `load` is never needed.
    pub fn preloaded(library: Arc<MockWidgetLibrary>) -> Self {
        Self {
            existing: Some(library),
            loadable: None,
            load_count: AtomicUsize::new(0),
            loaded_urls: Mutex::new(Vec::new()),
        }
    }

    /// The library becomes available after a script load.
    pub fn loading(library: Arc<MockWidgetLibrary>) -> Self {
        Self {
            existing: None,
            loadable: Some(library),
            load_count: AtomicUsize::new(0),
            loaded_urls: Mutex::new(Vec::new()),
        }
    }

    /// The script never loads.
    pub fn failing() -> Self {
        Self {
            existing: None,
            loadable: None,
            load_count: AtomicUsize::new(0),
            loaded_urls: Mutex::new(Vec::new()),
        }
    }

    /// Number of script loads attempted.
    pub fn load_count(&self) -> usize {
        self.load_count.load(Ordering::SeqCst)
    }

    /// Script URLs loaded, in order.
    pub fn loaded_urls(&self) -> Vec<String> {
        self.loaded_urls.lock().map(|u| u.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LibraryLoader for MockLibraryLoader {
    fn existing(&self) -> Option<Arc<dyn WidgetLibrary>> {
        self.existing.clone()
    }

    async fn load(&self, script_url: &str) -> Result<Arc<dyn WidgetLibrary>, BootstrapError> {
        self.load_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut urls) = self.loaded_urls.lock() {
            urls.push(script_url.to_string());
        }

        // Give concurrent callers a chance to queue behind this load
        tokio::task::yield_now().await;

        self.loadable
            .clone()
            .ok_or_else(|| BootstrapError::Network(format!("Failed to load {script_url}")))
    }
}
