//! Meeting view state machine.
//!
//! A [`MeetingView`] drives one embedded widget through
//! `Idle -> LoadingCredential -> LoadingWidgetLibrary -> Initializing -> Live`,
//! ending in `Disposed` on unmount or `Failed` on the first error.
//!
//! # Unmount
//!
//! Unmounting does not abort in-flight requests. The bootstrap task keeps
//! running, sees the cancellation and drops whatever it obtained. Widget
//! construction and unmount both hold the widget slot lock, so a widget is
//! either never constructed or disposed exactly once.

use crate::config::BootstrapConfig;
use crate::credentials::CredentialSource;
use crate::errors::{CREDENTIAL_FAILURE_MESSAGE, INITIALIZATION_FAILURE_MESSAGE};
use crate::library::WidgetLibraryCache;
use crate::widget::{logging_listener, ContainerId, WidgetHandle, WidgetOptions};
use common::secret::ExposeSecret;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

/// Lifecycle state of a meeting view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    LoadingCredential,
    LoadingWidgetLibrary,
    Initializing,
    Live,
    Disposed,
    /// Carries the user-facing message.
    Failed(String),
}

impl SessionState {
    /// `Disposed` and `Failed` accept no further bootstrap transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Disposed | SessionState::Failed(_))
    }

    /// Still working towards `Live`.
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            SessionState::LoadingCredential
                | SessionState::LoadingWidgetLibrary
                | SessionState::Initializing
        )
    }
}

/// State shared between a view and its bootstrap task.
struct Session {
    state: watch::Sender<SessionState>,
    widget: Mutex<Option<Box<dyn WidgetHandle>>>,
}

impl Session {
    fn new(initial: SessionState) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            state,
            widget: Mutex::new(None),
        }
    }

    /// Move to `next` unless the session already ended.
    fn advance(&self, next: SessionState) -> bool {
        self.state.send_if_modified(|current| {
            if current.is_terminal() {
                return false;
            }
            *current = next;
            true
        })
    }
}

/// Everything the bootstrap task needs besides the session.
#[derive(Clone)]
struct Capabilities {
    config: Arc<BootstrapConfig>,
    credentials: Arc<dyn CredentialSource>,
    library: Arc<WidgetLibraryCache>,
}

/// One hosted meeting view.
pub struct MeetingView {
    capabilities: Capabilities,
    session: Arc<Session>,
    cancel: CancellationToken,
    mounted: bool,
}

impl MeetingView {
    /// Create an unmounted view.
    ///
    /// Share `library` between views so the widget script loads once.
    pub fn new(
        config: BootstrapConfig,
        credentials: Arc<dyn CredentialSource>,
        library: Arc<WidgetLibraryCache>,
    ) -> Self {
        Self {
            capabilities: Capabilities {
                config: Arc::new(config),
                credentials,
                library,
            },
            session: Arc::new(Session::new(SessionState::Idle)),
            cancel: CancellationToken::new(),
            mounted: false,
        }
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.session.state.borrow().clone()
    }

    /// Wait until the current session leaves the loading states.
    pub async fn settled(&self) -> SessionState {
        let mut receiver = self.session.state.subscribe();
        let settled = receiver
            .wait_for(|state| !state.is_pending())
            .await
            .map(|state| state.clone());
        settled.unwrap_or(SessionState::Disposed)
    }

    /// Whether a session is mounted.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Mount the view for `room_name`, rendering into `container`.
    ///
    /// A view that is already mounted is unmounted first, so at most one
    /// widget is alive per view. Returns once the bootstrap has started.
    #[instrument(skip(self, container), name = "session.view.mount")]
    pub async fn mount(&mut self, room_name: &str, container: ContainerId) {
        if self.mounted {
            debug!(target: "session.bootstrap", "Remount requested, unmounting previous session");
            self.unmount().await;
        }

        let session = Arc::new(Session::new(SessionState::LoadingCredential));
        let cancel = CancellationToken::new();

        self.session = session.clone();
        self.cancel = cancel.clone();
        self.mounted = true;

        info!(target: "session.bootstrap", room = %room_name, "Meeting view mounted");

        tokio::spawn(bootstrap(
            session,
            cancel,
            self.capabilities.clone(),
            room_name.to_string(),
            container,
        ));
    }

    /// Unmount the view, disposing the widget if one was constructed.
    ///
    /// Safe to call in any state and more than once.
    #[instrument(skip(self), name = "session.view.unmount")]
    pub async fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.cancel.cancel();

        let widget = self.session.widget.lock().await.take();
        match widget {
            Some(widget) => {
                widget.dispose();
                info!(target: "session.bootstrap", "Widget disposed");
            }
            None => {
                debug!(target: "session.bootstrap", "Unmounted before a widget was constructed");
            }
        }

        self.session.state.send_replace(SessionState::Disposed);
    }
}

impl Drop for MeetingView {
    fn drop(&mut self) {
        if !self.mounted {
            return;
        }
        self.cancel.cancel();

        if let Ok(mut slot) = self.session.widget.try_lock() {
            if let Some(widget) = slot.take() {
                widget.dispose();
            }
        } else if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            // Construction in progress: dispose once the task releases the slot
            let session = self.session.clone();
            runtime.spawn(async move {
                if let Some(widget) = session.widget.lock().await.take() {
                    widget.dispose();
                }
            });
        } else {
            warn!(
                target: "session.bootstrap",
                "Meeting view dropped outside a runtime during widget construction"
            );
        }

        self.session.state.send_replace(SessionState::Disposed);
    }
}

/// Drive one session from credential fetch to a live widget.
async fn bootstrap(
    session: Arc<Session>,
    cancel: CancellationToken,
    capabilities: Capabilities,
    room_name: String,
    container: ContainerId,
) {
    let jwt = match capabilities.credentials.fetch(&room_name).await {
        Ok(jwt) => jwt,
        Err(e) => {
            warn!(
                target: "session.bootstrap",
                room = %room_name,
                error = %e,
                "Credential fetch failed"
            );
            session.advance(SessionState::Failed(CREDENTIAL_FAILURE_MESSAGE.to_string()));
            return;
        }
    };

    if cancel.is_cancelled() {
        debug!(
            target: "session.bootstrap",
            room = %room_name,
            "Credential arrived after unmount, ignoring"
        );
        return;
    }

    session.advance(SessionState::LoadingWidgetLibrary);

    let library = match capabilities.library.get().await {
        Ok(library) => library,
        Err(e) => {
            error!(target: "session.bootstrap", error = %e, "Failed to initialize widget library");
            session.advance(SessionState::Failed(
                INITIALIZATION_FAILURE_MESSAGE.to_string(),
            ));
            return;
        }
    };

    let mut slot = session.widget.lock().await;
    if cancel.is_cancelled() {
        debug!(
            target: "session.bootstrap",
            room = %room_name,
            "Unmounted before widget construction"
        );
        return;
    }

    session.advance(SessionState::Initializing);

    let options = WidgetOptions::new(
        &room_name,
        jwt.expose_secret().to_string(),
        container,
        &capabilities.config,
    );
    info!(
        target: "session.bootstrap",
        domain = %capabilities.config.domain,
        room = %options.room_name,
        "Initializing widget"
    );

    match library.create_session(&capabilities.config.domain, options) {
        Ok(widget) => {
            widget.add_event_listeners(logging_listener(&room_name));
            *slot = Some(widget);
            session.advance(SessionState::Live);
        }
        Err(e) => {
            error!(target: "session.bootstrap", error = %e, "Failed to initialize widget");
            session.advance(SessionState::Failed(
                INITIALIZATION_FAILURE_MESSAGE.to_string(),
            ));
        }
    }
}
