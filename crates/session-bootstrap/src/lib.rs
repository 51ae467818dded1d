//! Session Bootstrap
//!
//! Client-side state machine that takes a meeting view from "mounted" to a
//! live embedded conferencing widget:
//!
//! ```text
//! Idle -> LoadingCredential -> LoadingWidgetLibrary -> Initializing -> Live -> Disposed
//!                    \________________ Failed ________________/
//! ```
//!
//! The widget library, the credential endpoint and the widget itself sit
//! behind capability traits so the flow runs without a browser.
//!
//! # Modules
//!
//! - `config` - Widget domain, script location and display defaults
//! - `credentials` - Credential source trait and HTTP implementation
//! - `errors` - Bootstrap error type and user-facing messages
//! - `library` - Widget library loader and the shared load cache
//! - `sanitize` - Room name sanitization for the conferencing backend
//! - `view` - The per-view state machine
//! - `widget` - Widget constructor options, events and handle traits

pub mod config;
pub mod credentials;
pub mod errors;
pub mod library;
pub mod mock;
pub mod sanitize;
pub mod view;
pub mod widget;

pub use config::BootstrapConfig;
pub use credentials::{CredentialSource, HttpCredentialSource};
pub use errors::BootstrapError;
pub use library::{LibraryLoader, WidgetLibraryCache};
pub use sanitize::sanitize_room_name;
pub use view::{MeetingView, SessionState};
pub use widget::{ContainerId, WidgetEvent, WidgetHandle, WidgetLibrary, WidgetOptions};
