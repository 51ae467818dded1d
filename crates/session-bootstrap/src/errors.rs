//! Session bootstrap error types.

use thiserror::Error;

/// Shown when the credential could not be obtained.
pub const CREDENTIAL_FAILURE_MESSAGE: &str =
    "Failed to obtain JWT token. Please check your server configuration.";

/// Shown when the widget library could not be loaded or the widget could not
/// be constructed.
pub const INITIALIZATION_FAILURE_MESSAGE: &str =
    "Failed to initialize the meeting. Please try again.";

/// Bootstrap failures. None of them are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BootstrapError {
    /// Credential fetch or library load failed.
    #[error("Network error: {0}")]
    Network(String),

    /// The widget library rejected construction.
    #[error("Widget error: {0}")]
    Widget(String),
}
