//! Meeting service configuration.
//!
//! Configuration is loaded from environment variables. All sensitive
//! fields are redacted in Debug output.
//!
//! The conferencing secrets are optional at load time: a deployment may
//! start without them and only fail when a credential is requested.

use common::secret::SecretString;
use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:5000";

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Default graceful shutdown drain period in seconds.
pub const DEFAULT_DRAIN_SECONDS: u64 = 0;

/// Environment variable holding the conferencing application id.
pub const JITSI_APP_ID_VAR: &str = "JITSI_APP_ID";

/// Environment variable holding the conferencing API key.
pub const JITSI_API_KEY_VAR: &str = "JITSI_API_KEY";

/// Environment variable holding the RSA signing key.
pub const JITSI_PRIVATE_KEY_VAR: &str = "JITSI_PRIVATE_KEY";

/// Operator-held secrets for the conferencing backend.
///
/// Each field is `None` when the variable is unset or empty.
#[derive(Clone, Default)]
pub struct ConferencingSecrets {
    /// Application identifier.
    pub app_id: Option<String>,

    /// API key; the key id is the suffix after the last `/`.
    pub api_key: Option<SecretString>,

    /// RSA private key, PEM or bare base64 body.
    pub private_key: Option<SecretString>,
}

impl fmt::Debug for ConferencingSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let presence = |set: bool| if set { "Set" } else { "Missing" };
        f.debug_struct("ConferencingSecrets")
            .field("app_id", &presence(self.app_id.is_some()))
            .field("api_key", &presence(self.api_key.is_some()))
            .field("private_key", &presence(self.private_key.is_some()))
            .finish()
    }
}

impl ConferencingSecrets {
    /// Names of the variables that are not set.
    pub fn missing_vars(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.app_id.is_none() {
            missing.push(JITSI_APP_ID_VAR);
        }
        if self.api_key.is_none() {
            missing.push(JITSI_API_KEY_VAR);
        }
        if self.private_key.is_none() {
            missing.push(JITSI_PRIVATE_KEY_VAR);
        }
        missing
    }

    /// Whether all three secrets are present.
    pub fn all_set(&self) -> bool {
        self.missing_vars().is_empty()
    }
}

/// Meeting service configuration.
#[derive(Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:5000").
    pub bind_address: String,

    /// PostgreSQL connection URL. When absent the in-memory registry is used.
    pub database_url: Option<String>,

    /// Per-request timeout in seconds.
    pub request_timeout_seconds: u64,

    /// Drain period after a shutdown signal, in seconds.
    pub drain_seconds: u64,

    /// Conferencing backend secrets.
    pub conferencing: ConferencingSecrets,
}

/// Custom Debug implementation that redacts sensitive fields.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("drain_seconds", &self.drain_seconds)
            .field("conferencing", &self.conferencing)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid request timeout configuration: {0}")]
    InvalidRequestTimeout(String),

    #[error("Invalid drain period configuration: {0}")]
    InvalidDrainSeconds(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| vars.get(key).filter(|v| !v.is_empty()).cloned();

        let bind_address =
            non_empty("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let database_url = non_empty("DATABASE_URL");

        let request_timeout_seconds =
            if let Some(value_str) = vars.get("REQUEST_TIMEOUT_SECONDS") {
                let value: u64 = value_str.parse().map_err(|e| {
                    ConfigError::InvalidRequestTimeout(format!(
                        "REQUEST_TIMEOUT_SECONDS must be a valid positive integer, got '{}': {}",
                        value_str, e
                    ))
                })?;

                if value == 0 {
                    return Err(ConfigError::InvalidRequestTimeout(
                        "REQUEST_TIMEOUT_SECONDS must be greater than 0".to_string(),
                    ));
                }

                value
            } else {
                DEFAULT_REQUEST_TIMEOUT_SECONDS
            };

        let drain_seconds = if let Some(value_str) = vars.get("DRAIN_SECONDS") {
            value_str.parse().map_err(|e| {
                ConfigError::InvalidDrainSeconds(format!(
                    "DRAIN_SECONDS must be a valid non-negative integer, got '{}': {}",
                    value_str, e
                ))
            })?
        } else {
            DEFAULT_DRAIN_SECONDS
        };

        let conferencing = ConferencingSecrets {
            app_id: non_empty(JITSI_APP_ID_VAR),
            api_key: non_empty(JITSI_API_KEY_VAR).map(SecretString::from),
            private_key: non_empty(JITSI_PRIVATE_KEY_VAR).map(SecretString::from),
        };

        Ok(Config {
            bind_address,
            database_url,
            request_timeout_seconds,
            drain_seconds,
            conferencing,
        })
    }
}
