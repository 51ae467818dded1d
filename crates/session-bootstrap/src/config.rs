//! Session bootstrap configuration.
//!
//! Defaults match the hosted conferencing deployment; each value can be
//! overridden from the environment.

use std::collections::HashMap;
use std::env;
use thiserror::Error;

/// Default conferencing domain.
pub const DEFAULT_DOMAIN: &str = "8x8.vc";

/// Default widget library script.
pub const DEFAULT_SCRIPT_URL: &str = "https://8x8.vc/external_api.js";

/// Default display name for the local participant.
pub const DEFAULT_DISPLAY_NAME: &str = "Meeting Participant";

/// Default widget size (CSS).
pub const DEFAULT_WIDGET_SIZE: &str = "100%";

/// Environment variable overriding the conferencing domain.
pub const DOMAIN_VAR: &str = "JITSI_DOMAIN";

/// Environment variable overriding the widget library script.
pub const SCRIPT_URL_VAR: &str = "JITSI_SCRIPT_URL";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BootstrapConfigError {
    #[error("{DOMAIN_VAR} environment variable is not set")]
    MissingDomain,

    #[error("{SCRIPT_URL_VAR} environment variable is not set")]
    MissingScriptUrl,
}

/// Widget bootstrap settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
    /// Conferencing domain handed to the widget constructor.
    pub domain: String,

    /// Script that provides the widget library.
    pub script_url: String,

    /// Display name for the local participant.
    pub display_name: String,

    /// Widget width (CSS).
    pub width: String,

    /// Widget height (CSS).
    pub height: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            domain: DEFAULT_DOMAIN.to_string(),
            script_url: DEFAULT_SCRIPT_URL.to_string(),
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            width: DEFAULT_WIDGET_SIZE.to_string(),
            height: DEFAULT_WIDGET_SIZE.to_string(),
        }
    }
}

impl BootstrapConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Fails when an override variable is present but empty.
    pub fn from_env() -> Result<Self, BootstrapConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a `HashMap` (for testing).
    ///
    /// # Errors
    ///
    /// Fails when an override variable is present but empty.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, BootstrapConfigError> {
        let mut config = Self::default();

        if let Some(domain) = vars.get(DOMAIN_VAR) {
            if domain.trim().is_empty() {
                return Err(BootstrapConfigError::MissingDomain);
            }
            config.domain.clone_from(domain);
        }

        if let Some(script_url) = vars.get(SCRIPT_URL_VAR) {
            if script_url.trim().is_empty() {
                return Err(BootstrapConfigError::MissingScriptUrl);
            }
            config.script_url.clone_from(script_url);
        }

        Ok(config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BootstrapConfig::from_vars(&HashMap::new()).unwrap();

        assert_eq!(config.domain, "8x8.vc");
        assert_eq!(config.script_url, "https://8x8.vc/external_api.js");
        assert_eq!(config.display_name, "Meeting Participant");
        assert_eq!(config.width, "100%");
        assert_eq!(config.height, "100%");
    }

    #[test]
    fn test_overrides() {
        let vars = HashMap::from([
            (DOMAIN_VAR.to_string(), "meet.example.org".to_string()),
            (
                SCRIPT_URL_VAR.to_string(),
                "https://meet.example.org/external_api.js".to_string(),
            ),
        ]);

        let config = BootstrapConfig::from_vars(&vars).unwrap();
        assert_eq!(config.domain, "meet.example.org");
        assert_eq!(config.script_url, "https://meet.example.org/external_api.js");
    }

    #[test]
    fn test_empty_domain_is_rejected() {
        let vars = HashMap::from([(DOMAIN_VAR.to_string(), " ".to_string())]);

        let err = BootstrapConfig::from_vars(&vars).unwrap_err();
        assert_eq!(err, BootstrapConfigError::MissingDomain);
        assert_eq!(err.to_string(), "JITSI_DOMAIN environment variable is not set");
    }
}
