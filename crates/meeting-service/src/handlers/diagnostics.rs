//! Diagnostics handler.
//!
//! Reports which conferencing secrets are present without revealing them.

use crate::config::ConferencingSecrets;
use crate::models::{DiagnosticsResponse, EnvironmentStatus};
use crate::routes::AppState;
use axum::extract::State;
use axum::Json;
use common::secret::ExposeSecret;
use std::sync::Arc;
use tracing::instrument;

const SET: &str = "Set";
const MISSING: &str = "Missing";

/// Build the presence report for the configured secrets.
///
/// Only presence is reported, plus the private key's length so operators can
/// spot a truncated value.
pub fn environment_status(secrets: &ConferencingSecrets) -> EnvironmentStatus {
    let presence = |set: bool| if set { SET } else { MISSING }.to_string();

    let jitsi_private_key = match &secrets.private_key {
        Some(key) => format!("Set (length: {})", key.expose_secret().len()),
        None => MISSING.to_string(),
    };

    EnvironmentStatus {
        jitsi_app_id: presence(secrets.app_id.is_some()),
        jitsi_api_key: presence(secrets.api_key.is_some()),
        jitsi_private_key,
        all_vars_set: secrets.all_set(),
    }
}

/// Handler for GET /api/diagnostics
///
/// ## Example Response
///
/// ```json
/// {
///   "status": "ok",
///   "environment": {
///     "jitsi_app_id": "Set",
///     "jitsi_api_key": "Set",
///     "jitsi_private_key": "Set (length: 1704)",
///     "all_vars_set": true
///   },
///   "message": "All required environment variables are set"
/// }
/// ```
#[instrument(skip_all, name = "meeting.diagnostics")]
pub async fn diagnostics(State(state): State<Arc<AppState>>) -> Json<DiagnosticsResponse> {
    let environment = environment_status(&state.config.conferencing);

    let message = if environment.all_vars_set {
        "All required environment variables are set"
    } else {
        "Missing required environment variables"
    };

    Json(DiagnosticsResponse {
        status: "ok".to_string(),
        environment,
        message: message.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use common::secret::SecretString;

    #[test]
    fn test_environment_status_all_missing() {
        let status = environment_status(&ConferencingSecrets::default());

        assert_eq!(status.jitsi_app_id, "Missing");
        assert_eq!(status.jitsi_api_key, "Missing");
        assert_eq!(status.jitsi_private_key, "Missing");
        assert!(!status.all_vars_set);
    }

    #[test]
    fn test_environment_status_reports_key_length_only() {
        let secrets = ConferencingSecrets {
            app_id: Some("vpaas-magic-cookie-1234".to_string()),
            api_key: Some(SecretString::from("vpaas-magic-cookie-1234/4f4910")),
            private_key: Some(SecretString::from("0123456789")),
        };

        let status = environment_status(&secrets);

        assert_eq!(status.jitsi_app_id, "Set");
        assert_eq!(status.jitsi_api_key, "Set");
        assert_eq!(status.jitsi_private_key, "Set (length: 10)");
        assert!(status.all_vars_set);

        let json = serde_json::to_string(&status).unwrap();
        assert!(!json.contains("4f4910"));
        assert!(!json.contains("0123456789"));
    }
}
