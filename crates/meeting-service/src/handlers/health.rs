//! Health check handler.

use crate::models::HealthResponse;
use crate::routes::AppState;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;
use tracing::instrument;

/// Handler for GET /health
///
/// Liveness probe. Always 200 while the process serves requests; reports the
/// registry backend and whether credentials can be issued.
///
/// ## Example Response
///
/// ```json
/// {
///   "status": "healthy",
///   "registry": "memory",
///   "credentials": "configured"
/// }
/// ```
#[instrument(skip_all, name = "meeting.health.check")]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let credentials = if state.issuer.is_configured() {
        "configured"
    } else {
        "unconfigured"
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        registry: state.store.backend().to_string(),
        credentials: credentials.to_string(),
    })
}
