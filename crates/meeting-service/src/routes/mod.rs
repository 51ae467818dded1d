//! HTTP routes for the meeting service.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::handlers;
use crate::middleware::http_metrics_middleware;
use crate::repositories::MeetingStore;
use crate::services::CredentialIssuer;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Config,

    /// Meeting registry backend.
    pub store: Arc<dyn MeetingStore>,

    /// Credential issuer, built once from `config.conferencing`.
    pub issuer: Arc<CredentialIssuer>,
}

impl AppState {
    /// Build state from configuration and a registry store.
    pub fn new(config: Config, store: Arc<dyn MeetingStore>) -> Self {
        let issuer = Arc::new(CredentialIssuer::new(&config.conferencing));
        Self {
            config,
            store,
            issuer,
        }
    }
}

/// Build the application routes.
///
/// - `/health` - Liveness probe
/// - `/metrics` - Prometheus scrape endpoint
/// - `/api/diagnostics` - Secret presence report
/// - `POST /api/meetings` - Register a meeting
/// - `/api/meetings/by-id/:id` - Look up a meeting by id
/// - `/api/meetings/by-room/:roomName` - Look up a meeting by room name
/// - `/api/meetings/token/:roomName` - Issue a moderator credential
///
/// Layers: TraceLayer, per-request timeout, HTTP metrics (outermost).
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_seconds);

    let api_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/diagnostics", get(handlers::diagnostics))
        .route("/api/meetings", post(handlers::create_meeting))
        .route("/api/meetings/by-id/:id", get(handlers::get_meeting_by_id))
        .route(
            "/api/meetings/by-room/:room_name",
            get(handlers::get_meeting_by_room_name),
        )
        .route("/api/meetings/token/:room_name", get(handlers::get_token))
        .with_state(state);

    // Metrics route carries its own state
    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer (innermost)
    // 2. TraceLayer
    // 3. http_metrics_middleware (outermost)
    api_routes
        .merge(metrics_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .layer(middleware::from_fn(http_metrics_middleware))
}
