//! Test server harness for E2E testing
//!
//! Provides `TestMeetingServer` for spawning real meeting service instances
//! in tests.

use meeting_service::config::{ConferencingSecrets, Config};
use meeting_service::repositories::{InMemoryMeetingStore, MeetingStore, PgMeetingStore};
use meeting_service::routes::{self, AppState};
use metrics_exporter_prometheus::PrometheusBuilder;
use sqlx::PgPool;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Test harness for spawning the meeting service in E2E tests.
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_register_meeting_e2e() -> Result<()> {
///     let server = TestMeetingServer::spawn().await?;
///     let client = reqwest::Client::new();
///
///     let response = client
///         .post(format!("{}/api/meetings", server.url()))
///         .json(&serde_json::json!({"displayName": "Al", "roomName": "standup"}))
///         .send()
///         .await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestMeetingServer {
    addr: SocketAddr,
    state: Arc<AppState>,
    handle: JoinHandle<()>,
}

impl TestMeetingServer {
    /// Spawn a server with an in-memory registry and no conferencing secrets.
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_with_secrets(ConferencingSecrets::default()).await
    }

    /// Spawn a server with an in-memory registry and the given secrets.
    pub async fn spawn_with_secrets(secrets: ConferencingSecrets) -> Result<Self, anyhow::Error> {
        Self::spawn_with(secrets, Arc::new(InMemoryMeetingStore::new())).await
    }

    /// Spawn a server backed by PostgreSQL (typically a `#[sqlx::test]` pool).
    pub async fn spawn_with_pool(
        pool: PgPool,
        secrets: ConferencingSecrets,
    ) -> Result<Self, anyhow::Error> {
        Self::spawn_with(secrets, Arc::new(PgMeetingStore::new(pool))).await
    }

    /// Spawn a server with the given secrets and registry store.
    ///
    /// The server binds to a random port on 127.0.0.1 and runs in the
    /// background until the harness is dropped.
    pub async fn spawn_with(
        secrets: ConferencingSecrets,
        store: Arc<dyn MeetingStore>,
    ) -> Result<Self, anyhow::Error> {
        let vars = HashMap::from([("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string())]);

        let mut config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;
        config.conferencing = secrets;

        let state = Arc::new(AppState::new(config, store));

        // Recorder is not installed globally so parallel tests don't collide
        let metrics_handle = PrometheusBuilder::new().build_recorder().handle();

        let app = routes::build_routes(state.clone(), metrics_handle);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            state,
            handle,
        })
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get the shared application state.
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }
}

impl Drop for TestMeetingServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_server_spawns_successfully() -> Result<(), anyhow::Error> {
        let server = TestMeetingServer::spawn().await?;

        assert!(server.url().starts_with("http://127.0.0.1:"));

        let response = reqwest::get(format!("{}/health", server.url())).await?;
        assert_eq!(response.status(), 200);

        let body: serde_json::Value = response.json().await?;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["registry"], "memory");

        Ok(())
    }

    #[tokio::test]
    async fn test_server_provides_addr() -> Result<(), anyhow::Error> {
        let server = TestMeetingServer::spawn().await?;
        let addr = server.addr();

        assert!(addr.ip().is_loopback());
        assert!(addr.port() > 0);
        assert_eq!(server.url(), format!("http://{}", addr));

        Ok(())
    }

    #[tokio::test]
    async fn test_server_with_secrets_is_configured() -> Result<(), anyhow::Error> {
        let server =
            TestMeetingServer::spawn_with_secrets(crate::crypto_fixtures::test_secrets()).await?;

        assert!(server.state().issuer.is_configured());

        Ok(())
    }
}
