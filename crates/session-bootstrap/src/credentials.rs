//! Credential retrieval.
//!
//! The view asks a [`CredentialSource`] for a room-scoped credential. The
//! HTTP implementation calls the meeting service's token endpoint.

use crate::errors::BootstrapError;
use async_trait::async_trait;
use common::jwt::peek_claims;
use common::secret::{ExposeSecret, SecretString};
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Default timeout for credential requests.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of room-scoped credentials.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Fetch a credential for `room_name` (unsanitized).
    ///
    /// # Errors
    ///
    /// `BootstrapError::Network` when no credential could be obtained.
    async fn fetch(&self, room_name: &str) -> Result<SecretString, BootstrapError>;
}

#[derive(Deserialize)]
struct TokenBody {
    jwt: SecretString,
}

/// Fetches credentials from `GET {base}/api/meetings/token/{roomName}`.
pub struct HttpCredentialSource {
    base_url: Url,
    http_client: reqwest::Client,
}

impl HttpCredentialSource {
    /// Create a source for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// `BootstrapError::Network` when `base_url` is not an absolute
    /// http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, BootstrapError> {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!(
                    target: "session.credentials",
                    error = %e,
                    "Failed to build HTTP client with custom config, using defaults"
                );
                reqwest::Client::new()
            });

        Self::with_client(base_url, http_client)
    }

    /// Create a source using an existing HTTP client.
    ///
    /// # Errors
    ///
    /// `BootstrapError::Network` when `base_url` is not an absolute
    /// http(s) URL.
    pub fn with_client(
        base_url: &str,
        http_client: reqwest::Client,
    ) -> Result<Self, BootstrapError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| BootstrapError::Network(format!("Invalid service URL: {e}")))?;

        if base_url.cannot_be_a_base() {
            return Err(BootstrapError::Network(
                "Invalid service URL: cannot be a base".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            http_client,
        })
    }

    /// Token endpoint for `room_name`, with the room as one encoded segment.
    pub fn token_url(&self, room_name: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "meetings", "token", room_name]);
        }
        url
    }
}

#[async_trait]
impl CredentialSource for HttpCredentialSource {
    #[instrument(skip(self), name = "session.credentials.fetch")]
    async fn fetch(&self, room_name: &str) -> Result<SecretString, BootstrapError> {
        let url = self.token_url(room_name);

        let response = self.http_client.get(url).send().await.map_err(|e| {
            warn!(target: "session.credentials", error = %e, "Credential request failed");
            BootstrapError::Network(format!("Credential request failed: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                target: "session.credentials",
                status = status.as_u16(),
                "Credential endpoint returned an error"
            );
            return Err(BootstrapError::Network(format!(
                "Credential endpoint returned {status}"
            )));
        }

        let body: TokenBody = response.json().await.map_err(|e| {
            warn!(target: "session.credentials", error = %e, "Credential response unparsable");
            BootstrapError::Network(format!("Invalid credential response: {e}"))
        })?;

        match peek_claims(body.jwt.expose_secret()) {
            Ok(claims) => debug!(
                target: "session.credentials",
                room = %claims.room,
                exp = claims.exp,
                "Credential received"
            ),
            Err(e) => debug!(
                target: "session.credentials",
                error = %e,
                "Credential received but not inspectable"
            ),
        }

        Ok(body.jwt)
    }
}
