//! Conferencing credential claims shared by the issuer and the client.
//!
//! The conferencing backend accepts RS256 tokens whose payload carries the
//! room scope, a fixed audience/issuer pair, and an embedded user context.
//! This module owns the wire shape of that payload so the server-side issuer
//! and the client-side bootstrap agree on it.
//!
//! It also provides unverified inspection helpers ([`extract_kid`] and
//! [`peek_claims`]). These do NOT check the signature; the relying party
//! (the conferencing backend) is the only verifier.
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing
//! - The `sub` field (derived from the operator key id) is redacted in Debug output

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Audience claim identifying the conferencing backend.
pub const CREDENTIAL_AUDIENCE: &str = "jitsi";

/// Issuer claim expected by the conferencing backend.
pub const CREDENTIAL_ISSUER: &str = "chat";

/// Lifetime of an issued credential (24 hours).
pub const CREDENTIAL_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

/// Display name embedded in the credential's user context.
pub const HOST_DISPLAY_NAME: &str = "Meeting Host";

/// Synthetic user id embedded in the credential's user context.
pub const HOST_USER_ID: &str = "host";

/// Maximum token size accepted by the inspection helpers (8KB).
///
/// Issued credentials are well under 1KB; anything larger is rejected before
/// base64 decoding.
pub const MAX_JWT_SIZE_BYTES: usize = 8192;

// =============================================================================
// Error Types
// =============================================================================

/// Errors from unverified token inspection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenInspectionError {
    /// Token size exceeds maximum allowed.
    #[error("Token exceeds {MAX_JWT_SIZE_BYTES} bytes")]
    TokenTooLarge,

    /// Token is not a three-part JWT or a part is not valid base64/JSON.
    #[error("Token is malformed")]
    MalformedToken,

    /// Header has no usable `kid`.
    #[error("Token header has no key id")]
    MissingKid,
}

// =============================================================================
// Claims Types
// =============================================================================

/// Payload of a room-scoped conferencing credential.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialClaims {
    /// Audience, always [`CREDENTIAL_AUDIENCE`].
    pub aud: String,

    /// Issuer, always [`CREDENTIAL_ISSUER`].
    pub iss: String,

    /// Subject: the operator key id. Redacted in Debug output.
    pub sub: String,

    /// Room the credential is scoped to, exactly as requested (unsanitized).
    pub room: String,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,

    /// Embedded user context and feature flags.
    pub context: CredentialContext,
}

impl fmt::Debug for CredentialClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialClaims")
            .field("aud", &self.aud)
            .field("iss", &self.iss)
            .field("sub", &"[REDACTED]")
            .field("room", &self.room)
            .field("exp", &self.exp)
            .field("context", &self.context)
            .finish()
    }
}

impl CredentialClaims {
    /// Build the moderator credential payload for `room`.
    ///
    /// `issued_at` is Unix epoch seconds; `exp` is derived from it using
    /// [`CREDENTIAL_LIFETIME`].
    #[must_use]
    pub fn moderator(kid: &str, room: &str, issued_at: i64) -> Self {
        let lifetime = i64::try_from(CREDENTIAL_LIFETIME.as_secs()).unwrap_or(i64::MAX);

        Self {
            aud: CREDENTIAL_AUDIENCE.to_string(),
            iss: CREDENTIAL_ISSUER.to_string(),
            sub: kid.to_string(),
            room: room.to_string(),
            exp: issued_at.saturating_add(lifetime),
            context: CredentialContext {
                user: CredentialUser::host(),
                features: CredentialFeatures::default(),
            },
        }
    }
}

/// Context block of the credential payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialContext {
    pub user: CredentialUser,
    pub features: CredentialFeatures,
}

/// User identity embedded in the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialUser {
    /// Grants moderator privileges inside the conferencing backend.
    pub moderator: bool,
    pub name: String,
    pub id: String,
    pub avatar: String,
    pub email: String,
}

impl CredentialUser {
    /// The fixed synthetic host identity.
    #[must_use]
    pub fn host() -> Self {
        Self {
            moderator: true,
            name: HOST_DISPLAY_NAME.to_string(),
            id: HOST_USER_ID.to_string(),
            avatar: String::new(),
            email: String::new(),
        }
    }
}

/// Backend feature flags. All are disabled for issued credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct CredentialFeatures {
    pub livestreaming: bool,
    pub recording: bool,
    pub transcription: bool,
    #[serde(rename = "outbound-call")]
    pub outbound_call: bool,
}

// =============================================================================
// Functions
// =============================================================================

/// Split a compact JWT into its three base64url parts after the size check.
fn split_token(token: &str) -> Result<(&str, &str), TokenInspectionError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "common.jwt",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(TokenInspectionError::TokenTooLarge);
    }

    let mut parts = token.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(payload), Some(_signature), None) => Ok((header, payload)),
        _ => {
            tracing::debug!(target: "common.jwt", "Token rejected: invalid JWT format");
            Err(TokenInspectionError::MalformedToken)
        }
    }
}

fn decode_part(part: &str) -> Result<serde_json::Value, TokenInspectionError> {
    let bytes = URL_SAFE_NO_PAD.decode(part).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Failed to decode JWT part base64");
        TokenInspectionError::MalformedToken
    })?;

    serde_json::from_slice(&bytes).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Failed to parse JWT part JSON");
        TokenInspectionError::MalformedToken
    })
}

/// Extract the `kid` (key ID) from a JWT header without verifying the signature.
///
/// # Errors
///
/// - `TokenTooLarge` - Token exceeds [`MAX_JWT_SIZE_BYTES`]
/// - `MalformedToken` - Wrong structure, bad base64, or invalid JSON
/// - `MissingKid` - Header has no `kid`, or it is empty or not a string
pub fn extract_kid(token: &str) -> Result<String, TokenInspectionError> {
    let (header_part, _) = split_token(token)?;
    let header = decode_part(header_part)?;

    header
        .get("kid")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .ok_or(TokenInspectionError::MissingKid)
}

/// Decode the credential payload without verifying the signature.
///
/// Used by clients to read the room scope for logging; never for authorization.
///
/// # Errors
///
/// - `TokenTooLarge` - Token exceeds [`MAX_JWT_SIZE_BYTES`]
/// - `MalformedToken` - Wrong structure or the payload is not a credential
pub fn peek_claims(token: &str) -> Result<CredentialClaims, TokenInspectionError> {
    let (_, payload_part) = split_token(token)?;
    let payload = decode_part(payload_part)?;

    serde_json::from_value(payload).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "JWT payload is not a credential");
        TokenInspectionError::MalformedToken
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn encode_json(value: &serde_json::Value) -> String {
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(value).unwrap())
    }

    fn token_with(header: &serde_json::Value, payload: &serde_json::Value) -> String {
        format!("{}.{}.signature", encode_json(header), encode_json(payload))
    }

    // -------------------------------------------------------------------------
    // Claims Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_credential_lifetime_is_24_hours() {
        assert_eq!(CREDENTIAL_LIFETIME, Duration::from_secs(86_400));
    }

    #[test]
    fn test_moderator_claims_shape() {
        let claims = CredentialClaims::moderator("kid-01", "standup", 1_700_000_000);

        assert_eq!(claims.aud, "jitsi");
        assert_eq!(claims.iss, "chat");
        assert_eq!(claims.sub, "kid-01");
        assert_eq!(claims.room, "standup");
        assert_eq!(claims.exp, 1_700_000_000 + 86_400);
        assert!(claims.context.user.moderator);
        assert_eq!(claims.context.user.name, "Meeting Host");
        assert_eq!(claims.context.user.id, "host");
        assert!(claims.context.user.avatar.is_empty());
        assert!(claims.context.user.email.is_empty());
        assert_eq!(claims.context.features, CredentialFeatures::default());
    }

    #[test]
    fn test_claims_serialize_to_backend_shape() {
        let claims = CredentialClaims::moderator("kid-01", "team sync!", 0);
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["room"], "team sync!");
        assert_eq!(json["context"]["user"]["moderator"], true);
        assert_eq!(json["context"]["features"]["outbound-call"], false);
        assert_eq!(json["context"]["features"]["livestreaming"], false);
        assert!(json["context"]["features"].get("outbound_call").is_none());
    }

    #[test]
    fn test_claims_debug_redacts_sub() {
        let claims = CredentialClaims::moderator("secret-kid-value", "standup", 0);
        let debug = format!("{claims:?}");

        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("secret-kid-value"));
        assert!(debug.contains("standup"));
    }

    // -------------------------------------------------------------------------
    // extract_kid Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_extract_kid_valid_token() {
        let token = token_with(
            &serde_json::json!({"alg": "RS256", "typ": "JWT", "kid": "kid-01"}),
            &serde_json::json!({}),
        );

        assert_eq!(extract_kid(&token).unwrap(), "kid-01");
    }

    #[test]
    fn test_extract_kid_missing_kid() {
        let token = token_with(
            &serde_json::json!({"alg": "RS256", "typ": "JWT"}),
            &serde_json::json!({}),
        );

        assert_eq!(extract_kid(&token), Err(TokenInspectionError::MissingKid));
    }

    #[test]
    fn test_extract_kid_empty_kid() {
        let token = token_with(
            &serde_json::json!({"alg": "RS256", "kid": ""}),
            &serde_json::json!({}),
        );

        assert_eq!(extract_kid(&token), Err(TokenInspectionError::MissingKid));
    }

    #[test]
    fn test_extract_kid_malformed_token() {
        assert_eq!(
            extract_kid("not-a-jwt"),
            Err(TokenInspectionError::MalformedToken)
        );
        assert_eq!(extract_kid(""), Err(TokenInspectionError::MalformedToken));
        assert_eq!(
            extract_kid("a.b.c.d"),
            Err(TokenInspectionError::MalformedToken)
        );
    }

    #[test]
    fn test_extract_kid_invalid_base64() {
        assert_eq!(
            extract_kid("!!!invalid!!!.payload.signature"),
            Err(TokenInspectionError::MalformedToken)
        );
    }

    #[test]
    fn test_extract_kid_oversized_token() {
        let oversized = "a".repeat(MAX_JWT_SIZE_BYTES + 1);
        assert_eq!(
            extract_kid(&oversized),
            Err(TokenInspectionError::TokenTooLarge)
        );
    }

    // -------------------------------------------------------------------------
    // peek_claims Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_peek_claims_reads_room() {
        let claims = CredentialClaims::moderator("kid-01", "team sync!", 100);
        let token = token_with(
            &serde_json::json!({"alg": "RS256", "kid": "kid-01"}),
            &serde_json::to_value(&claims).unwrap(),
        );

        let peeked = peek_claims(&token).unwrap();
        assert_eq!(peeked, claims);
        assert_eq!(peeked.room, "team sync!");
    }

    #[test]
    fn test_peek_claims_rejects_foreign_payload() {
        let token = token_with(
            &serde_json::json!({"alg": "RS256"}),
            &serde_json::json!({"sub": "someone", "scope": "read"}),
        );

        assert_eq!(
            peek_claims(&token),
            Err(TokenInspectionError::MalformedToken)
        );
    }
}
