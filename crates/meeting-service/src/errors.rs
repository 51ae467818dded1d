//! Meeting service error types.
//!
//! All errors map to HTTP status codes via the `IntoResponse` impl.
//! Storage and internal failures return a generic message to clients;
//! the actual error is logged server-side.

use crate::models::ValidationError;
use crate::services::credential_issuer::CredentialError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Meeting service error type.
///
/// Maps to HTTP status codes:
/// - Validation: 400 Bad Request
/// - NotFound: 404 Not Found
/// - Configuration, Signing, Database, Internal: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error")]
    Internal,
}

#[derive(Serialize)]
struct ErrorResponse {
    message: String,
    code: &'static str,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ServiceError::Validation(reason) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", reason.clone())
            }
            ServiceError::NotFound(resource) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", resource.clone())
            }
            ServiceError::Configuration(reason) => {
                tracing::error!(
                    target: "meeting.credentials",
                    reason = %reason,
                    "Credential issuance misconfigured"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    reason.clone(),
                )
            }
            ServiceError::Signing(reason) => {
                tracing::error!(
                    target: "meeting.credentials",
                    reason = %reason,
                    "Credential signing failed"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SIGNING_ERROR",
                    reason.clone(),
                )
            }
            ServiceError::Database(err) => {
                // Log actual error server-side, return generic message to client
                tracing::error!(
                    target: "meeting.registry",
                    error = %err,
                    "Registry operation failed"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "An internal database error occurred".to_string(),
                )
            }
            ServiceError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        };

        (status, Json(ErrorResponse { message, code })).into_response()
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

impl From<CredentialError> for ServiceError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Configuration(reason) => ServiceError::Configuration(reason),
            CredentialError::Signing(reason) => ServiceError::Signing(reason),
        }
    }
}

/// Convert sqlx errors to ServiceError
impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        ServiceError::Database(err.to_string())
    }
}
