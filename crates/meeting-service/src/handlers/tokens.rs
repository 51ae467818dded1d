//! Credential handler.

use crate::errors::ServiceError;
use crate::models::TokenResponse;
use crate::routes::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::instrument;

/// Handler for GET /api/meetings/token/:roomName
///
/// Issues a moderator credential scoped to the (percent-decoded) room name.
/// The room does not need to be registered.
///
/// # Response
///
/// - 200 OK: `{ "jwt": "<credential>" }`
/// - 500: Secrets missing/invalid or signing failed; `{message}`
#[instrument(skip(state), name = "meeting.handlers.token")]
pub async fn get_token(
    State(state): State<Arc<AppState>>,
    Path(room_name): Path<String>,
) -> Result<Json<TokenResponse>, ServiceError> {
    let jwt = state.issuer.issue(&room_name)?;
    Ok(Json(TokenResponse { jwt }))
}
