//! Meeting registry handlers.
//!
//! - `POST /api/meetings` - Register a meeting
//! - `GET /api/meetings/by-id/:id` - Look up by id
//! - `GET /api/meetings/by-room/:roomName` - Look up the first meeting with a room name

use crate::errors::ServiceError;
use crate::models::{CreateMeetingRequest, Meeting, NewMeeting};
use crate::routes::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use common::types::MeetingId;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Handler for POST /api/meetings
///
/// # Request Body
///
/// ```json
/// { "displayName": "Al", "roomName": "standup" }
/// ```
///
/// # Response
///
/// - 200 OK: The stored meeting
/// - 400 Bad Request: Malformed body or a length constraint failed; `{message}`
#[instrument(skip_all, name = "meeting.handlers.create")]
pub async fn create_meeting(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateMeetingRequest>, JsonRejection>,
) -> Result<Json<Meeting>, ServiceError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(
            target: "meeting.handlers",
            error = %rejection.body_text(),
            "Rejected malformed meeting request"
        );
        ServiceError::Validation(rejection.body_text())
    })?;

    let new_meeting = NewMeeting::try_from(request).map_err(|e| {
        warn!(target: "meeting.handlers", error = %e, "Meeting request failed validation");
        ServiceError::from(e)
    })?;

    let meeting = state.store.create(new_meeting).await?;

    info!(
        target: "meeting.handlers",
        meeting_id = %meeting.id,
        room_name = %meeting.room_name,
        "Meeting created"
    );

    Ok(Json(meeting))
}

/// Handler for GET /api/meetings/by-id/:id
///
/// - 200 OK: The meeting
/// - 400 Bad Request: The id is not an integer; `{message}`
/// - 404 Not Found: No meeting with that id
#[instrument(skip_all, name = "meeting.handlers.get_by_id")]
pub async fn get_meeting_by_id(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Meeting>, ServiceError> {
    let Path(id) = id.map_err(|rejection| {
        warn!(
            target: "meeting.handlers",
            error = %rejection.body_text(),
            "Rejected malformed meeting id"
        );
        ServiceError::Validation(rejection.body_text())
    })?;

    state
        .store
        .get_by_id(MeetingId(id))
        .await?
        .map(Json)
        .ok_or_else(|| ServiceError::NotFound("Meeting not found".to_string()))
}

/// Handler for GET /api/meetings/by-room/:roomName
///
/// Room names are not unique; the earliest registered meeting wins.
///
/// - 200 OK: The meeting
/// - 404 Not Found: No meeting with that room name
#[instrument(skip(state), name = "meeting.handlers.get_by_room")]
pub async fn get_meeting_by_room_name(
    State(state): State<Arc<AppState>>,
    Path(room_name): Path<String>,
) -> Result<Json<Meeting>, ServiceError> {
    state
        .store
        .get_by_room_name(&room_name)
        .await?
        .map(Json)
        .ok_or_else(|| ServiceError::NotFound("Meeting not found".to_string()))
}
