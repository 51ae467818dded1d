//! Meeting service models.
//!
//! Contains the registry entity, request/response bodies, and the validated
//! input type accepted by registry stores.

use chrono::{DateTime, Utc};
use common::types::MeetingId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum room name length (Unicode scalar values).
pub const MIN_ROOM_NAME_LENGTH: usize = 3;

/// Minimum display name length (Unicode scalar values).
pub const MIN_DISPLAY_NAME_LENGTH: usize = 2;

// ============================================================================
// Registry Entity
// ============================================================================

/// A registered meeting room.
///
/// Created once by a registry store and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    /// Registry-assigned sequential id.
    pub id: MeetingId,

    /// Room name as submitted. Not unique across meetings.
    pub room_name: String,

    /// Name shown for the meeting.
    pub display_name: String,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Meeting input validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Display name must be at least 2 characters")]
    DisplayNameTooShort,

    #[error("Room name must be at least 3 characters")]
    RoomNameTooShort,
}

/// Validated meeting input.
///
/// The only way to obtain one is [`NewMeeting::new`], so registry stores
/// cannot be handed a record that violates the length invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMeeting {
    room_name: String,
    display_name: String,
}

impl NewMeeting {
    /// Validate and build meeting input.
    ///
    /// The display name is checked first.
    ///
    /// # Errors
    ///
    /// Returns the first length constraint that fails.
    pub fn new(
        room_name: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let room_name = room_name.into();
        let display_name = display_name.into();

        if display_name.chars().count() < MIN_DISPLAY_NAME_LENGTH {
            return Err(ValidationError::DisplayNameTooShort);
        }

        if room_name.chars().count() < MIN_ROOM_NAME_LENGTH {
            return Err(ValidationError::RoomNameTooShort);
        }

        Ok(Self {
            room_name,
            display_name,
        })
    }

    pub fn room_name(&self) -> &str {
        &self.room_name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Stamp the input with registry-assigned identity.
    pub fn into_meeting(self, id: MeetingId, created_at: DateTime<Utc>) -> Meeting {
        Meeting {
            id,
            room_name: self.room_name,
            display_name: self.display_name,
            created_at,
        }
    }
}

// ============================================================================
// API Models
// ============================================================================

/// Request body for `POST /api/meetings`.
///
/// Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMeetingRequest {
    pub display_name: String,
    pub room_name: String,
}

impl TryFrom<CreateMeetingRequest> for NewMeeting {
    type Error = ValidationError;

    fn try_from(request: CreateMeetingRequest) -> Result<Self, Self::Error> {
        NewMeeting::new(request.room_name, request.display_name)
    }
}

/// Response for `GET /api/meetings/token/:roomName`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Signed conferencing credential.
    pub jwt: String,
}

/// Presence report for the conferencing secrets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentStatus {
    /// "Set" or "Missing".
    pub jitsi_app_id: String,

    /// "Set" or "Missing".
    pub jitsi_api_key: String,

    /// "Set (length: N)" or "Missing".
    pub jitsi_private_key: String,

    pub all_vars_set: bool,
}

/// Response for `GET /api/diagnostics`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsResponse {
    pub status: String,
    pub environment: EnvironmentStatus,
    pub message: String,
}

/// Health check response.
///
/// Returned by the `/health` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service health status.
    pub status: String,

    /// Registry backend ("memory" or "postgres").
    pub registry: String,

    /// "configured" when credentials can be issued, "unconfigured" otherwise.
    pub credentials: String,
}
