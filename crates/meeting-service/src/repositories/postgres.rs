//! PostgreSQL-backed registry store.
//!
//! Id allocation is delegated to the `BIGSERIAL` sequence, which keeps ids
//! unique across service processes. All queries are parameterized.

use crate::errors::ServiceError;
use crate::models::{Meeting, NewMeeting};
use crate::observability::metrics;
use crate::repositories::meetings::MeetingStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::types::MeetingId;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::time::Instant;
use tracing::instrument;

/// Registry store backed by the `meetings` table.
#[derive(Clone)]
pub struct PgMeetingStore {
    pool: PgPool,
}

impl PgMeetingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_row_to_meeting(row: &PgRow) -> Result<Meeting, ServiceError> {
    let id: i64 = row.try_get("id")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    Ok(Meeting {
        id: MeetingId(id),
        room_name: row.try_get("room_name")?,
        display_name: row.try_get("display_name")?,
        created_at,
    })
}

#[async_trait]
impl MeetingStore for PgMeetingStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    #[instrument(skip_all, name = "meeting.registry.create")]
    async fn create(&self, meeting: NewMeeting) -> Result<Meeting, ServiceError> {
        let start = Instant::now();

        let result = sqlx::query(
            r#"
            INSERT INTO meetings (room_name, display_name)
            VALUES ($1, $2)
            RETURNING id, room_name, display_name, created_at
            "#,
        )
        .bind(meeting.room_name())
        .bind(meeting.display_name())
        .fetch_one(&self.pool)
        .await;

        let status = if result.is_ok() { "success" } else { "error" };
        metrics::record_db_query("create_meeting", status, start.elapsed());

        let meeting = map_row_to_meeting(&result?)?;

        tracing::debug!(
            target: "meeting.registry",
            meeting_id = %meeting.id,
            backend = "postgres",
            "Meeting stored"
        );
        metrics::record_meeting_created(self.backend());

        Ok(meeting)
    }

    async fn get_by_id(&self, id: MeetingId) -> Result<Option<Meeting>, ServiceError> {
        let start = Instant::now();

        let result = sqlx::query(
            r#"
            SELECT id, room_name, display_name, created_at
            FROM meetings
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await;

        let status = if result.is_ok() { "success" } else { "error" };
        metrics::record_db_query("get_meeting_by_id", status, start.elapsed());

        result?.as_ref().map(map_row_to_meeting).transpose()
    }

    async fn get_by_room_name(&self, room_name: &str) -> Result<Option<Meeting>, ServiceError> {
        let start = Instant::now();

        let result = sqlx::query(
            r#"
            SELECT id, room_name, display_name, created_at
            FROM meetings
            WHERE room_name = $1
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .bind(room_name)
        .fetch_optional(&self.pool)
        .await;

        let status = if result.is_ok() { "success" } else { "error" };
        metrics::record_db_query("get_meeting_by_room_name", status, start.elapsed());

        result?.as_ref().map(map_row_to_meeting).transpose()
    }
}
