//! Registry store contract and the in-memory implementation.
//!
//! Ids are allocated sequentially from 1, advance on every create, and are
//! never reused. Room names are not unique: `get_by_room_name` returns the
//! earliest-created match.

use crate::errors::ServiceError;
use crate::models::{Meeting, NewMeeting};
use crate::observability::metrics;
use async_trait::async_trait;
use chrono::Utc;
use common::types::MeetingId;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::{debug, error, instrument};

/// Registry store operations (enables swapping backends and mocking).
#[async_trait]
pub trait MeetingStore: Send + Sync {
    /// Short backend label used in health output.
    fn backend(&self) -> &'static str;

    /// Persist a validated meeting, assigning the next id and the creation time.
    async fn create(&self, meeting: NewMeeting) -> Result<Meeting, ServiceError>;

    /// Look up a meeting by id.
    async fn get_by_id(&self, id: MeetingId) -> Result<Option<Meeting>, ServiceError>;

    /// Look up the earliest meeting registered under `room_name`.
    async fn get_by_room_name(&self, room_name: &str) -> Result<Option<Meeting>, ServiceError>;
}

struct Inner {
    /// `None` once every id has been handed out.
    next_id: Option<MeetingId>,
    meetings: BTreeMap<MeetingId, Meeting>,
}

/// Process-local registry store.
///
/// Id allocation and insertion happen under one write lock, so concurrent
/// creates never share an id.
pub struct InMemoryMeetingStore {
    inner: RwLock<Inner>,
}

impl InMemoryMeetingStore {
    /// Create an empty store whose first id is 1.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: Some(MeetingId::FIRST),
                meetings: BTreeMap::new(),
            }),
        }
    }

    /// Number of stored meetings.
    pub async fn len(&self) -> usize {
        self.inner.read().await.meetings.len()
    }

    /// Whether the store holds no meetings.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.meetings.is_empty()
    }
}

impl Default for InMemoryMeetingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MeetingStore for InMemoryMeetingStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    #[instrument(skip_all, name = "meeting.registry.create")]
    async fn create(&self, meeting: NewMeeting) -> Result<Meeting, ServiceError> {
        let mut inner = self.inner.write().await;

        let Some(id) = inner.next_id else {
            error!(target: "meeting.registry", backend = "memory", "Meeting ids exhausted");
            return Err(ServiceError::Internal);
        };
        inner.next_id = id.checked_next();

        let meeting = meeting.into_meeting(id, Utc::now());
        inner.meetings.insert(id, meeting.clone());

        debug!(
            target: "meeting.registry",
            meeting_id = %id,
            backend = "memory",
            "Meeting stored"
        );
        metrics::record_meeting_created(self.backend());

        Ok(meeting)
    }

    async fn get_by_id(&self, id: MeetingId) -> Result<Option<Meeting>, ServiceError> {
        Ok(self.inner.read().await.meetings.get(&id).cloned())
    }

    async fn get_by_room_name(&self, room_name: &str) -> Result<Option<Meeting>, ServiceError> {
        // BTreeMap iterates in id order, which is insertion order.
        Ok(self
            .inner
            .read()
            .await
            .meetings
            .values()
            .find(|m| m.room_name == room_name)
            .cloned())
    }
}
