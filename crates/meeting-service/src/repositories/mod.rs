//! Meeting registry.
//!
//! The registry is an injected store rather than process-global state.
//! Handlers only see the [`MeetingStore`] trait; the binary picks the
//! backend at startup.
//!
//! # Components
//!
//! - `meetings` - [`MeetingStore`] trait and the in-memory store
//! - `postgres` - PostgreSQL-backed store for multi-process deployments

pub mod meetings;
pub mod postgres;

pub use meetings::{InMemoryMeetingStore, MeetingStore};
pub use postgres::PgMeetingStore;
