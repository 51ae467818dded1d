//! HTTP request handlers for the meeting service.

pub mod diagnostics;
pub mod health;
pub mod meetings;
pub mod metrics;
pub mod tokens;

pub use diagnostics::diagnostics;
pub use health::health_check;
pub use meetings::{create_meeting, get_meeting_by_id, get_meeting_by_room_name};
pub use metrics::metrics_handler;
pub use tokens::get_token;
