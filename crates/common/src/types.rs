//! Common data types for meeting-room components.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Registry-assigned meeting identifier.
///
/// Ids are allocated sequentially starting at 1 and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeetingId(pub i64);

impl MeetingId {
    /// The first id handed out by an empty registry.
    pub const FIRST: MeetingId = MeetingId(1);

    /// Returns the id that follows this one, or `None` once ids are exhausted.
    #[must_use]
    pub fn checked_next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for MeetingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MeetingId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_first_id_is_one() {
        assert_eq!(MeetingId::FIRST, MeetingId(1));
    }

    #[test]
    fn test_checked_next_increments() {
        assert_eq!(MeetingId(41).checked_next(), Some(MeetingId(42)));
    }

    #[test]
    fn test_checked_next_stops_at_max() {
        assert_eq!(MeetingId(i64::MAX).checked_next(), None);
    }

    #[test]
    fn test_serializes_as_bare_integer() {
        let json = serde_json::to_string(&MeetingId(7)).unwrap();
        assert_eq!(json, "7");

        let id: MeetingId = serde_json::from_str("12").unwrap();
        assert_eq!(id, MeetingId(12));
    }

    #[test]
    fn test_display() {
        assert_eq!(MeetingId(3).to_string(), "3");
    }
}
