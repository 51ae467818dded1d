//! Room name sanitization.
//!
//! The conferencing backend only accepts `[A-Za-z0-9_]` in room names.

/// Replace every character outside `[A-Za-z0-9]` with `_`.
///
/// Works per Unicode scalar value, so each non-ASCII character becomes a
/// single `_`. The result is stable under re-sanitization.
pub fn sanitize_room_name(room_name: &str) -> String {
    room_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
