//! Metrics definitions for the meeting service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `meeting_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `endpoint`: parameterized paths only, unknown paths collapse to `/other`
//! - `status`: success, error, timeout (HTTP) or a fixed outcome set
//! - `backend`: memory, postgres

use metrics::{counter, histogram};
use std::time::Duration;

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion
///
/// Metric: `meeting_http_requests_total`, `meeting_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status` / `status_code`
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let normalized_endpoint = normalize_endpoint(endpoint);
    let status = categorize_status_code(status_code);

    histogram!("meeting_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status" => status
    )
    .record(duration.as_secs_f64());

    counter!("meeting_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

/// Categorize HTTP status code into success/error/timeout
fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Normalize endpoint path to prevent label cardinality explosion
///
/// Room names and ids are replaced with placeholders.
fn normalize_endpoint(path: &str) -> &'static str {
    match path {
        "/health" => "/health",
        "/metrics" => "/metrics",
        "/api/diagnostics" => "/api/diagnostics",
        "/api/meetings" => "/api/meetings",
        _ => normalize_dynamic_endpoint(path),
    }
}

fn normalize_dynamic_endpoint(path: &str) -> &'static str {
    let Some(rest) = path.strip_prefix("/api/meetings/") else {
        return "/other";
    };

    match rest.split_once('/') {
        Some(("token", room)) if !room.is_empty() && !room.contains('/') => {
            "/api/meetings/token/{roomName}"
        }
        Some(("by-id", id)) if !id.is_empty() && !id.contains('/') => "/api/meetings/by-id/{id}",
        Some(("by-room", room)) if !room.is_empty() && !room.contains('/') => {
            "/api/meetings/by-room/{roomName}"
        }
        _ => "/other",
    }
}

// ============================================================================
// Registry Metrics
// ============================================================================

/// Record a stored meeting
///
/// Metric: `meeting_meetings_created_total`
/// Labels: `backend`
pub fn record_meeting_created(backend: &'static str) {
    counter!("meeting_meetings_created_total", "backend" => backend).increment(1);
}

/// Record a registry database query
///
/// Metric: `meeting_db_query_duration_seconds`, `meeting_db_queries_total`
/// Labels: `operation`, `status`
pub fn record_db_query(operation: &'static str, status: &'static str, duration: Duration) {
    histogram!("meeting_db_query_duration_seconds",
        "operation" => operation,
        "status" => status
    )
    .record(duration.as_secs_f64());

    counter!("meeting_db_queries_total",
        "operation" => operation,
        "status" => status
    )
    .increment(1);
}

// ============================================================================
// Credential Metrics
// ============================================================================

/// Record a credential issuance attempt
///
/// Metric: `meeting_credentials_issued_total`
/// Labels: `status` (success, configuration_error, signing_error)
pub fn record_credential_issued(status: &'static str) {
    counter!("meeting_credentials_issued_total", "status" => status).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_status_code() {
        assert_eq!(categorize_status_code(200), "success");
        assert_eq!(categorize_status_code(201), "success");
        assert_eq!(categorize_status_code(400), "error");
        assert_eq!(categorize_status_code(404), "error");
        assert_eq!(categorize_status_code(408), "timeout");
        assert_eq!(categorize_status_code(500), "error");
        assert_eq!(categorize_status_code(504), "timeout");
    }

    #[test]
    fn test_normalize_static_endpoints() {
        assert_eq!(normalize_endpoint("/health"), "/health");
        assert_eq!(normalize_endpoint("/metrics"), "/metrics");
        assert_eq!(normalize_endpoint("/api/diagnostics"), "/api/diagnostics");
        assert_eq!(normalize_endpoint("/api/meetings"), "/api/meetings");
    }

    #[test]
    fn test_normalize_dynamic_endpoints() {
        assert_eq!(
            normalize_endpoint("/api/meetings/token/team%20sync%21"),
            "/api/meetings/token/{roomName}"
        );
        assert_eq!(
            normalize_endpoint("/api/meetings/by-id/42"),
            "/api/meetings/by-id/{id}"
        );
        assert_eq!(
            normalize_endpoint("/api/meetings/by-room/standup"),
            "/api/meetings/by-room/{roomName}"
        );
    }

    #[test]
    fn test_normalize_unknown_endpoints() {
        assert_eq!(normalize_endpoint("/"), "/other");
        assert_eq!(normalize_endpoint("/api/meetings/token/"), "/other");
        assert_eq!(normalize_endpoint("/api/meetings/token/a/b"), "/other");
        assert_eq!(normalize_endpoint("/api/meetings/42"), "/other");
        assert_eq!(normalize_endpoint("/wp-admin"), "/other");
    }

    #[test]
    fn test_recorders_without_exporter() {
        // No recorder installed: calls must be no-ops
        record_http_request("GET", "/health", 200, Duration::from_millis(3));
        record_meeting_created("memory");
        record_db_query("create_meeting", "success", Duration::from_millis(4));
        record_credential_issued("success");
        record_credential_issued("configuration_error");
    }

    #[test]
    fn test_recorded_metric_names() {
        use metrics_util::debugging::DebuggingRecorder;

        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();

        ::metrics::with_local_recorder(&recorder, || {
            record_http_request("GET", "/api/meetings/by-id/7", 404, Duration::from_millis(2));
            record_meeting_created("memory");
            record_credential_issued("signing_error");
        });

        let names: Vec<String> = snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .map(|(key, _, _, _)| key.key().name().to_string())
            .collect();

        for expected in [
            "meeting_http_requests_total",
            "meeting_http_request_duration_seconds",
            "meeting_meetings_created_total",
            "meeting_credentials_issued_total",
        ] {
            assert!(
                names.iter().any(|n| n == expected),
                "missing metric {expected}, got {names:?}"
            );
        }
    }
}
