//! HTTP middleware for the meeting service.

pub mod http_metrics;

pub use http_metrics::http_metrics_middleware;
