//! Observability module for the meeting service.
//!
//! Provides metrics definitions and recording helpers.

pub mod metrics;
