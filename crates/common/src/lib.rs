//! Common utilities and types shared across meeting-room components.

#![warn(clippy::pedantic)]

/// Module for common data types
pub mod types;

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for conferencing credential claims and unverified token inspection
pub mod jwt;
