//! # Meeting Test Utilities
//!
//! Shared test utilities for the meeting service.
//!
//! This crate provides:
//! - Server test harness (`TestMeetingServer` for E2E tests)
//! - Fixed RSA keypairs and conferencing secrets (`crypto_fixtures`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use meeting_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<()> {
//!     let server = TestMeetingServer::spawn_with_secrets(test_secrets()).await?;
//!
//!     let response = reqwest::get(format!("{}/health", server.url())).await?;
//!
//!     assert_eq!(response.status(), 200);
//!     Ok(())
//! }
//! ```

pub mod crypto_fixtures;
pub mod server_harness;

pub use crypto_fixtures::*;
pub use server_harness::*;
