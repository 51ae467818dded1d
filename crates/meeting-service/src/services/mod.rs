//! Service layer for the meeting service.
//!
//! # Components
//!
//! - `credential_issuer` - Signs room-scoped conferencing credentials

pub mod credential_issuer;

pub use credential_issuer::{CredentialError, CredentialIssuer};
