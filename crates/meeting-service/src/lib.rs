//! Meeting Service Library
//!
//! HTTP service that keeps a registry of meeting rooms and issues signed
//! moderator credentials for the external conferencing backend.
//!
//! # Architecture
//!
//! Handler -> Service -> Repository:
//!
//! ```text
//! routes/mod.rs -> handlers/*.rs -> services/*.rs, repositories/*.rs
//! ```
//!
//! # Modules
//!
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - HTTP metrics middleware
//! - `models` - Registry entity and API bodies
//! - `observability` - Prometheus metrics
//! - `repositories` - Registry stores (in-memory, PostgreSQL)
//! - `routes` - Axum router setup
//! - `services` - Credential issuer

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
