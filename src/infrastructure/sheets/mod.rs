//! Google Sheets adapter
//!
//! Service-account authentication and the v4 values API, used both as the
//! desired-state source and as the audit log.

/// Audit log worksheet
pub mod audit;
pub mod auth;
/// Values API client
pub mod client;
/// Adapter errors
pub mod error;
/// Key, token and value-range payloads
pub mod models;
/// Desired-state worksheet
pub mod source;

pub use audit::SheetsAuditSink;
pub use auth::{KeySource, TokenProvider};
pub use client::SheetsClient;
pub use error::SheetsError;
pub use source::SheetsDesiredStateSource;
