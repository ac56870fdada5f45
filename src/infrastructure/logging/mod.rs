//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - JSON or pretty console output
//! - Rolling JSON log files
//! - Secret scrubbing for remote error messages
//! - Local audit mirror

/// Local audit mirror
pub mod audit;
/// Subscriber setup
pub mod logger;
/// Redaction of secrets in log and error text
pub mod secret_scrubbing;

pub use audit::{FanOutAuditSink, JsonlAuditSink};
pub use logger::LoggerImpl;
pub use secret_scrubbing::{scrub, SecretScrubber};
