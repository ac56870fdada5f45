//! Port trait definitions (Hexagonal Architecture)
//!
//! Async interfaces for every collaborator outside the reconciliation engine:
//! - StateObserver / StateToggler: live console lookups and toggles
//! - ConsoleSession / SessionProvider: the scoped browser session
//! - CredentialStore: console credentials, resolved per run
//! - DesiredStateSource: desired pause state
//! - AuditSink: persisted audit rows

/// Audit row persistence
pub mod audit_sink;
pub mod console;
/// Credential lookup
pub mod credentials;
/// Desired-state source
pub mod desired_state;
pub mod live_view;

pub use audit_sink::AuditSink;
pub use console::{ConsoleSession, SessionProvider};
pub use credentials::CredentialStore;
pub use desired_state::DesiredStateSource;
pub use live_view::{Located, StateObserver, StateToggler};
