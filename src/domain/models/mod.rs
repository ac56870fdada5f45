pub mod audit;
/// Configuration sections
pub mod config;
pub mod contractor;
pub mod credentials;
pub mod reconcile;

pub use audit::{AuditEntry, AUDIT_TIMESTAMP_FORMAT};
pub use config::{
    AuditConfig, Config, ConsoleConfig, CredentialsConfig, LogFormat, LoggingConfig,
    MatchStrategy, ReconcileConfig, RotationPolicy, ServerConfig, SheetsConfig,
};
pub use contractor::{DesiredStateRecord, InvalidPauseStatus, PauseStatus};
pub use credentials::ConsoleCredentials;
pub use reconcile::{EntityReport, ObservedState, RunResult, Transition, TransitionDecision};
