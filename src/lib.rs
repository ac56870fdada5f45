//! capsync - contractor pause-state reconciliation
//!
//! Reads the desired pause state of each contractor from a spreadsheet,
//! compares it with the state rendered in a remote web console, toggles the
//! contractors that differ and appends an audit row per contractor handled.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): records, decisions, run results and the port traits
//! - **Service Layer** (`services`): the reconciliation engine and the run orchestrator
//! - **Infrastructure Layer** (`infrastructure`): config, logging, WebDriver and Google Sheets
//! - **Adapters** (`adapters`): the HTTP trigger and in-memory port implementations
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use capsync::infrastructure::config::ConfigLoader;
//! use capsync::infrastructure::setup::build_run_service;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let summary = build_run_service(&config)?.run().await?;
//!     println!("paused: {:?}", summary.paused());
//!     Ok(())
//! }
//! ```

/// Inbound HTTP trigger and in-memory ports
pub mod adapters;
/// Command-line interface
pub mod cli;
/// Domain models, ports and errors
pub mod domain;
/// Config, logging and the outbound adapters
pub mod infrastructure;
/// Reconciliation engine and run orchestration
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{EntityError, EntityFailure, FailureStage, RunError};
pub use domain::models::{
    AuditEntry, Config, DesiredStateRecord, PauseStatus, RunResult, Transition,
    TransitionDecision,
};
pub use domain::ports::{
    AuditSink, ConsoleSession, CredentialStore, DesiredStateSource, SessionProvider,
    StateObserver, StateToggler,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{Reconciler, RunService, RunSummary};
