//! Error taxonomy for reconciliation runs.
//!
//! Entity-level errors never leave the engine loop: they are folded into the
//! run result. Run-level errors abort the run and surface to the caller.

use serde::Serialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Failure while handling a single contractor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    /// No rendered entry is accepted by the name matcher.
    #[error("no live entry matches {0:?}")]
    NotFound(String),

    /// The console lookup itself failed.
    #[error("lookup failed: {0}")]
    Locate(String),

    /// The pause state could not be read.
    #[error("could not read current state: {0}")]
    Observe(String),

    /// The toggle was rejected or did not take effect.
    #[error("toggle failed: {0}")]
    Toggle(String),

    /// A bounded wait ran out.
    #[error("gave up waiting for {what} after {}ms", .waited.as_millis())]
    Timeout {
        /// What was being waited for
        what: String,
        /// Time spent waiting
        waited: Duration,
    },
}

/// Result of one per-entity step.
pub type EntityResult<T> = Result<T, EntityError>;

/// Step of the per-entity pipeline at which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// Finding the live entry
    Locate,
    /// Reading its pause state
    Observe,
    /// Applying the transition
    Toggle,
}

impl FailureStage {
    /// Lowercase stage name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Locate => "locate",
            Self::Observe => "observe",
            Self::Toggle => "toggle",
        }
    }
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entity that could not be reconciled, with the stage it failed in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{stage} failed for {name:?}: {error}")]
pub struct EntityFailure {
    /// Desired-state name
    pub name: String,
    /// Step that failed
    pub stage: FailureStage,
    /// What went wrong
    pub error: EntityError,
}

/// Failure that aborts a whole run.
#[derive(Debug, Error)]
pub enum RunError {
    /// Required configuration or credentials are absent. Raised before any
    /// external interaction.
    #[error("{0}")]
    Configuration(String),

    /// The desired-state source could not be read.
    #[error("failed to load desired state: {0}")]
    DesiredState(String),

    /// The automation session could not be established or died mid-run.
    #[error("console session failed: {0}")]
    Session(String),

    /// Audit rows could not be written. Toggles already applied stay applied.
    #[error("failed to write audit log: {0}")]
    Audit(String),

    /// Another run holds the console.
    #[error("a reconciliation run is already in progress")]
    Busy,
}

impl RunError {
    /// Short machine-readable code used in logs.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION",
            Self::DesiredState(_) => "DESIRED_STATE",
            Self::Session(_) => "SESSION",
            Self::Audit(_) => "AUDIT",
            Self::Busy => "BUSY",
        }
    }
}
