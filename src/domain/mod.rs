//! Domain layer for capsync
//!
//! Records, decisions and run results, plus the ports every external
//! collaborator is reached through.

pub mod errors;
/// Records, results and configuration
pub mod models;
pub mod ports;

pub use errors::{EntityError, EntityFailure, EntityResult, FailureStage, RunError};
