//! Inbound and test adapters.
//!
//! - `http`: the trigger endpoint
//! - `memory`: in-memory implementations of every port

pub mod http;
pub mod memory;

pub use http::{ErrorResponse, RunFailure, RunResponse, TriggerServer};
