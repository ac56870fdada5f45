//! Console session port - the scoped resource owning the browser.

use async_trait::async_trait;

use super::live_view::{StateObserver, StateToggler};
use crate::domain::errors::RunError;
use crate::domain::models::ConsoleCredentials;

/// One authenticated automation session against the remote console.
///
/// Acquired through a [`SessionProvider`] before reconciliation and closed
/// unconditionally afterwards by the orchestrator.
#[async_trait]
pub trait ConsoleSession: Send + Sync {
    /// Sign in to the console.
    async fn login(&self, credentials: &ConsoleCredentials) -> Result<(), RunError>;

    /// Navigate to the page listing contractors and their pause state.
    async fn open_capacity_view(&self) -> Result<(), RunError>;

    /// Reads live state within this session.
    fn observer(&self) -> &dyn StateObserver;

    /// Changes live state within this session.
    fn toggler(&self) -> &dyn StateToggler;

    /// Release the session. Called exactly once, on success and failure alike.
    async fn close(&self) -> Result<(), RunError>;
}

/// Opens console sessions.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Start a fresh session.
    async fn open(&self) -> Result<Box<dyn ConsoleSession>, RunError>;
}
