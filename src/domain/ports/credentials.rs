use crate::domain::errors::RunError;
use crate::domain::models::ConsoleCredentials;

/// Resolves console credentials at the start of each run.
///
/// A missing credential is a [`RunError::Configuration`].
pub trait CredentialStore: Send + Sync {
    /// Credentials for this run.
    fn console_credentials(&self) -> Result<ConsoleCredentials, RunError>;
}
