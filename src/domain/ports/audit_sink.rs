use async_trait::async_trait;

use crate::domain::errors::RunError;
use crate::domain::models::AuditEntry;

/// Persists audit rows. Rows are appended in the order given.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Append `entries`. An empty slice is a no-op.
    async fn append(&self, entries: &[AuditEntry]) -> Result<(), RunError>;
}
