use async_trait::async_trait;

use crate::domain::errors::RunError;
use crate::domain::models::DesiredStateRecord;

/// Supplies desired contractor state, in source order.
#[async_trait]
pub trait DesiredStateSource: Send + Sync {
    /// Every valid record, in source order.
    async fn load(&self) -> Result<Vec<DesiredStateRecord>, RunError>;
}
