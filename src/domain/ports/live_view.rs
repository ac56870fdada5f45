//! Live view ports - how the engine sees and changes console state.

use async_trait::async_trait;

use crate::domain::errors::EntityResult;

/// A contractor entry rendered in the live console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    /// Name exactly as rendered.
    pub label: String,
    /// Adapter-specific reference to the rendered element.
    pub handle: String,
}

impl Located {
    /// Entry rendered as `label`.
    pub fn new(label: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            handle: handle.into(),
        }
    }
}

/// Reads contractor state from the live console.
///
/// Implementations may block while the UI becomes ready, but every wait must
/// be bounded; exhausting it is reported as an error, never as a hang.
#[async_trait]
pub trait StateObserver: Send + Sync {
    /// Rendered entries that could correspond to `name`, in page order.
    ///
    /// This is a coarse pre-filter; the engine decides which candidate, if
    /// any, actually matches. An empty list means nothing is rendered.
    async fn candidates(&self, name: &str) -> EntityResult<Vec<Located>>;

    /// Whether the entry is currently paused. May reveal (expand) the entry
    /// first.
    async fn is_paused(&self, located: &Located) -> EntityResult<bool>;
}

/// Changes contractor state in the live console.
#[async_trait]
pub trait StateToggler: Send + Sync {
    /// Drive the entry to `paused` and confirm the new state is rendered.
    async fn set_paused(&self, located: &Located, paused: bool) -> EntityResult<()>;
}
