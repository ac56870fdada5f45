pub mod exclusion;
pub mod name_matching;
pub mod reconciler;
pub mod run_service;

pub use exclusion::{ExcludedNames, ExclusionPolicy};
pub use name_matching::NameMatcher;
pub use reconciler::Reconciler;
pub use run_service::{RunService, RunSummary};
