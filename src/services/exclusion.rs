//! Policies that keep desired-state records out of a run.

use std::collections::HashSet;

use crate::domain::models::DesiredStateRecord;

/// Decides whether a record is skipped before any console interaction.
pub trait ExclusionPolicy: Send + Sync {
    /// True to skip `record`.
    fn excludes(&self, record: &DesiredStateRecord) -> bool;
}

impl<F> ExclusionPolicy for F
where
    F: Fn(&DesiredStateRecord) -> bool + Send + Sync,
{
    fn excludes(&self, record: &DesiredStateRecord) -> bool {
        self(record)
    }
}

/// Excludes a fixed set of names, compared after trimming.
#[derive(Debug, Clone, Default)]
pub struct ExcludedNames {
    names: HashSet<String>,
}

impl ExcludedNames {
    /// Policy over `names`; blank names are dropped.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|n| n.as_ref().trim().to_string())
                .filter(|n| !n.is_empty())
                .collect(),
        }
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when nothing is excluded.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl ExclusionPolicy for ExcludedNames {
    fn excludes(&self, record: &DesiredStateRecord) -> bool {
        self.names.contains(record.key())
    }
}
