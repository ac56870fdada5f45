//! Reconciliation engine.
//!
//! Walks desired-state records in source order and, for each one, locates the
//! contractor in the live console, reads its pause state, decides on a
//! transition and applies it. A failure for one contractor is recorded in the
//! run result and never stops the loop.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::domain::errors::{EntityError, EntityFailure, EntityResult, FailureStage};
use crate::domain::models::{
    DesiredStateRecord, MatchStrategy, ObservedState, ReconcileConfig, RunResult, Transition,
};
use crate::domain::ports::{Located, StateObserver, StateToggler};
use crate::services::exclusion::{ExcludedNames, ExclusionPolicy};
use crate::services::name_matching::NameMatcher;

/// Reconciles desired pause state against the live console.
#[derive(Clone)]
pub struct Reconciler {
    matcher: Arc<dyn NameMatcher>,
    exclusion: Arc<dyn ExclusionPolicy>,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl Reconciler {
    /// Exact matching, nothing excluded.
    pub fn new() -> Self {
        Self {
            matcher: Arc::new(MatchStrategy::Exact),
            exclusion: Arc::new(ExcludedNames::default()),
        }
    }

    /// Matching strategy and exclusions taken from configuration.
    pub fn from_config(config: &ReconcileConfig) -> Self {
        let exclusion = ExcludedNames::new(&config.excluded_names);
        if !exclusion.is_empty() {
            info!(count = exclusion.len(), "contractors excluded from reconciliation");
        }
        Self::new()
            .with_matcher(config.match_strategy)
            .with_exclusion(exclusion)
    }

    /// Replace the name matcher.
    #[must_use]
    pub fn with_matcher(mut self, matcher: impl NameMatcher + 'static) -> Self {
        self.matcher = Arc::new(matcher);
        self
    }

    /// Replace the exclusion policy.
    #[must_use]
    pub fn with_exclusion(mut self, exclusion: impl ExclusionPolicy + 'static) -> Self {
        self.exclusion = Arc::new(exclusion);
        self
    }

    /// Run one pass over `records`.
    ///
    /// Entities are processed one at a time. The returned result holds a
    /// report for every non-excluded record; only located and (when needed)
    /// successfully toggled entities count as transitions.
    #[instrument(skip_all, fields(records = records.len()))]
    pub async fn reconcile(
        &self,
        records: &[DesiredStateRecord],
        observer: &dyn StateObserver,
        toggler: &dyn StateToggler,
    ) -> RunResult {
        let mut result = RunResult::new();
        let mut seen = HashSet::new();

        for record in records {
            let name = record.key();

            if self.exclusion.excludes(record) {
                info!(contractor = %name, "excluded by policy, skipping");
                result.exclude(name);
                continue;
            }

            if !seen.insert(name.to_string()) {
                warn!(contractor = %name, "contractor listed more than once in desired state");
            }

            let outcome = self.reconcile_one(record, observer, toggler).await;
            match &outcome {
                Ok(t) if t.decision.requires_toggle() => info!(
                    contractor = %name,
                    previous = %t.previous,
                    new = %t.new,
                    "contractor {}",
                    if t.new.is_paused() { "paused" } else { "activated" }
                ),
                Ok(t) => {
                    info!(contractor = %name, status = %t.previous, "already in desired state");
                }
                Err(failure) => warn!(
                    contractor = %name,
                    stage = %failure.stage,
                    error = %failure.error,
                    "failed to reconcile contractor, skipping"
                ),
            }
            result.record(name, outcome);
        }

        info!(
            activated = result.activated().len(),
            paused = result.paused().len(),
            failed = result.failures().count(),
            excluded = result.excluded().len(),
            "reconciliation pass finished"
        );
        result
    }

    /// Find the live entry for `name`.
    ///
    /// The first candidate accepted by the matcher wins; further matches are
    /// reported as ambiguity and ignored.
    pub async fn locate(
        &self,
        name: &str,
        observer: &dyn StateObserver,
    ) -> EntityResult<Located> {
        let candidates = observer.candidates(name).await?;
        let mut matching = candidates
            .into_iter()
            .filter(|c| self.matcher.matches(name, &c.label));

        let chosen = matching
            .next()
            .ok_or_else(|| EntityError::NotFound(name.to_string()))?;

        let others = matching.count();
        if others > 0 {
            warn!(
                contractor = %name,
                matches = others + 1,
                chosen = %chosen.label,
                "several live entries match, using the first"
            );
        }
        Ok(chosen)
    }

    async fn reconcile_one(
        &self,
        record: &DesiredStateRecord,
        observer: &dyn StateObserver,
        toggler: &dyn StateToggler,
    ) -> Result<Transition, EntityFailure> {
        let name = record.key();

        let located = self
            .locate(name, observer)
            .await
            .map_err(failure(name, FailureStage::Locate))?;

        let observed = ObservedState::new(
            located.label.as_str(),
            observer
                .is_paused(&located)
                .await
                .map_err(failure(name, FailureStage::Observe))?,
        );
        debug!(
            contractor = %name,
            live_label = %observed.name,
            status = %observed.status(),
            "observed live state"
        );

        let decision = observed.decision_for(record.desired_paused);
        if decision.requires_toggle() {
            toggler
                .set_paused(&located, record.desired_paused)
                .await
                .map_err(failure(name, FailureStage::Toggle))?;
        }

        let previous = observed.status();
        let new = if decision.requires_toggle() {
            record.desired_status()
        } else {
            previous
        };

        Ok(Transition {
            name: name.to_string(),
            previous,
            new,
            decision,
        })
    }
}

fn failure(name: &str, stage: FailureStage) -> impl FnOnce(EntityError) -> EntityFailure + '_ {
    move |error| EntityFailure {
        name: name.to_string(),
        stage,
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{ConsoleEntry, InMemoryConsole};
    use crate::domain::models::PauseStatus;

    #[tokio::test]
    async fn test_first_exact_match_wins_over_substring_candidates() {
        let console = InMemoryConsole::new([
            ConsoleEntry::new("Acme Co West", true),
            ConsoleEntry::new("Acme Co", false),
            ConsoleEntry::new("Acme Co", true),
        ]);

        let located = Reconciler::new().locate("Acme Co", &console).await.unwrap();
        assert_eq!(located.label, "Acme Co");
        assert_eq!(located.handle, "1");
    }

    #[tokio::test]
    async fn test_locate_without_accepted_candidate_is_not_found() {
        let console = InMemoryConsole::new([ConsoleEntry::new("Acme Co West", true)]);

        let err = Reconciler::new().locate("Acme Co", &console).await.unwrap_err();
        assert_eq!(err, EntityError::NotFound("Acme Co".to_string()));
    }

    #[tokio::test]
    async fn test_locate_passes_observer_errors_through() {
        let console = InMemoryConsole::new([ConsoleEntry::new("Acme Co", false)]);
        console.fail_lookup_for("Acme Co").await;

        let err = Reconciler::new().locate("Acme Co", &console).await.unwrap_err();
        assert!(matches!(err, EntityError::Locate(_)));
    }

    #[tokio::test]
    async fn test_custom_matcher_replaces_strategy() {
        struct Prefix;
        impl NameMatcher for Prefix {
            fn matches(&self, wanted: &str, rendered: &str) -> bool {
                rendered.starts_with(wanted)
            }
        }
        let console = InMemoryConsole::new([ConsoleEntry::new("Acme Co West", true)]);

        let located = Reconciler::new()
            .with_matcher(Prefix)
            .locate("Acme Co", &console)
            .await
            .unwrap();
        assert_eq!(located.label, "Acme Co West");
    }

    #[tokio::test]
    async fn test_matching_strategy_from_config() {
        let console = InMemoryConsole::new([ConsoleEntry::new("Beta LLC.", true)]);
        let records = [DesiredStateRecord::new("Beta LLC", PauseStatus::Active)];

        let exact = Reconciler::new().reconcile(&records, &console, &console).await;
        assert_eq!(
            exact.failures().next().map(|f| &f.error),
            Some(&EntityError::NotFound("Beta LLC".to_string()))
        );

        let normalized = Reconciler::from_config(&ReconcileConfig {
            match_strategy: MatchStrategy::Normalized,
            excluded_names: vec![],
        })
        .reconcile(&records, &console, &console)
        .await;
        assert_eq!(normalized.activated(), vec!["Beta LLC".to_string()]);
    }
}
