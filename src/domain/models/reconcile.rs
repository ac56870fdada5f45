//! Decisions and per-run results of reconciliation.

use serde::Serialize;

use super::contractor::PauseStatus;
use crate::domain::errors::EntityFailure;

/// Live state of a contractor, valid only at the instant it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedState {
    /// Label of the live entry that was read.
    pub name: String,
    /// Whether the console showed the entry as paused.
    pub currently_paused: bool,
}

impl ObservedState {
    /// State read from the entry labelled `name`.
    pub fn new(name: impl Into<String>, currently_paused: bool) -> Self {
        Self {
            name: name.into(),
            currently_paused,
        }
    }

    /// The observed state as a status value.
    pub const fn status(&self) -> PauseStatus {
        PauseStatus::from_paused(self.currently_paused)
    }

    /// What it takes to reach `desired_paused` from here.
    pub const fn decision_for(&self, desired_paused: bool) -> TransitionDecision {
        TransitionDecision::decide(desired_paused, self.currently_paused)
    }
}

/// Action needed to bring the live state in line with the desired state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionDecision {
    /// Live state already matches.
    NoChange,
    /// Paused live, wanted active.
    Activate,
    /// Active live, wanted paused.
    Pause,
}

impl TransitionDecision {
    /// Pure decision function over (desired, observed).
    pub const fn decide(desired_paused: bool, currently_paused: bool) -> Self {
        match (desired_paused, currently_paused) {
            (true, false) => Self::Pause,
            (false, true) => Self::Activate,
            _ => Self::NoChange,
        }
    }

    /// Whether the console has to be changed.
    pub const fn requires_toggle(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    /// Snake-case name, as serialized.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoChange => "no_change",
            Self::Activate => "activate",
            Self::Pause => "pause",
        }
    }
}

/// A successfully reconciled contractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    /// Desired-state name, trimmed.
    pub name: String,
    /// State observed immediately before any toggle.
    pub previous: PauseStatus,
    /// State after the decision was applied.
    pub new: PauseStatus,
    /// Decision taken for this contractor.
    pub decision: TransitionDecision,
}

impl Transition {
    /// Whether the run changed the live state.
    pub fn changed(&self) -> bool {
        self.previous != self.new
    }
}

/// Outcome for one processed desired-state record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityReport {
    /// Desired-state name.
    pub name: String,
    /// The transition, or where processing stopped.
    pub outcome: Result<Transition, EntityFailure>,
}

/// Accumulated result of one reconciliation run.
///
/// Reports are kept in source order. Failed entities are kept as reports so
/// callers can tell "nothing to do" apart from "could not do it", but they
/// never show up in [`transitions`](Self::transitions) or the
/// activated/paused lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    reports: Vec<EntityReport>,
    excluded: Vec<String>,
}

impl RunResult {
    /// Empty result, filled in as records are processed.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(
        &mut self,
        name: impl Into<String>,
        outcome: Result<Transition, EntityFailure>,
    ) {
        self.reports.push(EntityReport {
            name: name.into(),
            outcome,
        });
    }

    pub(crate) fn exclude(&mut self, name: impl Into<String>) {
        self.excluded.push(name.into());
    }

    /// Every processed record, in source order.
    pub fn reports(&self) -> &[EntityReport] {
        &self.reports
    }

    /// Successfully reconciled entities, in source order.
    pub fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.reports.iter().filter_map(|r| r.outcome.as_ref().ok())
    }

    /// Entities that could not be reconciled, in source order.
    pub fn failures(&self) -> impl Iterator<Item = &EntityFailure> {
        self.reports.iter().filter_map(|r| r.outcome.as_ref().err())
    }

    /// Names skipped by the exclusion policy.
    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    /// Names that were switched from paused to active during this run.
    pub fn activated(&self) -> Vec<String> {
        self.names_for(TransitionDecision::Activate)
    }

    /// Names that were switched from active to paused during this run.
    pub fn paused(&self) -> Vec<String> {
        self.names_for(TransitionDecision::Pause)
    }

    /// True when no record was processed or excluded.
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty() && self.excluded.is_empty()
    }

    fn names_for(&self, decision: TransitionDecision) -> Vec<String> {
        self.transitions()
            .filter(|t| t.decision == decision)
            .map(|t| t.name.clone())
            .collect()
    }
}
