//! Common test utilities for integration tests
//!
//! Builds run services over the in-memory adapters so tests can script the
//! console, the desired-state sheet and the audit log.

#![allow(dead_code)]

use std::sync::Arc;

use capsync::adapters::memory::{
    ConsoleEntry, InMemoryAuditSink, InMemoryConsole, InMemoryDesiredState, StaticCredentials,
};
use capsync::domain::models::{DesiredStateRecord, PauseStatus};
use capsync::services::{Reconciler, RunService};

/// Scripted collaborators plus the service wired over them.
pub struct Harness {
    pub console: InMemoryConsole,
    pub audit: InMemoryAuditSink,
    pub service: Arc<RunService>,
}

impl Harness {
    pub fn new(console: InMemoryConsole, records: Vec<DesiredStateRecord>) -> Self {
        Self::with(
            console,
            InMemoryDesiredState::new(records),
            StaticCredentials::new("ops@example.com", "hunter2"),
            Reconciler::new(),
        )
    }

    pub fn with(
        console: InMemoryConsole,
        source: InMemoryDesiredState,
        credentials: StaticCredentials,
        reconciler: Reconciler,
    ) -> Self {
        let audit = InMemoryAuditSink::new();
        let service = Arc::new(RunService::new(
            Arc::new(credentials),
            Arc::new(source),
            Arc::new(console.clone()),
            Arc::new(audit.clone()),
            reconciler,
        ));
        Self {
            console,
            audit,
            service,
        }
    }
}

/// Console with the given (label, paused) rows.
pub fn console(rows: &[(&str, bool)]) -> InMemoryConsole {
    InMemoryConsole::new(rows.iter().map(|(label, paused)| ConsoleEntry::new(*label, *paused)))
}

pub fn paused(name: &str) -> DesiredStateRecord {
    DesiredStateRecord::new(name, PauseStatus::Paused)
}

pub fn active(name: &str) -> DesiredStateRecord {
    DesiredStateRecord::new(name, PauseStatus::Active)
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
