//! One full reconciliation run, from credentials to audit log.
//!
//! Owns the acquire/release of the console session: once a session has been
//! opened it is closed on every path, including failures part-way through.

use chrono::Local;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::domain::errors::RunError;
use crate::domain::models::{AuditEntry, ConsoleCredentials, DesiredStateRecord, RunResult};
use crate::domain::ports::{
    AuditSink, ConsoleSession, CredentialStore, DesiredStateSource, SessionProvider,
};
use crate::services::reconciler::Reconciler;

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Id carried by the run's log span.
    pub run_id: Uuid,
    /// Per-contractor outcomes.
    pub result: RunResult,
    /// Audit rows written for this run.
    pub audited: usize,
}

impl RunSummary {
    /// See [`RunResult::activated`].
    pub fn activated(&self) -> Vec<String> {
        self.result.activated()
    }

    /// See [`RunResult::paused`].
    pub fn paused(&self) -> Vec<String> {
        self.result.paused()
    }
}

/// Wires the ports together and runs them in order.
pub struct RunService {
    credentials: Arc<dyn CredentialStore>,
    source: Arc<dyn DesiredStateSource>,
    sessions: Arc<dyn SessionProvider>,
    audit: Arc<dyn AuditSink>,
    reconciler: Reconciler,
    gate: Mutex<()>,
}

impl RunService {
    /// Service over the given ports.
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        source: Arc<dyn DesiredStateSource>,
        sessions: Arc<dyn SessionProvider>,
        audit: Arc<dyn AuditSink>,
        reconciler: Reconciler,
    ) -> Self {
        Self {
            credentials,
            source,
            sessions,
            audit,
            reconciler,
            gate: Mutex::new(()),
        }
    }

    /// Execute one run.
    ///
    /// Runs never overlap: a call made while another run is active fails
    /// immediately with [`RunError::Busy`].
    pub async fn run(&self) -> Result<RunSummary, RunError> {
        let _guard = self.gate.try_lock().map_err(|_| RunError::Busy)?;

        let run_id = Uuid::new_v4();
        let span = info_span!("reconcile_run", %run_id);
        async {
            let outcome = self.run_inner(run_id).await;
            match &outcome {
                Ok(summary) => info!(
                    activated = summary.result.activated().len(),
                    paused = summary.result.paused().len(),
                    audited = summary.audited,
                    "run completed"
                ),
                Err(e) => warn!(code = e.code(), error = %e, "run aborted"),
            }
            outcome
        }
        .instrument(span)
        .await
    }

    async fn run_inner(&self, run_id: Uuid) -> Result<RunSummary, RunError> {
        let credentials = self.credentials.console_credentials()?;

        let records = self.source.load().await?;
        info!(records = records.len(), "loaded desired state");

        if records.is_empty() {
            info!("nothing to reconcile, console session not opened");
            return Ok(RunSummary {
                run_id,
                result: RunResult::new(),
                audited: 0,
            });
        }

        let session = self.sessions.open().await?;
        let outcome = self.drive(session.as_ref(), &credentials, &records).await;

        if let Err(e) = session.close().await {
            warn!(error = %e, "failed to close console session");
        }

        let (result, audited) = outcome?;
        Ok(RunSummary {
            run_id,
            result,
            audited,
        })
    }

    async fn drive(
        &self,
        session: &dyn ConsoleSession,
        credentials: &ConsoleCredentials,
        records: &[DesiredStateRecord],
    ) -> Result<(RunResult, usize), RunError> {
        session.login(credentials).await?;
        info!("logged into console");
        session.open_capacity_view().await?;

        let result = self
            .reconciler
            .reconcile(records, session.observer(), session.toggler())
            .await;

        let entries = AuditEntry::from_run(&result, Local::now().naive_local());
        if !entries.is_empty() {
            if let Err(e) = self.audit.append(&entries).await {
                warn!(
                    activated = ?result.activated(),
                    paused = ?result.paused(),
                    "changes were applied but could not be audited"
                );
                return Err(e);
            }
            info!(rows = entries.len(), "audit rows written");
        }

        Ok((result, entries.len()))
    }
}
