//! In-memory adapters for testing.
//!
//! A scripted console, desired-state source, audit sink and credential store
//! that implement the domain ports without a browser or a spreadsheet.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::errors::{EntityError, EntityResult, RunError};
use crate::domain::models::{AuditEntry, ConsoleCredentials, DesiredStateRecord};
use crate::domain::ports::{
    AuditSink, ConsoleSession, CredentialStore, DesiredStateSource, Located, SessionProvider,
    StateObserver, StateToggler,
};

/// A contractor row in the scripted console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleEntry {
    /// Rendered name
    pub label: String,
    /// Checkbox state
    pub paused: bool,
}

impl ConsoleEntry {
    /// Row rendered as `label`.
    pub fn new(label: impl Into<String>, paused: bool) -> Self {
        Self {
            label: label.into(),
            paused,
        }
    }
}

#[derive(Default)]
struct ConsoleState {
    entries: RwLock<Vec<ConsoleEntry>>,
    failing_lookups: RwLock<HashSet<String>>,
    failing_toggles: RwLock<HashSet<String>>,
    toggle_calls: RwLock<Vec<(String, bool)>>,
    fail_open: AtomicBool,
    fail_login: AtomicBool,
    opened: AtomicUsize,
    closed: AtomicUsize,
    logins: AtomicUsize,
}

/// Scripted console. Acts as both the session provider and the session.
///
/// Lookups behave like a "label contains name" query, so several entries can
/// come back for one name and the engine has to pick.
#[derive(Clone, Default)]
pub struct InMemoryConsole {
    state: Arc<ConsoleState>,
}

impl InMemoryConsole {
    /// Console rendering `entries` in order.
    pub fn new(entries: impl IntoIterator<Item = ConsoleEntry>) -> Self {
        Self {
            state: Arc::new(ConsoleState {
                entries: RwLock::new(entries.into_iter().collect()),
                ..ConsoleState::default()
            }),
        }
    }

    /// Lookups for `label` fail with a transient error.
    pub async fn fail_lookup_for(&self, label: &str) {
        self.state.failing_lookups.write().await.insert(label.to_string());
    }

    /// Toggles of `label` fail and leave its state unchanged.
    pub async fn fail_toggle_for(&self, label: &str) {
        self.state.failing_toggles.write().await.insert(label.to_string());
    }

    /// Opening a session fails.
    pub fn fail_open(&self) {
        self.state.fail_open.store(true, Ordering::SeqCst);
    }

    /// Logging in fails.
    pub fn fail_login(&self) {
        self.state.fail_login.store(true, Ordering::SeqCst);
    }

    /// Change a rendered state behind the engine's back.
    pub async fn set_state(&self, label: &str, paused: bool) {
        let mut entries = self.state.entries.write().await;
        for entry in entries.iter_mut().filter(|e| e.label == label) {
            entry.paused = paused;
        }
    }

    /// State of the first row labelled `label`.
    pub async fn is_paused_label(&self, label: &str) -> Option<bool> {
        self.state
            .entries
            .read()
            .await
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.paused)
    }

    /// Every `set_paused` call received, as (label, target).
    pub async fn toggle_calls(&self) -> Vec<(String, bool)> {
        self.state.toggle_calls.read().await.clone()
    }

    /// Sessions opened.
    pub fn opened(&self) -> usize {
        self.state.opened.load(Ordering::SeqCst)
    }

    /// Sessions closed.
    pub fn closed(&self) -> usize {
        self.state.closed.load(Ordering::SeqCst)
    }

    /// Successful logins.
    pub fn logins(&self) -> usize {
        self.state.logins.load(Ordering::SeqCst)
    }

    fn index_of(located: &Located) -> EntityResult<usize> {
        located
            .handle
            .parse()
            .map_err(|_| EntityError::Observe(format!("bad handle {:?}", located.handle)))
    }
}

#[async_trait]
impl StateObserver for InMemoryConsole {
    async fn candidates(&self, name: &str) -> EntityResult<Vec<Located>> {
        let needle = name.trim();
        let entries = self.state.entries.read().await;
        let failing = self.state.failing_lookups.read().await;

        let mut found = Vec::new();
        for (idx, entry) in entries.iter().enumerate() {
            if !entry.label.contains(needle) {
                continue;
            }
            if failing.contains(&entry.label) {
                return Err(EntityError::Locate(format!("stale element for {:?}", entry.label)));
            }
            found.push(Located::new(entry.label.clone(), idx.to_string()));
        }
        Ok(found)
    }

    async fn is_paused(&self, located: &Located) -> EntityResult<bool> {
        let idx = Self::index_of(located)?;
        self.state
            .entries
            .read()
            .await
            .get(idx)
            .map(|e| e.paused)
            .ok_or_else(|| EntityError::Observe(format!("{:?} disappeared", located.label)))
    }
}

#[async_trait]
impl StateToggler for InMemoryConsole {
    async fn set_paused(&self, located: &Located, paused: bool) -> EntityResult<()> {
        self.state
            .toggle_calls
            .write()
            .await
            .push((located.label.clone(), paused));

        if self.state.failing_toggles.read().await.contains(&located.label) {
            return Err(EntityError::Toggle(format!(
                "checkbox for {:?} did not change",
                located.label
            )));
        }

        let idx = Self::index_of(located)?;
        let mut entries = self.state.entries.write().await;
        let entry = entries
            .get_mut(idx)
            .ok_or_else(|| EntityError::Toggle(format!("{:?} disappeared", located.label)))?;
        entry.paused = paused;
        Ok(())
    }
}

#[async_trait]
impl ConsoleSession for InMemoryConsole {
    async fn login(&self, _credentials: &ConsoleCredentials) -> Result<(), RunError> {
        self.state.logins.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_login.load(Ordering::SeqCst) {
            return Err(RunError::Session("login form never appeared".to_string()));
        }
        Ok(())
    }

    async fn open_capacity_view(&self) -> Result<(), RunError> {
        Ok(())
    }

    fn observer(&self) -> &dyn StateObserver {
        self
    }

    fn toggler(&self) -> &dyn StateToggler {
        self
    }

    async fn close(&self) -> Result<(), RunError> {
        self.state.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl SessionProvider for InMemoryConsole {
    async fn open(&self) -> Result<Box<dyn ConsoleSession>, RunError> {
        if self.state.fail_open.load(Ordering::SeqCst) {
            return Err(RunError::Session("browser failed to start".to_string()));
        }
        self.state.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(self.clone()))
    }
}

/// Fixed desired-state records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDesiredState {
    records: Vec<DesiredStateRecord>,
    error: Option<String>,
}

impl InMemoryDesiredState {
    /// Source returning `records`.
    pub fn new(records: Vec<DesiredStateRecord>) -> Self {
        Self {
            records,
            error: None,
        }
    }

    /// Source whose every load fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            records: Vec::new(),
            error: Some(message.into()),
        }
    }
}

#[async_trait]
impl DesiredStateSource for InMemoryDesiredState {
    async fn load(&self) -> Result<Vec<DesiredStateRecord>, RunError> {
        match &self.error {
            Some(message) => Err(RunError::DesiredState(message.clone())),
            None => Ok(self.records.clone()),
        }
    }
}

/// Collects audit rows in memory.
#[derive(Clone, Default)]
pub struct InMemoryAuditSink {
    entries: Arc<RwLock<Vec<AuditEntry>>>,
    appends: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
}

impl InMemoryAuditSink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every later append fails.
    pub fn fail_appends(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// Rows received so far.
    pub async fn entries(&self) -> Vec<AuditEntry> {
        self.entries.read().await.clone()
    }

    /// Number of `append` calls received.
    pub fn appends(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditSink {
    async fn append(&self, entries: &[AuditEntry]) -> Result<(), RunError> {
        self.appends.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(RunError::Audit("log worksheet unavailable".to_string()));
        }
        self.entries.write().await.extend_from_slice(entries);
        Ok(())
    }
}

/// Credentials fixed at construction; `None` behaves like unset variables.
#[derive(Debug, Clone)]
pub struct StaticCredentials(Option<ConsoleCredentials>);

impl StaticCredentials {
    /// Store yielding the given credentials.
    pub fn new(principal: impl Into<String>, secret: impl Into<String>) -> Self {
        Self(Some(ConsoleCredentials {
            principal: principal.into(),
            secret: secret.into(),
        }))
    }

    /// Store with nothing set.
    pub const fn missing() -> Self {
        Self(None)
    }
}

impl CredentialStore for StaticCredentials {
    fn console_credentials(&self) -> Result<ConsoleCredentials, RunError> {
        self.0
            .clone()
            .ok_or_else(|| RunError::Configuration("Missing console credentials".to_string()))
    }
}
