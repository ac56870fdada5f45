//! Audit sinks backed by local files, plus fan-out to several sinks.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::info;

use crate::domain::errors::RunError;
use crate::domain::models::AuditEntry;
use crate::domain::ports::AuditSink;

/// Appends audit rows to a JSON-lines file.
///
/// The file and its parent directories are created on first write. Existing
/// content is never truncated.
#[derive(Clone)]
pub struct JsonlAuditSink {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl JsonlAuditSink {
    /// Sink appending to the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    async fn write_lines(&self, entries: &[AuditEntry]) -> std::io::Result<()> {
        let mut buf = Vec::new();
        for entry in entries {
            serde_json::to_writer(&mut buf, entry)?;
            buf.push(b'\n');
        }

        let _guard = self.lock.lock().await;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&buf).await?;
        file.flush().await
    }
}

#[async_trait]
impl AuditSink for JsonlAuditSink {
    async fn append(&self, entries: &[AuditEntry]) -> Result<(), RunError> {
        self.write_lines(entries).await.map_err(|e| {
            RunError::Audit(format!(
                "failed to write audit file {}: {e}",
                self.path.display()
            ))
        })?;
        info!(path = %self.path.display(), rows = entries.len(), "audit rows mirrored");
        Ok(())
    }
}

/// Writes to every inner sink in order and stops at the first failure.
pub struct FanOutAuditSink {
    sinks: Vec<Arc<dyn AuditSink>>,
}

impl FanOutAuditSink {
    /// Fan out to `sinks`, in the order given.
    pub fn new(sinks: Vec<Arc<dyn AuditSink>>) -> Self {
        Self { sinks }
    }
}

#[async_trait]
impl AuditSink for FanOutAuditSink {
    async fn append(&self, entries: &[AuditEntry]) -> Result<(), RunError> {
        for sink in &self.sinks {
            sink.append(entries).await?;
        }
        Ok(())
    }
}
