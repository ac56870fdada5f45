use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use super::client::SheetsClient;
use crate::domain::errors::RunError;
use crate::domain::models::{AuditEntry, SheetsConfig};
use crate::domain::ports::AuditSink;

/// Appends audit rows to the log worksheet in one request.
///
/// Columns: timestamp, ISO week, contractor, previous status, new status.
pub struct SheetsAuditSink {
    client: Arc<SheetsClient>,
    worksheet: String,
}

impl SheetsAuditSink {
    /// Sink appending to `sheets.log_worksheet`.
    pub fn new(client: Arc<SheetsClient>, config: &SheetsConfig) -> Self {
        Self {
            client,
            worksheet: config.log_worksheet.clone(),
        }
    }
}

#[async_trait]
impl AuditSink for SheetsAuditSink {
    async fn append(&self, entries: &[AuditEntry]) -> Result<(), RunError> {
        if entries.is_empty() {
            return Ok(());
        }
        let rows = entries.iter().map(AuditEntry::to_row).collect();
        self.client
            .append_rows(&self.worksheet, rows)
            .await
            .map_err(|e| e.into_run_error(RunError::Audit))?;
        info!(worksheet = %self.worksheet, rows = entries.len(), "audit rows appended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::PauseStatus;
    use crate::infrastructure::sheets::auth::KeySource;
    use crate::infrastructure::sheets::client::tests::{client, token_mock};
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn entry(name: &str, previous: PauseStatus, new: PauseStatus) -> AuditEntry {
        AuditEntry {
            timestamp: "2025-03-14 09:05:07".to_string(),
            iso_week: 11,
            name: name.to_string(),
            previous,
            new,
        }
    }

    #[tokio::test]
    async fn test_rows_written_in_order() {
        let mut server = Server::new_async().await;
        let _token = token_mock(&mut server).await;
        let append = server
            .mock("POST", "/spreadsheets/abc/values/'Log':append")
            .match_query(Matcher::Any)
            .match_body(Matcher::PartialJson(json!({
                "values": [
                    ["2025-03-14 09:05:07", 11, "Acme Co", "Active", "Paused"],
                    ["2025-03-14 09:05:07", 11, "Beta LLC", "Paused", "Paused"]
                ]
            })))
            .with_status(200)
            .with_body("{}")
            .expect(1)
            .create_async()
            .await;

        let sink = SheetsAuditSink::new(Arc::new(client(&server, "abc")), &SheetsConfig::default());
        sink.append(&[
            entry("Acme Co", PauseStatus::Active, PauseStatus::Paused),
            entry("Beta LLC", PauseStatus::Paused, PauseStatus::Paused),
        ])
        .await
        .unwrap();
        append.assert_async().await;
    }

    #[tokio::test]
    async fn test_append_failure_is_audit_error() {
        let mut server = Server::new_async().await;
        let _token = token_mock(&mut server).await;
        let _append = server
            .mock("POST", "/spreadsheets/abc/values/'Log':append")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("backend error")
            .create_async()
            .await;

        let sink = SheetsAuditSink::new(Arc::new(client(&server, "abc")), &SheetsConfig::default());
        let err = sink
            .append(&[entry("Acme Co", PauseStatus::Active, PauseStatus::Paused)])
            .await
            .unwrap_err();
        assert!(matches!(err, RunError::Audit(ref m) if m.contains("backend error")));
    }

    #[tokio::test]
    async fn test_missing_key_is_configuration_error() {
        let config = SheetsConfig {
            spreadsheet_id: "abc".to_string(),
            ..SheetsConfig::default()
        };
        let client = SheetsClient::new(
            &config,
            KeySource::Env("CAPSYNC_TEST_MISSING_KEY".to_string()),
        )
        .unwrap();
        let sink = SheetsAuditSink::new(Arc::new(client), &config);

        let err = temp_env::async_with_vars([("CAPSYNC_TEST_MISSING_KEY", None::<&str>)], async {
            sink.append(&[entry("Acme Co", PauseStatus::Active, PauseStatus::Paused)])
                .await
                .unwrap_err()
        })
        .await;
        assert!(matches!(err, RunError::Configuration(_)));
    }
}
