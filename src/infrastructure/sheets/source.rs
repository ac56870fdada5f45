use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use super::client::SheetsClient;
use super::error::SheetsError;
use super::models::cell_text;
use crate::domain::errors::RunError;
use crate::domain::models::{DesiredStateRecord, PauseStatus, SheetsConfig};
use crate::domain::ports::DesiredStateSource;

/// Desired pause state read from a worksheet.
///
/// The first row is the header; every later row is one record keyed by the
/// header names. Rows with an empty name or an unknown status are skipped.
pub struct SheetsDesiredStateSource {
    client: Arc<SheetsClient>,
    worksheet: String,
    name_column: String,
    status_column: String,
}

impl SheetsDesiredStateSource {
    /// Source reading `sheets.desired_worksheet`.
    pub fn new(client: Arc<SheetsClient>, config: &SheetsConfig) -> Self {
        Self {
            client,
            worksheet: config.desired_worksheet.clone(),
            name_column: config.name_column.clone(),
            status_column: config.status_column.clone(),
        }
    }
}

#[async_trait]
impl DesiredStateSource for SheetsDesiredStateSource {
    async fn load(&self) -> Result<Vec<DesiredStateRecord>, RunError> {
        let range = self
            .client
            .get_values(&self.worksheet)
            .await
            .map_err(|e| e.into_run_error(RunError::DesiredState))?;

        let records = parse_records(
            &range.values,
            &self.worksheet,
            &self.name_column,
            &self.status_column,
        )
        .map_err(|e| e.into_run_error(RunError::DesiredState))?;
        info!(worksheet = %self.worksheet, records = records.len(), "desired state read");
        Ok(records)
    }
}

/// Turn raw worksheet rows into records, in sheet order.
pub fn parse_records(
    rows: &[Vec<Value>],
    worksheet: &str,
    name_column: &str,
    status_column: &str,
) -> Result<Vec<DesiredStateRecord>, SheetsError> {
    let Some((header, body)) = rows.split_first() else {
        return Ok(Vec::new());
    };

    let column = |wanted: &str| {
        header
            .iter()
            .position(|h| cell_text(h).trim() == wanted)
            .ok_or_else(|| SheetsError::MissingColumn {
                worksheet: worksheet.to_string(),
                column: wanted.to_string(),
            })
    };
    let name_idx = column(name_column)?;
    let status_idx = column(status_column)?;

    let mut records = Vec::with_capacity(body.len());
    for (offset, row) in body.iter().enumerate() {
        // 1-based, after the header
        let row_number = offset + 2;
        let cell = |idx: usize| row.get(idx).map(cell_text).unwrap_or_default();

        let name = cell(name_idx);
        let name = name.trim();
        if name.is_empty() {
            if row.iter().any(|c| !cell_text(c).trim().is_empty()) {
                warn!(worksheet, row = row_number, "row has no contractor name, skipping");
            }
            continue;
        }

        match cell(status_idx).parse::<PauseStatus>() {
            Ok(status) => records.push(DesiredStateRecord::new(name, status)),
            Err(e) => {
                warn!(worksheet, row = row_number, contractor = %name, error = %e, "skipping row");
            }
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::sheets::client::tests::{client, token_mock};
    use mockito::Server;
    use serde_json::json;

    fn rows(value: Value) -> Vec<Vec<Value>> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_records_in_sheet_order() {
        let rows = rows(json!([
            ["Contractor Name", "Pause Status", "Notes"],
            ["Acme Co", "Paused", ""],
            [" Beta LLC ", "Active"],
            ["Gamma Inc", "paused", "lowercase is invalid"],
            ["", "Paused"],
            [],
            ["Delta", ""],
            ["Acme Co", "Active"]
        ]));

        let records = parse_records(&rows, "Main", "Contractor Name", "Pause Status").unwrap();
        assert_eq!(
            records,
            vec![
                DesiredStateRecord::new("Acme Co", PauseStatus::Paused),
                DesiredStateRecord::new("Beta LLC", PauseStatus::Active),
                DesiredStateRecord::new("Acme Co", PauseStatus::Active),
            ]
        );
    }

    #[test]
    fn test_columns_found_by_header_not_position() {
        let rows = rows(json!([
            ["Pause Status", "Region", "Contractor Name"],
            ["Active", "South", "Acme Co"]
        ]));
        let records = parse_records(&rows, "Main", "Contractor Name", "Pause Status").unwrap();
        assert_eq!(records, vec![DesiredStateRecord::new("Acme Co", PauseStatus::Active)]);
    }

    #[test]
    fn test_missing_column() {
        let rows = rows(json!([["Name", "Pause Status"], ["Acme Co", "Paused"]]));
        let err = parse_records(&rows, "Main", "Contractor Name", "Pause Status").unwrap_err();
        assert_eq!(err.to_string(), "worksheet \"Main\" has no \"Contractor Name\" column");
    }

    #[test]
    fn test_empty_sheet() {
        assert!(parse_records(&[], "Main", "Contractor Name", "Pause Status")
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_load_from_worksheet() {
        let mut server = Server::new_async().await;
        let _token = token_mock(&mut server).await;
        let _values = server
            .mock("GET", "/spreadsheets/abc/values/'Main'")
            .with_status(200)
            .with_body(
                json!({ "values": [["Contractor Name", "Pause Status"], ["Acme Co", "Paused"]] })
                    .to_string(),
            )
            .create_async()
            .await;

        let source = SheetsDesiredStateSource::new(
            Arc::new(client(&server, "abc")),
            &SheetsConfig::default(),
        );
        let records = source.load().await.unwrap();
        assert_eq!(records, vec![DesiredStateRecord::new("Acme Co", PauseStatus::Paused)]);
    }

    #[tokio::test]
    async fn test_unreachable_sheet_is_desired_state_error() {
        let mut server = Server::new_async().await;
        let _token = token_mock(&mut server).await;
        let _values = server
            .mock("GET", "/spreadsheets/abc/values/'Main'")
            .with_status(404)
            .with_body(
                json!({ "error": { "message": "Requested entity was not found." } }).to_string(),
            )
            .create_async()
            .await;

        let source = SheetsDesiredStateSource::new(
            Arc::new(client(&server, "abc")),
            &SheetsConfig::default(),
        );
        assert!(matches!(source.load().await, Err(RunError::DesiredState(_))));
    }
}
