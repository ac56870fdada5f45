//! Implementation of the `capsync run` command.

use anyhow::Result;
use serde::Serialize;
use uuid::Uuid;

use crate::adapters::http::SUCCESS_MESSAGE;
use crate::cli::output::{list_table, name_list, output, CommandOutput};
use crate::domain::models::{Config, PauseStatus, TransitionDecision};
use crate::infrastructure::setup::build_run_service;
use crate::services::RunSummary;

/// Outcome for one contractor in a run.
#[derive(Debug, Serialize)]
pub struct ContractorOutcome {
    /// Desired-state name
    pub name: String,
    /// Status before the run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<PauseStatus>,
    /// Status after the run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new: Option<PauseStatus>,
    /// Decision taken
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<TransitionDecision>,
    /// Why the contractor was skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of `capsync run`.
#[derive(Debug, Serialize)]
pub struct RunOutput {
    /// Run id, as logged
    pub run_id: Uuid,
    /// Same message the HTTP trigger returns
    pub message: String,
    /// Contractors switched to active
    pub activated: Vec<String>,
    /// Contractors switched to paused
    pub paused: Vec<String>,
    /// Audit rows written
    pub audited: usize,
    /// Every processed contractor, in sheet order
    pub contractors: Vec<ContractorOutcome>,
    /// Contractors skipped by the exclusion policy
    pub excluded: Vec<String>,
}

impl From<&RunSummary> for RunOutput {
    fn from(summary: &RunSummary) -> Self {
        let contractors = summary
            .result
            .reports()
            .iter()
            .map(|report| match &report.outcome {
                Ok(t) => ContractorOutcome {
                    name: report.name.clone(),
                    previous: Some(t.previous),
                    new: Some(t.new),
                    decision: Some(t.decision),
                    error: None,
                },
                Err(f) => ContractorOutcome {
                    name: report.name.clone(),
                    previous: None,
                    new: None,
                    decision: None,
                    error: Some(format!("{}: {}", f.stage, f.error)),
                },
            })
            .collect();

        Self {
            run_id: summary.run_id,
            message: SUCCESS_MESSAGE.to_string(),
            activated: summary.activated(),
            paused: summary.paused(),
            audited: summary.audited,
            contractors,
            excluded: summary.result.excluded().to_vec(),
        }
    }
}

impl CommandOutput for RunOutput {
    fn to_human(&self) -> String {
        if self.contractors.is_empty() && self.excluded.is_empty() {
            return "No contractors to reconcile.".to_string();
        }

        let mut table = list_table(&["Contractor", "Previous", "New", "Result"]);
        for c in &self.contractors {
            let status = |s: Option<PauseStatus>| s.map_or("-", PauseStatus::as_str);
            let result = match (&c.error, c.decision) {
                (Some(error), _) => format!("failed ({error})"),
                (None, Some(decision)) => decision.as_str().replace('_', " "),
                (None, None) => String::new(),
            };
            table.add_row(vec![
                c.name.clone(),
                status(c.previous).to_string(),
                status(c.new).to_string(),
                result,
            ]);
        }
        for name in &self.excluded {
            table.add_row(vec![name.clone(), "-".into(), "-".into(), "excluded".into()]);
        }

        [
            table.to_string(),
            String::new(),
            format!("Activated: {}", name_list(&self.activated)),
            format!("Paused:    {}", name_list(&self.paused)),
            format!("Audit rows written: {}", self.audited),
        ]
        .join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Perform one run against the configured console and spreadsheet.
pub async fn execute(config: &Config, json_mode: bool) -> Result<()> {
    let service = build_run_service(config)?;
    let summary = service.run().await?;
    output(&RunOutput::from(&summary), json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        ConsoleEntry, InMemoryAuditSink, InMemoryConsole, InMemoryDesiredState, StaticCredentials,
    };
    use crate::domain::models::DesiredStateRecord;
    use crate::services::{ExcludedNames, Reconciler, RunService};
    use std::sync::Arc;

    async fn summary() -> RunSummary {
        let console = InMemoryConsole::new([
            ConsoleEntry::new("Acme Co", false),
            ConsoleEntry::new("Beta LLC", true),
        ]);
        let service = RunService::new(
            Arc::new(StaticCredentials::new("ops@example.com", "pw")),
            Arc::new(InMemoryDesiredState::new(vec![
                DesiredStateRecord::new("Acme Co", PauseStatus::Paused),
                DesiredStateRecord::new("Gamma Inc", PauseStatus::Active),
                DesiredStateRecord::new("Beta LLC", PauseStatus::Active),
            ])),
            Arc::new(console),
            Arc::new(InMemoryAuditSink::new()),
            Reconciler::new().with_exclusion(ExcludedNames::new(["Beta LLC"])),
        );
        service.run().await.unwrap()
    }

    #[tokio::test]
    async fn test_run_output_lists_every_record() {
        let out = RunOutput::from(&summary().await);
        assert_eq!(out.paused, vec!["Acme Co".to_string()]);
        assert!(out.activated.is_empty());
        assert_eq!(out.excluded, vec!["Beta LLC".to_string()]);
        assert_eq!(out.contractors.len(), 2);
        assert_eq!(out.contractors[1].name, "Gamma Inc");
        assert!(out.contractors[1].error.is_some());

        let human = out.to_human();
        assert!(human.contains("Acme Co"));
        assert!(human.contains("excluded"));
        assert!(human.contains("Paused:    Acme Co"));
    }

    #[tokio::test]
    async fn test_run_output_json() {
        let json = RunOutput::from(&summary().await).to_json();
        assert_eq!(json["message"], "Bot executed successfully");
        assert_eq!(json["contractors"][0]["previous"], "Active");
        assert_eq!(json["contractors"][0]["decision"], "pause");
        assert!(json["contractors"][1].get("previous").is_none());
    }
}
