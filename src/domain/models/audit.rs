//! Audit rows written after each run.

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::contractor::PauseStatus;
use super::reconcile::RunResult;

/// Timestamp layout used in the audit log.
pub const AUDIT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One audit row: a contractor's state before and after a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Local time of the run, `%Y-%m-%d %H:%M:%S`.
    pub timestamp: String,
    /// ISO-8601 week of `timestamp`, 1 to 53.
    pub iso_week: u32,
    /// Contractor name.
    pub name: String,
    /// Status before the run.
    pub previous: PauseStatus,
    /// Status after the run.
    pub new: PauseStatus,
}

impl AuditEntry {
    /// Build one row per successfully reconciled entity, all stamped with `at`.
    ///
    /// Entities that were located but needed no change are included with
    /// `previous == new`; failed and excluded entities are not.
    pub fn from_run(result: &RunResult, at: NaiveDateTime) -> Vec<Self> {
        let timestamp = at.format(AUDIT_TIMESTAMP_FORMAT).to_string();
        let iso_week = at.date().iso_week().week();

        result
            .transitions()
            .map(|t| Self {
                timestamp: timestamp.clone(),
                iso_week,
                name: t.name.clone(),
                previous: t.previous,
                new: t.new,
            })
            .collect()
    }

    /// Cell values in log-sheet column order.
    pub fn to_row(&self) -> Vec<serde_json::Value> {
        vec![
            serde_json::Value::from(self.timestamp.clone()),
            serde_json::Value::from(self.iso_week),
            serde_json::Value::from(self.name.clone()),
            serde_json::Value::from(self.previous.as_str()),
            serde_json::Value::from(self.new.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::{EntityError, EntityFailure, FailureStage};
    use crate::domain::models::reconcile::{Transition, TransitionDecision};
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(9, 5, 7)
            .unwrap()
    }

    #[test]
    fn test_rows_skip_failures_and_keep_no_change() {
        let mut result = RunResult::new();
        result.record(
            "Beta LLC",
            Ok(Transition {
                name: "Beta LLC".to_string(),
                previous: PauseStatus::Paused,
                new: PauseStatus::Paused,
                decision: TransitionDecision::NoChange,
            }),
        );
        result.record(
            "Acme Co",
            Err(EntityFailure {
                name: "Acme Co".to_string(),
                stage: FailureStage::Locate,
                error: EntityError::NotFound("Acme Co".to_string()),
            }),
        );

        let rows = AuditEntry::from_run(&result, at(2025, 3, 14));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Beta LLC");
        assert_eq!(rows[0].timestamp, "2025-03-14 09:05:07");
        assert_eq!(rows[0].iso_week, 11);
        assert_eq!(rows[0].previous, rows[0].new);
    }

    #[test]
    fn test_iso_week_at_year_boundary() {
        // 2021-01-01 belongs to ISO week 53 of 2020.
        let rows = {
            let mut result = RunResult::new();
            result.record(
                "Acme Co",
                Ok(Transition {
                    name: "Acme Co".to_string(),
                    previous: PauseStatus::Active,
                    new: PauseStatus::Paused,
                    decision: TransitionDecision::Pause,
                }),
            );
            AuditEntry::from_run(&result, at(2021, 1, 1))
        };
        assert_eq!(rows[0].iso_week, 53);
    }

    #[test]
    fn test_row_layout() {
        let entry = AuditEntry {
            timestamp: "2025-03-14 09:05:07".to_string(),
            iso_week: 11,
            name: "Acme Co".to_string(),
            previous: PauseStatus::Active,
            new: PauseStatus::Paused,
        };
        assert_eq!(
            serde_json::Value::from(entry.to_row()),
            serde_json::json!(["2025-03-14 09:05:07", 11, "Acme Co", "Active", "Paused"])
        );
    }
}
