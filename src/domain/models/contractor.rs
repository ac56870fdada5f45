//! Contractor records as supplied by the desired-state source.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pause flag of a contractor, rendered the way the spreadsheet and the
/// audit log spell it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauseStatus {
    /// Receiving work.
    Active,
    /// Not receiving work.
    Paused,
}

impl PauseStatus {
    /// Status for a checked (`true`) or unchecked pause flag.
    pub const fn from_paused(paused: bool) -> Self {
        if paused {
            Self::Paused
        } else {
            Self::Active
        }
    }

    /// Whether this is [`PauseStatus::Paused`].
    pub const fn is_paused(self) -> bool {
        matches!(self, Self::Paused)
    }

    /// Spelling used in the spreadsheet and the audit log.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Paused => "Paused",
        }
    }
}

impl fmt::Display for PauseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a cell holds something other than `Paused` or `Active`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized pause status: {0:?} (expected \"Paused\" or \"Active\")")]
pub struct InvalidPauseStatus(pub String);

impl FromStr for PauseStatus {
    type Err = InvalidPauseStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Paused" => Ok(Self::Paused),
            "Active" => Ok(Self::Active),
            other => Err(InvalidPauseStatus(other.to_string())),
        }
    }
}

/// Intended state of one contractor for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredStateRecord {
    /// Matching key against the live console. Never empty.
    pub name: String,
    /// Whether the contractor should be paused.
    pub desired_paused: bool,
}

impl DesiredStateRecord {
    /// Record wanting `name` in the `desired` state.
    pub fn new(name: impl Into<String>, desired: PauseStatus) -> Self {
        Self {
            name: name.into(),
            desired_paused: desired.is_paused(),
        }
    }

    /// The desired flag as a status value.
    pub const fn desired_status(&self) -> PauseStatus {
        PauseStatus::from_paused(self.desired_paused)
    }

    /// Name with surrounding whitespace removed, as used for matching.
    pub fn key(&self) -> &str {
        self.name.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pause_status() {
        assert_eq!("Paused".parse::<PauseStatus>(), Ok(PauseStatus::Paused));
        assert_eq!(" Active ".parse::<PauseStatus>(), Ok(PauseStatus::Active));
        assert!("paused".parse::<PauseStatus>().is_err());
        assert!("".parse::<PauseStatus>().is_err());
    }

    #[test]
    fn test_status_display_matches_sheet_spelling() {
        assert_eq!(PauseStatus::Paused.to_string(), "Paused");
        assert_eq!(PauseStatus::from_paused(false).to_string(), "Active");
    }

    #[test]
    fn test_record_key_is_trimmed() {
        let record = DesiredStateRecord::new("  Acme Co ", PauseStatus::Paused);
        assert_eq!(record.key(), "Acme Co");
        assert!(record.desired_paused);
        assert_eq!(record.desired_status(), PauseStatus::Paused);
    }
}
