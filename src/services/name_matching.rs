//! Name matching between desired-state records and rendered console entries.

use crate::domain::models::MatchStrategy;

/// Decides whether a rendered console label denotes the wanted contractor.
pub trait NameMatcher: Send + Sync {
    /// True when `rendered` is the contractor named `wanted`.
    fn matches(&self, wanted: &str, rendered: &str) -> bool;
}

impl NameMatcher for MatchStrategy {
    fn matches(&self, wanted: &str, rendered: &str) -> bool {
        match self {
            Self::Exact => wanted.trim() == rendered.trim(),
            Self::CaseInsensitive => {
                wanted.trim().to_lowercase() == rendered.trim().to_lowercase()
            }
            Self::Normalized => {
                let wanted = normalize(wanted);
                !wanted.is_empty() && wanted == normalize(rendered)
            }
        }
    }
}

/// Case-fold, drop punctuation and collapse runs of whitespace.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_trims_but_keeps_case() {
        let m = MatchStrategy::Exact;
        assert!(m.matches("Acme Co", "  Acme Co\n"));
        assert!(!m.matches("Acme Co", "acme co"));
        assert!(!m.matches("Acme Co", "Acme Co."));
        assert!(!m.matches("Acme", "Acme Co"));
    }

    #[test]
    fn test_case_insensitive() {
        let m = MatchStrategy::CaseInsensitive;
        assert!(m.matches("Acme Co", "ACME CO "));
        assert!(!m.matches("Acme Co", "Acme  Co"));
    }

    #[test]
    fn test_normalized_ignores_punctuation_and_spacing() {
        let m = MatchStrategy::Normalized;
        assert!(m.matches("Engel & Völkers", "engel  völkers"));
        assert!(m.matches("Beta, LLC", "Beta LLC"));
        assert!(!m.matches("Beta LLC", "Beta LLC 2"));
        assert!(!m.matches("...", "!!!"));
    }
}
