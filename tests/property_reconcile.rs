//! Property tests for the decision function and run idempotence.

use capsync::adapters::memory::{ConsoleEntry, InMemoryConsole};
use capsync::domain::models::{DesiredStateRecord, PauseStatus, TransitionDecision};
use capsync::services::Reconciler;
use proptest::prelude::*;

proptest! {
    /// Property: a toggle is required exactly when desired and observed differ,
    /// and its direction follows the desired state.
    #[test]
    fn prop_decision_matches_state_difference(desired in any::<bool>(), current in any::<bool>()) {
        let decision = TransitionDecision::decide(desired, current);
        prop_assert_eq!(decision.requires_toggle(), desired != current);
        match decision {
            TransitionDecision::Pause => prop_assert!(desired && !current),
            TransitionDecision::Activate => prop_assert!(!desired && current),
            TransitionDecision::NoChange => prop_assert_eq!(desired, current),
        }
    }

    /// Property: after one pass, a second pass over the same records with no
    /// external change decides NoChange for every contractor and toggles nothing.
    #[test]
    fn prop_second_pass_is_no_change(
        rows in prop::collection::vec((any::<bool>(), any::<bool>()), 0..12)
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        runtime.block_on(async {
            // Distinct names that are not substrings of one another
            let names: Vec<String> =
                (0..rows.len()).map(|i| format!("Contractor #{i:03}")).collect();
            let console = InMemoryConsole::new(
                names
                    .iter()
                    .zip(&rows)
                    .map(|(n, (_, current))| ConsoleEntry::new(n.clone(), *current)),
            );
            let records: Vec<_> = names
                .iter()
                .zip(&rows)
                .map(|(n, (desired, _))| {
                    DesiredStateRecord::new(n.clone(), PauseStatus::from_paused(*desired))
                })
                .collect();

            let reconciler = Reconciler::new();
            let first = reconciler.reconcile(&records, &console, &console).await;
            let expected_toggles = rows.iter().filter(|(d, c)| d != c).count();
            prop_assert_eq!(console.toggle_calls().await.len(), expected_toggles);
            prop_assert_eq!(first.transitions().count(), rows.len());

            let second = reconciler.reconcile(&records, &console, &console).await;
            prop_assert!(second.transitions().all(|t| t.decision == TransitionDecision::NoChange));
            prop_assert!(second.activated().is_empty() && second.paused().is_empty());
            prop_assert_eq!(console.toggle_calls().await.len(), expected_toggles);

            for (name, (desired, _)) in names.iter().zip(&rows) {
                prop_assert_eq!(console.is_paused_label(name).await, Some(*desired));
            }
            Ok(())
        })?;
    }

    /// Property: every paused/activated name was toggled and records the
    /// opposite previous state.
    #[test]
    fn prop_lists_agree_with_transitions(
        rows in prop::collection::vec((any::<bool>(), any::<bool>()), 1..10)
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        runtime.block_on(async {
            let names: Vec<String> =
                (0..rows.len()).map(|i| format!("Agent <{i}>")).collect();
            let console = InMemoryConsole::new(
                names
                    .iter()
                    .zip(&rows)
                    .map(|(n, (_, current))| ConsoleEntry::new(n.clone(), *current)),
            );
            let records: Vec<_> = names
                .iter()
                .zip(&rows)
                .map(|(n, (desired, _))| {
                    DesiredStateRecord::new(n.clone(), PauseStatus::from_paused(*desired))
                })
                .collect();

            let result = Reconciler::new().reconcile(&records, &console, &console).await;
            for t in result.transitions() {
                let listed_paused = result.paused().contains(&t.name);
                let listed_active = result.activated().contains(&t.name);
                prop_assert_eq!(listed_paused, t.decision == TransitionDecision::Pause);
                prop_assert_eq!(listed_active, t.decision == TransitionDecision::Activate);
                prop_assert_eq!(t.changed(), t.decision.requires_toggle());
            }
            Ok(())
        })?;
    }
}
