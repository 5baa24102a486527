//! Per-manager aggregation of an event's registrations.
//!
//! Recomputed on every report request; nothing here is cached or persisted.

use crate::registration::Registration;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Label used for registrations that carry no manager.
pub const NO_MANAGER_LABEL: &str = "no manager";

/// Number of registrations attributed to one manager label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManagerStat {
    /// Manager name, or [`NO_MANAGER_LABEL`]
    pub name: String,
    /// Registrations bearing this label
    pub count: usize,
}

/// Summary of an event's registrations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Number of registrations summarized
    pub total_count: usize,
    /// One entry per distinct label, in no particular order
    pub manager_stats: Vec<ManagerStat>,
}

impl Report {
    /// Manager stats in display order: largest count first, then by name.
    #[must_use]
    pub fn sorted_stats(&self) -> Vec<ManagerStat> {
        let mut stats = self.manager_stats.clone();
        stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        stats
    }
}

/// Label a registration is counted under.
#[must_use]
pub fn manager_label(manager_name: &str) -> &str {
    if manager_name.is_empty() {
        NO_MANAGER_LABEL
    } else {
        manager_name
    }
}

/// Count registrations per manager label.
///
/// Never fails; the empty slice yields an empty report.
#[must_use]
pub fn summarize(registrations: &[Registration]) -> Report {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for registration in registrations {
        *counts
            .entry(manager_label(&registration.manager_name))
            .or_default() += 1;
    }

    Report {
        total_count: registrations.len(),
        manager_stats: counts
            .into_iter()
            .map(|(name, count)| ManagerStat {
                name: name.to_string(),
                count,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn registration(user_id: &str, manager_name: &str) -> Registration {
        Registration {
            event_id: "ev1".to_string(),
            user_id: user_id.to_string(),
            manager_name: manager_name.to_string(),
            recorded_at: Utc::now(),
        }
    }

    fn stat_set(report: &Report) -> HashSet<(String, usize)> {
        report
            .manager_stats
            .iter()
            .map(|s| (s.name.clone(), s.count))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let report = summarize(&[]);
        assert_eq!(report.total_count, 0);
        assert!(report.manager_stats.is_empty());
    }

    #[test]
    fn test_empty_manager_gets_its_own_label() {
        let report = summarize(&[registration("u1", ""), registration("u2", "Alice")]);

        assert_eq!(report.total_count, 2);
        assert_eq!(
            stat_set(&report),
            HashSet::from([
                ("Alice".to_string(), 1),
                (NO_MANAGER_LABEL.to_string(), 1)
            ])
        );
    }

    #[test]
    fn test_same_manager_folds() {
        let report = summarize(&[registration("u1", "Alice"), registration("u2", "Alice")]);

        assert_eq!(report.total_count, 2);
        assert_eq!(
            report.manager_stats,
            vec![ManagerStat {
                name: "Alice".to_string(),
                count: 2
            }]
        );
    }

    #[test]
    fn test_sorted_stats() {
        let report = summarize(&[
            registration("u1", "Bob"),
            registration("u2", "Alice"),
            registration("u3", "Carol"),
            registration("u4", "Carol"),
        ]);

        let names: Vec<String> = report.sorted_stats().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Carol", "Alice", "Bob"]);
    }

    proptest! {
        #[test]
        fn prop_summary_is_order_independent(
            managers in proptest::collection::vec(
                prop_oneof![Just(""), Just("Alice"), Just("Bob"), Just("Carol")],
                0..40,
            ),
            seed in any::<u64>(),
        ) {
            let rows: Vec<Registration> = managers
                .iter()
                .enumerate()
                .map(|(i, m)| registration(&format!("u{i}"), m))
                .collect();

            // Deterministic shuffle driven by the seed
            let mut shuffled = rows.clone();
            let len = shuffled.len();
            if len > 1 {
                let mut state = seed;
                for i in (1..len).rev() {
                    state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
                    let j = usize::try_from(state >> 33).unwrap_or(0) % (i + 1);
                    shuffled.swap(i, j);
                }
            }

            let original = summarize(&rows);
            let permuted = summarize(&shuffled);

            prop_assert_eq!(original.total_count, rows.len());
            prop_assert_eq!(original.total_count, permuted.total_count);
            prop_assert_eq!(stat_set(&original), stat_set(&permuted));
            prop_assert_eq!(
                original.manager_stats.iter().map(|s| s.count).sum::<usize>(),
                rows.len()
            );
        }
    }
}
