//! Work-queue state computation
//!
//! Pure logic deriving a run's pending queue from the three persisted
//! collections: the identifier universe, the identifiers already
//! materialized on disk, and the failures recorded by the previous run.

use crate::storage::{StateStore, StoreResult};
use std::collections::HashSet;

/// Computes the ordered pending queue for one run.
///
/// Not-yet-done identifiers come first, in universe order, followed by the
/// previous run's failures. An identifier never appears twice, and a prior
/// failure is dropped once it has succeeded or left the universe.
pub fn compute_pending(
    universe: &[String],
    done: &HashSet<String>,
    prior_failures: &[String],
) -> Vec<String> {
    let in_universe: HashSet<&str> = universe.iter().map(String::as_str).collect();

    let mut queued: HashSet<&str> = HashSet::new();
    let mut pending = Vec::new();
    for id in universe {
        if !done.contains(id) && queued.insert(id.as_str()) {
            pending.push(id.clone());
        }
    }
    for id in prior_failures {
        if in_universe.contains(id.as_str()) && !done.contains(id) && queued.insert(id.as_str()) {
            pending.push(id.clone());
        }
    }
    pending
}

/// Point-in-time progress summary for one section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionStatus {
    pub section: String,
    /// Universe size, absent until discovery has run once
    pub universe: Option<usize>,
    pub done: usize,
    pub failed: usize,
}

impl SectionStatus {
    /// Identifiers still to be materialized, if the universe is known
    pub fn outstanding(&self) -> Option<usize> {
        self.universe.map(|total| total.saturating_sub(self.done))
    }
}

/// Gathers the on-disk progress summary for one section.
pub fn section_status(store: &dyn StateStore, section: &str) -> StoreResult<SectionStatus> {
    Ok(SectionStatus {
        section: section.to_string(),
        universe: store.load_universe(section)?.map(|ids| ids.len()),
        done: store.done_ids(section)?.len(),
        failed: store.load_failures(section)?.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn done(values: &[&str]) -> HashSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_pending_is_universe_minus_done() {
        let pending = compute_pending(&ids(&["a", "b", "c", "d"]), &done(&["a", "b"]), &[]);
        assert_eq!(pending, ids(&["c", "d"]));
    }

    #[test]
    fn test_prior_failure_already_pending_is_not_duplicated() {
        let pending = compute_pending(
            &ids(&["a", "b", "c", "d"]),
            &done(&["a", "b"]),
            &ids(&["c"]),
        );
        assert_eq!(pending, ids(&["c", "d"]));
    }

    #[test]
    fn test_prior_failure_at_queue_end_keeps_universe_order() {
        let pending = compute_pending(
            &ids(&["a", "b", "c", "d"]),
            &done(&["a", "b"]),
            &ids(&["d"]),
        );
        assert_eq!(pending, ids(&["c", "d"]));
    }

    #[test]
    fn test_failure_outside_universe_is_dropped() {
        let pending = compute_pending(&ids(&["a", "b"]), &done(&["a"]), &ids(&["gone"]));
        assert_eq!(pending, ids(&["b"]));
    }

    #[test]
    fn test_failure_that_succeeded_since_is_dropped() {
        let pending = compute_pending(&ids(&["a", "b"]), &done(&["a", "b"]), &ids(&["a"]));
        assert!(pending.is_empty());
    }

    #[test]
    fn test_everything_done_means_empty_queue() {
        let pending = compute_pending(&ids(&["a", "b"]), &done(&["a", "b"]), &[]);
        assert!(pending.is_empty());
    }

    #[test]
    fn test_duplicate_universe_entries_are_processed_once() {
        let pending = compute_pending(&ids(&["a", "a", "b"]), &done(&[]), &[]);
        assert_eq!(pending, ids(&["a", "b"]));
    }

    #[test]
    fn test_outstanding_counts() {
        let status = SectionStatus {
            section: "open".to_string(),
            universe: Some(10),
            done: 4,
            failed: 2,
        };
        assert_eq!(status.outstanding(), Some(6));

        let undiscovered = SectionStatus {
            section: "open".to_string(),
            universe: None,
            done: 0,
            failed: 0,
        };
        assert_eq!(undiscovered.outstanding(), None);
    }
}
