//! Orphan cleanup for order arrays.
//!
//! Order arrays are persisted denormalized and can disagree with the actual
//! member set: a task deleted by another client may still be referenced, and
//! a task created elsewhere may be missing. Reconciliation runs on every
//! full board load and repairs both directions.

use std::collections::HashSet;

/// Result of reconciling one order array against ground truth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// The corrected order: survivors in their original relative order,
    /// followed by live members the array did not know about.
    pub order: Vec<String>,
    /// Whether any orphaned id was dropped. A drop means the corrected
    /// array should be persisted back (fire-and-forget).
    pub dropped: bool,
    /// How many live members were appended because the array missed them.
    pub appended: usize,
}

impl ReconcileOutcome {
    pub fn changed(&self) -> bool {
        self.dropped || self.appended > 0
    }
}

/// Repair `order` against the authoritative set of currently-existing
/// members `live`.
///
/// Ids absent from `live` are filtered out (orphans are never dereferenced).
/// Ids present in `live` but missing from `order` are appended at the end in
/// discovery order — "not found" never means "invisible".
pub fn reconcile_order(order: &[String], live: &[String]) -> ReconcileOutcome {
    let live_set: HashSet<&str> = live.iter().map(String::as_str).collect();

    let mut repaired: Vec<String> = order
        .iter()
        .filter(|id| live_set.contains(id.as_str()))
        .cloned()
        .collect();
    let dropped = repaired.len() != order.len();

    let known: HashSet<&str> = repaired.iter().map(String::as_str).collect();
    let missing: Vec<String> = live
        .iter()
        .filter(|id| !known.contains(id.as_str()))
        .cloned()
        .collect();
    let appended = missing.len();
    repaired.extend(missing);

    ReconcileOutcome {
        order: repaired,
        dropped,
        appended,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_orphans_are_dropped() {
        // Order contains [x,y,z] but only x and z currently exist.
        let outcome = reconcile_order(&ids(&["x", "y", "z"]), &ids(&["x", "z"]));
        assert_eq!(outcome.order, ids(&["x", "z"]));
        assert!(outcome.dropped);
        assert_eq!(outcome.appended, 0);
    }

    #[test]
    fn test_no_orphans_survive() {
        let order = ids(&["a", "dead1", "b", "dead2", "c"]);
        let live = ids(&["c", "a", "b"]);
        let outcome = reconcile_order(&order, &live);
        for id in &outcome.order {
            assert!(live.contains(id), "orphan {} survived reconciliation", id);
        }
        // Relative order of survivors preserved
        assert_eq!(outcome.order, ids(&["a", "b", "c"]));
    }

    #[test]
    fn test_missing_members_appended_in_discovery_order() {
        let outcome = reconcile_order(&ids(&["b"]), &ids(&["a", "b", "c"]));
        assert_eq!(outcome.order, ids(&["b", "a", "c"]));
        assert!(!outcome.dropped);
        assert_eq!(outcome.appended, 2);
        assert!(outcome.changed());
    }

    #[test]
    fn test_clean_array_is_unchanged() {
        let order = ids(&["a", "b", "c"]);
        let outcome = reconcile_order(&order, &ids(&["a", "b", "c"]));
        assert_eq!(outcome.order, order);
        assert!(!outcome.dropped);
        assert!(!outcome.changed());
    }

    #[test]
    fn test_empty_order_gains_all_live_members() {
        let outcome = reconcile_order(&[], &ids(&["l1", "l2", "l3"]));
        assert_eq!(outcome.order, ids(&["l1", "l2", "l3"]));
        assert!(!outcome.dropped);
        assert_eq!(outcome.appended, 3);
    }

    #[test]
    fn test_everything_deleted() {
        let outcome = reconcile_order(&ids(&["a", "b"]), &[]);
        assert!(outcome.order.is_empty());
        assert!(outcome.dropped);
    }
}
