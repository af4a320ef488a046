//! Order Store: per-container ordered member id sequences.
//!
//! A container is a board (whose members are list ids) or a list (whose
//! members are task ids). This is pure sequence storage with low-level
//! mutation primitives; orphan policy and move semantics live in
//! [`crate::reconcile`] and [`crate::moves`].

use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    #[error("index {index} out of range for container {container} (len {len})")]
    InvalidIndex {
        container: String,
        index: usize,
        len: usize,
    },
}

/// Ordered member ids keyed by container id.
#[derive(Debug, Default)]
pub struct OrderStore {
    orders: HashMap<String, Vec<String>>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self {
            orders: HashMap::new(),
        }
    }

    /// Replace a container's order wholesale (used on load/resync).
    pub fn set_order(&mut self, container: &str, order: Vec<String>) {
        self.orders.insert(container.to_string(), order);
    }

    /// Current order for a container. Unknown containers are empty, not an
    /// error — a freshly created board has no order array yet.
    pub fn order(&self, container: &str) -> &[String] {
        self.orders.get(container).map_or(&[], Vec::as_slice)
    }

    pub fn len(&self, container: &str) -> usize {
        self.order(container).len()
    }

    pub fn is_empty(&self, container: &str) -> bool {
        self.order(container).is_empty()
    }

    pub fn position(&self, container: &str, member: &str) -> Option<usize> {
        self.order(container).iter().position(|id| id == member)
    }

    pub fn contains(&self, container: &str, member: &str) -> bool {
        self.position(container, member).is_some()
    }

    /// Insert `member` at `index`, shifting subsequent entries right.
    /// `index == len` appends. Does NOT deduplicate: if the member is
    /// already present elsewhere the caller must remove it first.
    pub fn insert_at(
        &mut self,
        container: &str,
        member: &str,
        index: usize,
    ) -> Result<(), OrderError> {
        let order = self.orders.entry(container.to_string()).or_default();
        if index > order.len() {
            return Err(OrderError::InvalidIndex {
                container: container.to_string(),
                index,
                len: order.len(),
            });
        }
        order.insert(index, member.to_string());
        Ok(())
    }

    /// Availability-preserving insert: clamps `index` to `[0, len]` and
    /// returns the index actually used.
    pub fn insert_clamped(&mut self, container: &str, member: &str, index: usize) -> usize {
        let order = self.orders.entry(container.to_string()).or_default();
        let index = index.min(order.len());
        order.insert(index, member.to_string());
        index
    }

    /// Append a member at the end of a container's order.
    pub fn push(&mut self, container: &str, member: &str) {
        self.orders
            .entry(container.to_string())
            .or_default()
            .push(member.to_string());
    }

    /// Remove the first occurrence of `member`. Absence is a no-op, not an
    /// error — the member may already have been removed by a concurrent
    /// operation. Returns whether anything was removed.
    pub fn remove_by_id(&mut self, container: &str, member: &str) -> bool {
        match self.orders.get_mut(container) {
            Some(order) => match order.iter().position(|id| id == member) {
                Some(pos) => {
                    order.remove(pos);
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    /// Drop a container entirely (cascade when its entity is deleted).
    pub fn remove_container(&mut self, container: &str) {
        self.orders.remove(container);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_at_shifts_right() {
        let mut store = OrderStore::new();
        store.set_order("l1", vec!["a".into(), "b".into(), "c".into()]);
        store.insert_at("l1", "x", 1).unwrap();
        assert_eq!(store.order("l1"), ["a", "x", "b", "c"]);
    }

    #[test]
    fn test_insert_at_end_appends() {
        let mut store = OrderStore::new();
        store.set_order("l1", vec!["a".into()]);
        store.insert_at("l1", "b", 1).unwrap();
        assert_eq!(store.order("l1"), ["a", "b"]);
    }

    #[test]
    fn test_insert_at_past_end_is_invalid() {
        let mut store = OrderStore::new();
        store.set_order("l1", vec!["a".into()]);
        let err = store.insert_at("l1", "b", 5).unwrap_err();
        assert_eq!(
            err,
            OrderError::InvalidIndex {
                container: "l1".into(),
                index: 5,
                len: 1
            }
        );
        // Failed insert left the sequence untouched
        assert_eq!(store.order("l1"), ["a"]);
    }

    #[test]
    fn test_insert_clamped_caps_at_len() {
        let mut store = OrderStore::new();
        store.set_order("l1", vec!["a".into(), "b".into()]);
        let used = store.insert_clamped("l1", "c", 99);
        assert_eq!(used, 2);
        assert_eq!(store.order("l1"), ["a", "b", "c"]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut store = OrderStore::new();
        store.set_order("l1", vec!["a".into()]);
        assert!(!store.remove_by_id("l1", "zz"));
        assert!(!store.remove_by_id("no-such-container", "a"));
        assert_eq!(store.order("l1"), ["a"]);
    }

    #[test]
    fn test_insert_then_remove_restores_sequence() {
        // insert_at followed by remove_by_id on the same id restores the
        // original length and relative order of the remaining ids.
        let original = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        for index in 0..=original.len() {
            let mut store = OrderStore::new();
            store.set_order("l1", original.clone());
            store.insert_at("l1", "x", index).unwrap();
            assert!(store.remove_by_id("l1", "x"));
            assert_eq!(store.order("l1"), original.as_slice());
        }
    }

    #[test]
    fn test_unknown_container_reads_empty() {
        let store = OrderStore::new();
        assert!(store.order("nope").is_empty());
        assert_eq!(store.len("nope"), 0);
        assert_eq!(store.position("nope", "a"), None);
    }
}
