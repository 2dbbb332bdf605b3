use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;
use alloc::vec::Vec;

use tracing::trace;

use crate::{CausalOrder, Crdt, VectorClock};

/// An add-wins observed-remove set (OR-Set).
///
/// Every element carries a vector clock describing the causal history of
/// its latest operation. An element lives in `additions` after an insert
/// and in `removals` after a remove; local operations keep it in exactly
/// one of the two maps. Unlike the 2P-Set, a removed element can be
/// inserted again: the new insert's clock dominates the old removal.
///
/// A remove only evicts the additions it has observed. When an add and a
/// remove are concurrent (neither clock dominates), the add wins.
///
/// # Example
///
/// ```
/// use cvrdt::prelude::*;
///
/// let mut s1 = ORSet::new();
/// s1.insert("apple", "node-1");
/// s1.insert("banana", "node-1");
/// s1.remove("banana", "node-1");
///
/// let mut s2 = ORSet::new();
/// s2.insert("banana", "node-2"); // concurrent add
///
/// s1.merge(&s2);
/// // banana is present because node-2's add was concurrent with the remove
/// assert!(s1.contains(&"banana"));
/// assert!(s1.contains(&"apple"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ORSet<T: Ord, R: Ord = String> {
    additions: BTreeMap<T, VectorClock<R>>,
    removals: BTreeMap<T, VectorClock<R>>,
}

impl<T: Ord, R: Ord> ORSet<T, R> {
    /// Create a new empty OR-Set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            additions: BTreeMap::new(),
            removals: BTreeMap::new(),
        }
    }

    /// Check if `value` is a member.
    ///
    /// A member has an addition clock that is not causally before its
    /// removal clock (if any).
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        match (self.additions.get(value), self.removals.get(value)) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(added), Some(removed)) => added.compare(removed) != CausalOrder::LessThan,
        }
    }

    /// Iterate over members in order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.additions
            .keys()
            .filter(move |value| self.contains(value))
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Check if the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Elements whose latest known operation is an insert, with its clock.
    #[must_use]
    pub fn additions(&self) -> &BTreeMap<T, VectorClock<R>> {
        &self.additions
    }

    /// Elements whose latest known operation is a remove, with its clock.
    #[must_use]
    pub fn removals(&self) -> &BTreeMap<T, VectorClock<R>> {
        &self.removals
    }
}

impl<T: Ord + Clone, R: Ord + Clone> ORSet<T, R> {
    /// The members as an ordered set.
    #[must_use]
    pub fn value(&self) -> BTreeSet<T> {
        self.iter().cloned().collect()
    }

    /// The causal context of `value`'s latest known operation.
    ///
    /// Reads the join of its addition and removal clocks; an element never
    /// seen reads as the empty clock.
    #[must_use]
    pub fn clock_for(&self, value: &T) -> VectorClock<R> {
        match (self.additions.get(value), self.removals.get(value)) {
            (Some(added), Some(removed)) => added.merged(removed),
            (Some(clock), None) | (None, Some(clock)) => clock.clone(),
            (None, None) => VectorClock::new(),
        }
    }

    /// Insert `value` on behalf of `replica`.
    ///
    /// The new addition clock dominates everything this replica has seen
    /// for `value`, including a prior removal, so re-insertion works.
    pub fn insert(&mut self, value: T, replica: R) {
        let mut clock = self.clock_for(&value);
        clock.increase(replica);
        self.removals.remove(&value);
        self.additions.insert(value, clock);
    }

    /// Remove `value` on behalf of `replica`.
    ///
    /// Records a removal clock even for elements this replica has never
    /// seen added; such a removal is concurrent with any unseen add and
    /// therefore loses to it.
    pub fn remove(&mut self, value: T, replica: R) {
        let mut clock = self.clock_for(&value);
        clock.increase(replica);
        self.additions.remove(&value);
        self.removals.insert(value, clock);
    }

    /// Return a copy with `value` inserted by `replica`.
    #[must_use]
    pub fn inserted(&self, value: T, replica: R) -> Self {
        let mut next = self.clone();
        next.insert(value, replica);
        next
    }

    /// Return a copy with `value` removed by `replica`.
    #[must_use]
    pub fn removed(&self, value: T, replica: R) -> Self {
        let mut next = self.clone();
        next.remove(value, replica);
        next
    }
}

impl<T: Ord, R: Ord> Default for ORSet<T, R> {
    fn default() -> Self {
        Self::new()
    }
}

fn join_into<T, R>(target: &mut BTreeMap<T, VectorClock<R>>, source: &BTreeMap<T, VectorClock<R>>)
where
    T: Ord + Clone,
    R: Ord + Clone,
{
    for (value, clock) in source {
        match target.get_mut(value) {
            Some(existing) => existing.merge(clock),
            None => {
                target.insert(value.clone(), clock.clone());
            }
        }
    }
}

impl<T: Ord + Clone, R: Ord + Clone> Crdt for ORSet<T, R> {
    fn merge(&mut self, other: &Self) {
        join_into(&mut self.additions, &other.additions);
        join_into(&mut self.removals, &other.removals);

        // A removal that causally follows an addition has observed it.
        let evicted: Vec<T> = self
            .removals
            .iter()
            .filter(|(value, removed)| {
                self.additions
                    .get(*value)
                    .is_some_and(|added| removed.compare(added) == CausalOrder::GreaterThan)
            })
            .map(|(value, _)| value.clone())
            .collect();

        if !evicted.is_empty() {
            trace!(evicted = evicted.len(), "removals evicted observed additions");
        }
        for value in &evicted {
            self.additions.remove(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(entries: &[(&'static str, u64)]) -> VectorClock<&'static str> {
        entries.iter().copied().collect()
    }

    #[test]
    fn new_set_is_empty() {
        let s = ORSet::<String, &str>::new();
        assert!(s.is_empty());
        assert_eq!(s.len(), 0);
    }

    #[test]
    fn insert_and_contains() {
        let mut s = ORSet::new();
        s.insert("x", "a");
        assert!(s.contains(&"x"));
        assert_eq!(s.len(), 1);
        assert_eq!(s.additions()[&"x"], clock(&[("a", 1)]));
    }

    #[test]
    fn remove_moves_element_to_removals() {
        let mut s = ORSet::new();
        s.insert("x", "a");
        s.remove("x", "a");
        assert!(!s.contains(&"x"));
        assert!(!s.additions().contains_key(&"x"));
        assert_eq!(s.removals()[&"x"], clock(&[("a", 2)]));
    }

    #[test]
    fn readd_after_remove() {
        let mut s = ORSet::new();
        s.insert("B", "p");
        s.remove("B", "p");
        s.insert("B", "p");

        assert_eq!(s.additions()[&"B"], clock(&[("p", 3)]));
        assert!(!s.removals().contains_key(&"B"));
        assert_eq!(s.value(), BTreeSet::from(["B"]));
    }

    #[test]
    fn unseen_concurrent_remove_does_not_evict() {
        let p = ORSet::new().inserted("X", "p");
        let q = ORSet::new().removed("X", "q");

        let merged = p.merged(&q);
        assert_eq!(merged.value(), BTreeSet::from(["X"]));
        assert_eq!(q.merged(&p), merged);
    }

    #[test]
    fn observed_remove_evicts_on_merge() {
        let p = ORSet::new().inserted("X", "p");
        let mut q = p.clone();
        q.remove("X", "q");

        let merged = p.merged(&q);
        assert!(!merged.contains(&"X"));
        assert!(!merged.additions().contains_key(&"X"));
        assert_eq!(merged.removals()[&"X"], clock(&[("p", 1), ("q", 1)]));
    }

    #[test]
    fn concurrent_state_reinsert_dominates_both_clocks() {
        let base = ORSet::new().inserted("X", "p");
        let removed = base.removed("X", "q");
        let readded = base.inserted("X", "r");

        let mut merged = removed.merged(&readded);
        assert!(merged.contains(&"X"));
        assert_eq!(merged.clock_for(&"X"), clock(&[("p", 1), ("q", 1), ("r", 1)]));

        merged.remove("X", "p");
        assert_eq!(merged.removals()[&"X"], clock(&[("p", 2), ("q", 1), ("r", 1)]));
        assert!(!merged.merged(&readded).contains(&"X"));
    }

    #[test]
    fn merge_is_commutative() {
        let mut s1 = ORSet::new();
        s1.insert("x", "a");
        s1.insert("y", "a");
        s1.remove("x", "a");

        let mut s2 = ORSet::new();
        s2.insert("y", "b");
        s2.insert("z", "b");

        assert_eq!(s1.merged(&s2), s2.merged(&s1));
    }

    #[test]
    fn merge_is_idempotent() {
        let mut s1 = ORSet::new();
        s1.insert("x", "a");

        let mut s2 = ORSet::new();
        s2.insert("y", "b");
        s2.remove("x", "b");

        s1.merge(&s2);
        let after_first = s1.clone();
        s1.merge(&s2);

        assert_eq!(s1, after_first);
        assert_eq!(s1.merged(&s1), s1);
    }

    #[test]
    fn iterate_members() {
        let mut s = ORSet::new();
        s.insert(1, "a");
        s.insert(2, "a");
        s.insert(3, "a");
        s.remove(2, "a");

        let members: Vec<&i32> = s.iter().collect();
        assert_eq!(members, alloc::vec![&1, &3]);
    }
}
