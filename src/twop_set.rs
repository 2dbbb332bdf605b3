use alloc::collections::BTreeSet;

use crate::{Crdt, GSet};

/// A two-phase set (2P-Set).
///
/// Built from two G-Sets: one for additions and one for removals
/// (tombstones). An element is a member while it is in `additions` and not
/// in `removals`. Removal is permanent: once tombstoned, an element can
/// never be reinstated, on this replica or any other. Use
/// [`ORSet`](crate::ORSet) when elements must come back.
///
/// # Example
///
/// ```
/// use cvrdt::prelude::*;
///
/// let mut s1 = TwoPSet::new();
/// s1.insert("apple");
/// s1.insert("banana");
/// s1.remove("banana");
///
/// assert!(s1.contains(&"apple"));
/// assert!(!s1.contains(&"banana")); // removed
///
/// let mut s2 = TwoPSet::new();
/// s2.insert("banana"); // trying to re-add on another replica
///
/// s1.merge(&s2);
/// assert!(!s1.contains(&"banana")); // still removed (tombstone wins)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TwoPSet<T: Ord> {
    additions: GSet<T>,
    removals: GSet<T>,
}

impl<T: Ord> TwoPSet<T> {
    /// Create a new empty 2P-Set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            additions: GSet::new(),
            removals: GSet::new(),
        }
    }

    /// Record an addition of `value`.
    ///
    /// Has no visible effect if `value` was ever removed.
    pub fn insert(&mut self, value: T) {
        self.additions.insert(value);
    }

    /// Tombstone `value`.
    ///
    /// The tombstone is recorded whether or not the element is currently a
    /// member, so a removal can arrive ahead of the addition it cancels.
    pub fn remove(&mut self, value: T) {
        self.removals.insert(value);
    }

    /// Check if `value` was added and never removed.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.additions.contains(value) && !self.removals.contains(value)
    }

    /// Iterate over live elements in order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.additions
            .iter()
            .filter(move |value| !self.removals.contains(value))
    }

    /// Number of live elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Check if the set has no live elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Every element ever added.
    #[must_use]
    pub fn additions(&self) -> &GSet<T> {
        &self.additions
    }

    /// Every element ever removed.
    #[must_use]
    pub fn removals(&self) -> &GSet<T> {
        &self.removals
    }
}

impl<T: Ord + Clone> TwoPSet<T> {
    /// The live elements: `additions - removals`.
    #[must_use]
    pub fn value(&self) -> BTreeSet<T> {
        self.additions
            .value()
            .difference(self.removals.value())
            .cloned()
            .collect()
    }

    /// Return a copy with `value` added.
    #[must_use]
    pub fn inserted(&self, value: T) -> Self {
        let mut next = self.clone();
        next.insert(value);
        next
    }

    /// Return a copy with `value` tombstoned.
    #[must_use]
    pub fn removed(&self, value: T) -> Self {
        let mut next = self.clone();
        next.remove(value);
        next
    }
}

impl<T: Ord> Default for TwoPSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Clone> Crdt for TwoPSet<T> {
    fn merge(&mut self, other: &Self) {
        self.additions.merge(&other.additions);
        self.removals.merge(&other.removals);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_set_is_empty() {
        let s = TwoPSet::<alloc::string::String>::new();
        assert!(s.is_empty());
        assert!(s.value().is_empty());
    }

    #[test]
    fn insert_and_contains() {
        let mut s = TwoPSet::new();
        s.insert("a");
        assert!(s.contains(&"a"));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn remove_element() {
        let mut s = TwoPSet::new();
        s.insert("a");
        s.remove("a");
        assert!(!s.contains(&"a"));
        assert_eq!(s.len(), 0);
    }

    #[test]
    fn cannot_readd_removed_element() {
        let mut s = TwoPSet::new();
        s.insert("Y");
        s.remove("Y");
        s.insert("Y");
        assert!(!s.contains(&"Y"));
        assert!(!s.value().contains(&"Y"));
    }

    #[test]
    fn remove_before_add_still_tombstones() {
        let mut s = TwoPSet::new();
        s.remove("ghost");
        assert!(s.removals().contains(&"ghost"));

        s.insert("ghost");
        assert!(!s.contains(&"ghost"));
    }

    #[test]
    fn remove_wins_on_merge() {
        let s1 = TwoPSet::new().inserted("a").removed("a");
        let s2 = TwoPSet::new().inserted("a"); // concurrent add

        assert!(!s1.merged(&s2).contains(&"a"));
    }

    #[test]
    fn merge_is_commutative() {
        let mut s1 = TwoPSet::new();
        s1.insert("a");
        s1.insert("b");
        s1.remove("a");

        let mut s2 = TwoPSet::new();
        s2.insert("b");
        s2.insert("c");

        assert_eq!(s1.merged(&s2), s2.merged(&s1));
    }

    #[test]
    fn merge_is_idempotent() {
        let mut s1 = TwoPSet::new();
        s1.insert("a");

        let mut s2 = TwoPSet::new();
        s2.insert("b");

        s1.merge(&s2);
        let after_first = s1.clone();
        s1.merge(&s2);

        assert_eq!(s1, after_first);
    }

    #[test]
    fn iterate_live_elements() {
        let mut s = TwoPSet::new();
        s.insert(1);
        s.insert(2);
        s.insert(3);
        s.remove(2);

        let live: alloc::vec::Vec<&i32> = s.iter().collect();
        assert_eq!(live, alloc::vec![&1, &3]);
    }
}
