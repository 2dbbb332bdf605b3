use alloc::collections::{btree_set, BTreeSet};

use crate::Crdt;

/// A grow-only set (G-Set).
///
/// The state is the set itself and the join is set union, so membership
/// only ever grows: once any replica has seen an element, every replica
/// that merges with it will too. There is no remove; use [`TwoPSet`] or
/// [`ORSet`] when elements must go away.
///
/// [`TwoPSet`]: crate::TwoPSet
/// [`ORSet`]: crate::ORSet
///
/// # Example
///
/// ```
/// use cvrdt::prelude::*;
///
/// // message ids each inbox has seen
/// let mut inbox_a: GSet<u64> = [101, 102].into_iter().collect();
/// let inbox_b: GSet<u64> = [102, 103].into_iter().collect();
///
/// inbox_a.merge(&inbox_b);
/// assert_eq!(inbox_a.iter().copied().collect::<Vec<_>>(), [101, 102, 103]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GSet<T: Ord> {
    elements: BTreeSet<T>,
}

impl<T: Ord> GSet<T> {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            elements: BTreeSet::new(),
        }
    }

    /// Add `value`. Returns `false` if it was already a member.
    pub fn insert(&mut self, value: T) -> bool {
        self.elements.insert(value)
    }

    /// Whether any replica merged so far has added `value`.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.elements.contains(value)
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// `true` until the first insert.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Members in ascending order.
    pub fn iter(&self) -> btree_set::Iter<'_, T> {
        self.elements.iter()
    }

    /// Borrow the member set.
    #[must_use]
    pub fn value(&self) -> &BTreeSet<T> {
        &self.elements
    }
}

impl<T: Ord + Clone> GSet<T> {
    /// Pure counterpart of [`GSet::insert`].
    #[must_use]
    pub fn inserted(&self, value: T) -> Self {
        let mut next = self.clone();
        next.elements.insert(value);
        next
    }
}

impl<T: Ord> Default for GSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Clone> Crdt for GSet<T> {
    fn merge(&mut self, other: &Self) {
        self.elements.extend(other.elements.iter().cloned());
    }
}

impl<T: Ord> Extend<T> for GSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.elements.extend(iter);
    }
}

impl<T: Ord> FromIterator<T> for GSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl<T: Ord> IntoIterator for GSet<T> {
    type Item = T;
    type IntoIter = btree_set::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a, T: Ord> IntoIterator for &'a GSet<T> {
    type Item = &'a T;
    type IntoIter = btree_set::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn duplicate_insert_reports_false() {
        let mut seen = GSet::new();
        assert!(seen.insert("m1"));
        assert!(!seen.insert("m1"));
        assert_eq!(seen.len(), 1);
        assert!(!seen.contains(&"m2"));
    }

    #[test]
    fn collecting_drops_duplicates() {
        let ids: GSet<u8> = [3, 1, 3, 2, 1].into_iter().collect();
        assert_eq!(ids.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
    }

    #[test]
    fn inserted_leaves_source_alone() {
        let empty = GSet::<u8>::default();
        let one = empty.inserted(9);
        assert!(empty.is_empty());
        assert!(one.contains(&9));
    }

    #[test]
    fn merge_never_shrinks_either_side() {
        let left: GSet<u32> = (0..5).collect();
        let right: GSet<u32> = (3..8).collect();

        let joined = left.merged(&right);
        assert!(left.value().is_subset(joined.value()));
        assert!(right.value().is_subset(joined.value()));
        assert_eq!(joined.len(), 8);
    }

    #[test]
    fn folding_replicas_in_any_order_gives_the_union() {
        let replicas: Vec<GSet<u32>> = (0..4u32)
            .map(|r| [r, r * 10].into_iter().collect())
            .collect();

        let forward = replicas.iter().fold(GSet::<u32>::new(), |acc, s| acc.merged(s));
        let backward = replicas.iter().rev().fold(GSet::<u32>::new(), |acc, s| acc.merged(s));

        assert_eq!(forward, backward);
        assert_eq!(forward.len(), 7); // 0 appears twice
    }

    #[test]
    fn merging_a_subset_is_a_no_op() {
        let mut full: GSet<char> = "abc".chars().collect();
        let before = full.clone();
        full.merge(&"ca".chars().collect());
        assert_eq!(full, before);
    }

    #[test]
    fn extend_and_borrowed_iteration() {
        let mut tags = GSet::new();
        tags.extend(["b", "a"]);
        let listed: Vec<&&str> = (&tags).into_iter().collect();
        assert_eq!(listed, [&"a", &"b"]);
    }
}
