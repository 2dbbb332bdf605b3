use alloc::collections::BTreeMap;

use crate::Crdt;

/// A grow-only counter (G-Counter).
///
/// Each replica owns one entry of the counter and only ever increases it.
/// The total value is the sum of all entries. Merge takes the pointwise
/// maximum, so it is a join on a per-replica max-semilattice.
///
/// The replica id is passed to every mutation rather than stored, so one
/// snapshot type serves every replica.
///
/// # Example
///
/// ```
/// use cvrdt::prelude::*;
///
/// let mut c1 = GCounter::new();
/// c1.increase("node-1");
/// c1.increase("node-1");
///
/// let mut c2 = GCounter::new();
/// c2.increase("node-2");
///
/// c1.merge(&c2);
/// assert_eq!(c1.value(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GCounter<R: Ord = alloc::string::String> {
    counts: BTreeMap<R, u64>,
}

impl<R: Ord> GCounter<R> {
    /// Create an empty G-Counter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }

    /// Increment `replica`'s count by 1.
    pub fn increase(&mut self, replica: R) {
        self.increase_by(replica, 1);
    }

    /// Increment `replica`'s count by `n`.
    pub fn increase_by(&mut self, replica: R, n: u64) {
        let count = self.counts.entry(replica).or_insert(0);
        *count = count.saturating_add(n);
    }

    /// Get the total counter value across all replicas.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.counts.values().fold(0u64, |total, &n| total.saturating_add(n))
    }

    /// Get the count for a specific replica. Absent replicas read as 0.
    #[must_use]
    pub fn count_for(&self, replica: &R) -> u64 {
        self.counts.get(replica).copied().unwrap_or(0)
    }

    /// Iterate over `(replica, count)` entries in replica order.
    pub fn iter(&self) -> impl Iterator<Item = (&R, u64)> {
        self.counts.iter().map(|(replica, &count)| (replica, count))
    }

    /// Iterate over the replicas that have an entry.
    pub fn replicas(&self) -> impl Iterator<Item = &R> {
        self.counts.keys()
    }

    /// Returns true if no replica has incremented yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl<R: Ord + Clone> GCounter<R> {
    /// Return a copy of this counter with `replica`'s count incremented.
    #[must_use]
    pub fn increased(&self, replica: R) -> Self {
        let mut next = self.clone();
        next.increase(replica);
        next
    }
}

impl<R: Ord> Default for GCounter<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Ord + Clone> Crdt for GCounter<R> {
    fn merge(&mut self, other: &Self) {
        for (replica, &count) in &other.counts {
            let entry = self.counts.entry(replica.clone()).or_insert(0);
            *entry = (*entry).max(count);
        }
    }
}

impl<R: Ord> FromIterator<(R, u64)> for GCounter<R> {
    /// Build a counter from explicit entries. Repeated replicas keep the
    /// largest count.
    fn from_iter<I: IntoIterator<Item = (R, u64)>>(iter: I) -> Self {
        let mut counts = BTreeMap::new();
        for (replica, count) in iter {
            let entry = counts.entry(replica).or_insert(0);
            *entry = count.max(*entry);
        }
        Self { counts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_counter_is_zero() {
        let c = GCounter::<&str>::new();
        assert_eq!(c.value(), 0);
        assert!(c.is_empty());
    }

    #[test]
    fn increase_increments_value() {
        let mut c = GCounter::new();
        c.increase("a");
        assert_eq!(c.value(), 1);
        c.increase("a");
        assert_eq!(c.value(), 2);
    }

    #[test]
    fn increase_by() {
        let mut c = GCounter::new();
        c.increase_by("a", 5);
        assert_eq!(c.value(), 5);
    }

    #[test]
    fn increased_leaves_original_untouched() {
        let c = GCounter::new().increased("a");
        let next = c.increased("a");
        assert_eq!(c.count_for(&"a"), 1);
        assert_eq!(next.count_for(&"a"), 2);
    }

    #[test]
    fn merge_takes_max() {
        let mut c1 = GCounter::new();
        c1.increase("a");
        c1.increase("a");

        let mut c2 = GCounter::new();
        c2.increase("a");

        // c1 has a=2, c2 has a=1, merge should keep a=2
        c1.merge(&c2);
        assert_eq!(c1.value(), 2);
    }

    #[test]
    fn merge_different_replicas() {
        let mut c1 = GCounter::new();
        c1.increase("r1");
        c1.increase("r1");

        let mut c2 = GCounter::new();
        c2.increase("r2");

        let merged = c1.merged(&c2);
        assert_eq!(merged.value(), 3);
        assert_eq!(
            merged.iter().collect::<alloc::vec::Vec<_>>(),
            alloc::vec![(&"r1", 2), (&"r2", 1)]
        );
    }

    #[test]
    fn merge_is_commutative() {
        let mut c1 = GCounter::new();
        c1.increase("a");

        let mut c2 = GCounter::new();
        c2.increase("b");
        c2.increase("b");

        assert_eq!(c1.merged(&c2), c2.merged(&c1));
    }

    #[test]
    fn merge_is_idempotent() {
        let mut c1 = GCounter::new();
        c1.increase("a");

        let mut c2 = GCounter::new();
        c2.increase("b");

        c1.merge(&c2);
        let after_first = c1.clone();
        c1.merge(&c2);

        assert_eq!(c1, after_first);
        assert_eq!(c1.merged(&c1), c1);
    }

    #[test]
    fn count_for_absent_replica_is_zero() {
        let mut c = GCounter::new();
        c.increase("a");
        c.increase("a");
        assert_eq!(c.count_for(&"a"), 2);
        assert_eq!(c.count_for(&"b"), 0);
    }

    #[test]
    fn from_iter_keeps_largest_entry() {
        let c: GCounter<&str> = [("a", 2), ("b", 1), ("a", 1)].into_iter().collect();
        assert_eq!(c.count_for(&"a"), 2);
        assert_eq!(c.value(), 3);
    }
}
