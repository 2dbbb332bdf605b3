use crate::{Crdt, GCounter};

/// A positive-negative counter (PN-Counter).
///
/// Supports both increment and decrement operations by maintaining two
/// internal G-Counters: one for increments and one for decrements.
/// The value is `increments - decrements` and may be negative.
///
/// # Example
///
/// ```
/// use cvrdt::prelude::*;
///
/// let mut c1 = PNCounter::new();
/// c1.increase("node-1");
/// c1.increase("node-1");
/// c1.decrease("node-1");
/// assert_eq!(c1.value(), 1);
///
/// let mut c2 = PNCounter::new();
/// c2.decrease("node-2");
///
/// c1.merge(&c2);
/// assert_eq!(c1.value(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PNCounter<R: Ord = alloc::string::String> {
    increments: GCounter<R>,
    decrements: GCounter<R>,
}

impl<R: Ord> PNCounter<R> {
    /// Create a new PN-Counter with value 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            increments: GCounter::new(),
            decrements: GCounter::new(),
        }
    }

    /// Increment the counter by 1 on behalf of `replica`.
    pub fn increase(&mut self, replica: R) {
        self.increments.increase(replica);
    }

    /// Decrement the counter by 1 on behalf of `replica`.
    pub fn decrease(&mut self, replica: R) {
        self.decrements.increase(replica);
    }

    /// Get the current counter value (increments - decrements).
    #[must_use]
    pub fn value(&self) -> i64 {
        (self.increments.value() as i64).wrapping_sub(self.decrements.value() as i64)
    }

    /// The grow-only counter of increments.
    #[must_use]
    pub fn increments(&self) -> &GCounter<R> {
        &self.increments
    }

    /// The grow-only counter of decrements.
    #[must_use]
    pub fn decrements(&self) -> &GCounter<R> {
        &self.decrements
    }
}

impl<R: Ord + Clone> PNCounter<R> {
    /// Return a copy with one more increment from `replica`.
    #[must_use]
    pub fn increased(&self, replica: R) -> Self {
        let mut next = self.clone();
        next.increase(replica);
        next
    }

    /// Return a copy with one more decrement from `replica`.
    #[must_use]
    pub fn decreased(&self, replica: R) -> Self {
        let mut next = self.clone();
        next.decrease(replica);
        next
    }
}

impl<R: Ord> Default for PNCounter<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Ord + Clone> Crdt for PNCounter<R> {
    fn merge(&mut self, other: &Self) {
        self.increments.merge(&other.increments);
        self.decrements.merge(&other.decrements);
    }
}
