//! Vector clocks for causality tracking.
//!
//! A vector clock is a grow-only counter read as logical time: each replica
//! bumps its own entry when it performs an event, and comparing two clocks
//! tells whether one state causally precedes the other or whether they are
//! concurrent.

use core::cmp::Ordering;

use crate::{Crdt, GCounter};

/// Causal relationship between two vector clocks, read left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CausalOrder {
    /// The left clock happened before the right one.
    LessThan,
    /// Both clocks describe the same causal history.
    Equal,
    /// The left clock happened after the right one.
    GreaterThan,
    /// Neither clock dominates the other.
    Concurrent,
}

/// A vector clock over replica ids of type `R`.
///
/// Absent replicas implicitly read as 0, so `{a: 0}` and `{}` are equal.
///
/// # Example
///
/// ```
/// use cvrdt::prelude::*;
///
/// let a = VectorClock::new().increased("r1");
/// let b = a.increased("r2");
/// assert_eq!(a.compare(&b), CausalOrder::LessThan);
///
/// let c = a.increased("r3");
/// assert_eq!(b.compare(&c), CausalOrder::Concurrent);
/// assert_eq!(b.merged(&c).compare(&c), CausalOrder::GreaterThan);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct VectorClock<R: Ord = alloc::string::String> {
    counter: GCounter<R>,
}

impl<R: Ord> VectorClock<R> {
    /// Create an empty clock (every replica at 0).
    #[must_use]
    pub fn new() -> Self {
        Self {
            counter: GCounter::new(),
        }
    }

    /// Advance `replica`'s logical time by one event.
    pub fn increase(&mut self, replica: R) {
        self.counter.increase(replica);
    }

    /// Logical time recorded for `replica` (0 if never seen).
    #[must_use]
    pub fn get(&self, replica: &R) -> u64 {
        self.counter.count_for(replica)
    }

    /// Returns true if no replica has recorded an event.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counter.iter().all(|(_, time)| time == 0)
    }

    /// Iterate over `(replica, time)` entries in replica order.
    pub fn iter(&self) -> impl Iterator<Item = (&R, u64)> {
        self.counter.iter()
    }

    /// The underlying grow-only counter.
    #[must_use]
    pub fn as_counter(&self) -> &GCounter<R> {
        &self.counter
    }

    /// Compare two clocks under the causal partial order.
    ///
    /// Walks the union of both replica sets with a running verdict that
    /// starts at [`CausalOrder::Equal`]. Once entries disagree in both
    /// directions the verdict is [`CausalOrder::Concurrent`] and the walk
    /// stops.
    #[must_use]
    pub fn compare(&self, other: &Self) -> CausalOrder {
        let mut verdict = CausalOrder::Equal;

        for replica in self.counter.replicas().chain(other.counter.replicas()) {
            verdict = match (verdict, self.get(replica).cmp(&other.get(replica))) {
                (_, Ordering::Equal) => verdict,
                (CausalOrder::Equal | CausalOrder::GreaterThan, Ordering::Greater) => {
                    CausalOrder::GreaterThan
                }
                (CausalOrder::Equal | CausalOrder::LessThan, Ordering::Less) => {
                    CausalOrder::LessThan
                }
                _ => return CausalOrder::Concurrent,
            };
        }

        verdict
    }
}

impl<R: Ord + Clone> VectorClock<R> {
    /// Return a copy of this clock advanced by one event at `replica`.
    #[must_use]
    pub fn increased(&self, replica: R) -> Self {
        Self {
            counter: self.counter.increased(replica),
        }
    }
}

impl<R: Ord> Default for VectorClock<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Ord + Clone> Crdt for VectorClock<R> {
    fn merge(&mut self, other: &Self) {
        self.counter.merge(&other.counter);
    }
}

impl<R: Ord> PartialEq for VectorClock<R> {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == CausalOrder::Equal
    }
}

impl<R: Ord> Eq for VectorClock<R> {}

impl<R: Ord> PartialOrd for VectorClock<R> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.compare(other) {
            CausalOrder::LessThan => Some(Ordering::Less),
            CausalOrder::Equal => Some(Ordering::Equal),
            CausalOrder::GreaterThan => Some(Ordering::Greater),
            CausalOrder::Concurrent => None,
        }
    }
}

impl<R: Ord> From<GCounter<R>> for VectorClock<R> {
    fn from(counter: GCounter<R>) -> Self {
        Self { counter }
    }
}

impl<R: Ord> FromIterator<(R, u64)> for VectorClock<R> {
    fn from_iter<I: IntoIterator<Item = (R, u64)>>(iter: I) -> Self {
        Self {
            counter: iter.into_iter().collect(),
        }
    }
}
