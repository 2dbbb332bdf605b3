use alloc::string::String;
use core::cmp::Ordering;

use tracing::trace;

use crate::clock::ClockSource;
use crate::Crdt;

/// A last-writer-wins register (LWW-Register).
///
/// Holds a single value stamped with the millisecond time of its write and
/// the id of the writing replica. Writes are ordered by the triple
/// `(timestamp, replica, value)`: the later timestamp wins, equal timestamps
/// fall back to the larger replica id, and two writes by the same replica in
/// the same millisecond keep the larger value. The order is total, so merge
/// is commutative.
///
/// # Example
///
/// ```
/// use cvrdt::clock::ManualClock;
/// use cvrdt::prelude::*;
///
/// let clock = ManualClock::new(100);
/// let mut r1 = LWWRegister::new("node-1", "hello", &clock);
///
/// clock.advance(1);
/// let r2 = LWWRegister::new("node-2", "world", &clock);
///
/// // The register with the later timestamp wins
/// r1.merge(&r2);
/// assert_eq!(*r1.value(), "world");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LWWRegister<T, R: Ord = String> {
    value: T,
    timestamp: u64,
    replica: R,
}

impl<T, R: Ord> LWWRegister<T, R> {
    /// Create a register written by `replica`, stamped with the clock's
    /// current time.
    pub fn new<C: ClockSource + ?Sized>(replica: R, value: T, clock: &C) -> Self {
        Self::with_timestamp(replica, value, clock.now_millis())
    }

    /// Create a register with an explicit timestamp.
    ///
    /// Useful for replay or when the timestamp was captured elsewhere.
    pub fn with_timestamp(replica: R, value: T, timestamp: u64) -> Self {
        Self {
            value,
            timestamp,
            replica,
        }
    }

    /// Get the current value.
    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Consume the register and return its value.
    #[must_use]
    pub fn into_value(self) -> T {
        self.value
    }

    /// Timestamp of the winning write, in milliseconds.
    #[must_use]
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Replica that performed the winning write.
    #[must_use]
    pub fn replica(&self) -> &R {
        &self.replica
    }
}

impl<T: Ord, R: Ord> LWWRegister<T, R> {
    /// Adopt `incoming` if it orders strictly after the current write.
    ///
    /// Returns `true` if the register changed.
    pub fn set(&mut self, incoming: Self) -> bool {
        if incoming.wins_over(self) {
            *self = incoming;
            true
        } else {
            false
        }
    }

    /// Write `value` locally on behalf of `replica`.
    ///
    /// Equivalent to `set(LWWRegister::new(replica, value, clock))`. A write
    /// that does not order after the current one is dropped.
    pub fn write<C: ClockSource + ?Sized>(&mut self, replica: R, value: T, clock: &C) -> bool {
        self.set(Self::new(replica, value, clock))
    }

    fn wins_over(&self, current: &Self) -> bool {
        match self.timestamp.cmp(&current.timestamp) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => match self.replica.cmp(&current.replica) {
                Ordering::Equal => self.value > current.value,
                order => {
                    trace!(timestamp = self.timestamp, "lww tie broken by replica id");
                    order == Ordering::Greater
                }
            },
        }
    }
}

impl<T: Ord + Clone, R: Ord + Clone> Crdt for LWWRegister<T, R> {
    fn merge(&mut self, other: &Self) {
        if other.wins_over(self) {
            self.value = other.value.clone();
            self.timestamp = other.timestamp;
            self.replica = other.replica.clone();
        }
    }
}
