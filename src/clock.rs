//! Wall-clock sources for [`LWWRegister`](crate::LWWRegister) timestamps.
//!
//! Registers never read the system time on their own. Every constructor or
//! write that needs a timestamp takes a [`ClockSource`], so tests and
//! simulations can drive time deterministically.
//!
//! # Example
//!
//! ```
//! use cvrdt::clock::{ClockSource, ManualClock};
//!
//! let clock = ManualClock::new(1_000);
//! assert_eq!(clock.now_millis(), 1_000);
//!
//! clock.advance(250);
//! assert_eq!(clock.now_millis(), 1_250);
//!
//! // Plain closures work too.
//! let fixed = || 42u64;
//! assert_eq!(fixed.now_millis(), 42);
//! ```

use core::sync::atomic::{AtomicU64, Ordering};

/// A source of millisecond timestamps.
///
/// Implementations should be monotonic enough for last-writer-wins
/// resolution; the registers do not correct for clocks that run backwards.
pub trait ClockSource {
    /// Current time in milliseconds.
    fn now_millis(&self) -> u64;
}

impl<F> ClockSource for F
where
    F: Fn() -> u64,
{
    fn now_millis(&self) -> u64 {
        self()
    }
}

/// Milliseconds since the Unix epoch from [`std::time::SystemTime`].
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl ClockSource for SystemClock {
    fn now_millis(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicU64,
}

impl ManualClock {
    /// Create a clock reading `millis`.
    #[must_use]
    pub fn new(millis: u64) -> Self {
        Self {
            millis: AtomicU64::new(millis),
        }
    }

    /// Jump to an absolute time.
    pub fn set(&self, millis: u64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    /// Move forward by `millis` and return the new reading.
    ///
    /// Saturates at `u64::MAX` rather than wrapping.
    pub fn advance(&self, millis: u64) -> u64 {
        let previous = self
            .millis
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |now| {
                Some(now.saturating_add(millis))
            })
            .unwrap_or_else(|now| now);
        previous.saturating_add(millis)
    }
}

impl ClockSource for ManualClock {
    fn now_millis(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }
}
