use std::sync::Arc;

use parking_lot::Mutex;

use crate::clock::{Clock, SystemClock};
use crate::error::ConfigurationError;
use crate::limiter::RateLimiter;
use crate::types::{Millis, RequestId};

/// Leaky bucket.
///
/// Models a queue draining at a constant rate: each admission fills the
/// bucket by one, and `leak_rate` requests drain out per
/// `leak_interval_ms`. A request is admitted only while the bucket has
/// spare room. Where a token bucket consumes a pre-existing allowance and
/// so permits bursts, the leaky bucket caps how much un-drained work can
/// be outstanding, smoothing traffic to the leak rate.
///
/// # Algorithm Behavior
///
/// - The bucket starts empty
/// - Before each decision, whole elapsed leak intervals are drained at
///   `leak_rate` per interval, clamped at zero
/// - Leaking is quantized to whole intervals: until a full interval has
///   elapsed, neither the level nor the leak instant moves. This
///   discretization is deliberate — sub-interval time is never leaked
/// - A clock reading that goes backwards drains nothing
/// - Admit iff `level < capacity`, then the level rises by one
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use admission_core::{ManualClock, RateLimiter};
/// use admission_core::strategies::LeakyBucket;
///
/// let clock = Arc::new(ManualClock::new(0));
/// let bucket = LeakyBucket::with_clock(2, 1, 1000, clock.clone()).unwrap();
///
/// assert!(bucket.allow());
/// assert!(bucket.allow());
/// assert!(!bucket.allow()); // full
///
/// clock.advance(1000);      // one request drains
/// assert!(bucket.allow());
/// ```
pub struct LeakyBucket {
    /// Maximum number of outstanding requests the bucket can hold.
    capacity: u32,
    /// Requests drained per elapsed leak interval.
    leak_rate: u32,
    /// Milliseconds between leak events.
    leak_interval: Millis,
    clock: Arc<dyn Clock>,
    /// Level and leak instant, mutated together under one lock.
    state: Mutex<LeakyBucketState>,
}

impl std::fmt::Debug for LeakyBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeakyBucket")
            .field("capacity", &self.capacity)
            .field("leak_rate", &self.leak_rate)
            .field("leak_interval", &self.leak_interval)
            .finish_non_exhaustive()
    }
}

struct LeakyBucketState {
    /// Current number of outstanding requests ("water level").
    level: u32,
    /// Instant of the last whole-interval leak.
    last_leak: Millis,
}

impl LeakyBucket {
    /// Creates an empty bucket on the system clock.
    ///
    /// Returns [`ConfigurationError`] if `capacity`, `leak_rate`, or
    /// `leak_interval_ms` is zero.
    pub fn new(
        capacity: u32,
        leak_rate: u32,
        leak_interval_ms: Millis,
    ) -> Result<Self, ConfigurationError> {
        Self::with_clock(capacity, leak_rate, leak_interval_ms, Arc::new(SystemClock))
    }

    /// Creates an empty bucket reading time from `clock`.
    pub fn with_clock(
        capacity: u32,
        leak_rate: u32,
        leak_interval_ms: Millis,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigurationError> {
        if capacity == 0 {
            return Err(ConfigurationError::ZeroCapacity);
        }
        if leak_rate == 0 {
            return Err(ConfigurationError::ZeroRate);
        }
        if leak_interval_ms == 0 {
            return Err(ConfigurationError::ZeroInterval);
        }

        let now = clock.now_millis();
        Ok(LeakyBucket {
            capacity,
            leak_rate,
            leak_interval: leak_interval_ms,
            clock,
            state: Mutex::new(LeakyBucketState {
                level: 0, // bucket starts empty
                last_leak: now,
            }),
        })
    }

    /// Room left in the bucket (`capacity - level`), after draining
    /// elapsed leaks.
    pub fn available_space(&self) -> u32 {
        let mut state = self.state.lock();
        self.leak(&mut state);
        self.capacity - state.level
    }

    /// Drains whole elapsed leak intervals, clamped at zero.
    fn leak(&self, state: &mut LeakyBucketState) {
        let now = self.clock.now_millis();
        // A backdated clock reads as zero elapsed time.
        let elapsed = now.saturating_sub(state.last_leak);
        if elapsed < self.leak_interval {
            // Sub-interval time is not leaked and the instant stays put.
            return;
        }

        let intervals = elapsed / self.leak_interval;
        let drained = intervals.saturating_mul(self.leak_rate as u64);
        state.level = (state.level as u64).saturating_sub(drained) as u32;
        state.last_leak = now;
    }
}

impl RateLimiter for LeakyBucket {
    fn allow_request(&self, _id: Option<RequestId>) -> bool {
        let mut state = self.state.lock();
        self.leak(&mut state);

        if state.level < self.capacity {
            state.level += 1;
            true
        } else {
            false
        }
    }
}
