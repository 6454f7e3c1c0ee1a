use std::sync::Arc;

use parking_lot::Mutex;

use crate::clock::{Clock, SystemClock};
use crate::error::ConfigurationError;
use crate::limiter::RateLimiter;
use crate::types::{Millis, RequestId};

/// Token bucket with lazy refill.
///
/// The bucket holds up to `capacity` tokens and starts full. Each admitted
/// request consumes one token; tokens are restored at `refill_amount` per
/// `refill_interval_ms`. Refill is computed lazily inside the admission
/// call from the time elapsed since the last accounting, so an idle bucket
/// costs nothing. Unused tokens accumulate up to capacity, which is what
/// lets this strategy absorb bursts.
///
/// # Algorithm Behavior
///
/// - The bucket starts full with `capacity` tokens
/// - On every call, whole elapsed refill intervals are credited first,
///   clamped to capacity
/// - After a refill the accounting instant jumps to `now`, not to the last
///   interval boundary: a dormant bucket catches up in one step and the
///   partial interval in progress is forfeited. This is the chosen
///   semantics, not an approximation of interval replay.
/// - A clock reading that goes backwards credits nothing and is otherwise
///   ignored
/// - The refill and the check-and-decrement happen in one critical
///   section, so no two callers can observe the same pre-decrement count
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use admission_core::{ManualClock, RateLimiter};
/// use admission_core::strategies::TokenBucket;
///
/// let clock = Arc::new(ManualClock::new(0));
/// let bucket = TokenBucket::with_clock(2, 1, 1000, clock.clone()).unwrap();
///
/// assert!(bucket.allow());
/// assert!(bucket.allow());
/// assert!(!bucket.allow()); // drained, no time has passed
///
/// clock.advance(1000);      // one refill interval
/// assert!(bucket.allow());
/// ```
pub struct TokenBucket {
    /// Maximum number of tokens the bucket can hold.
    capacity: u32,
    /// Tokens credited per elapsed refill interval.
    refill_amount: u32,
    /// Milliseconds between refill events.
    refill_interval: Millis,
    clock: Arc<dyn Clock>,
    /// Level and accounting instant, mutated together under one lock.
    state: Mutex<TokenBucketState>,
}

impl std::fmt::Debug for TokenBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenBucket")
            .field("capacity", &self.capacity)
            .field("refill_amount", &self.refill_amount)
            .field("refill_interval", &self.refill_interval)
            .finish_non_exhaustive()
    }
}

struct TokenBucketState {
    /// Current number of tokens available.
    available: u32,
    /// Instant of the last refill accounting.
    last_refill: Millis,
}

impl TokenBucket {
    /// Creates a full bucket on the system clock.
    ///
    /// Returns [`ConfigurationError`] if `capacity`, `refill_amount`, or
    /// `refill_interval_ms` is zero.
    pub fn new(
        capacity: u32,
        refill_amount: u32,
        refill_interval_ms: Millis,
    ) -> Result<Self, ConfigurationError> {
        Self::with_clock(capacity, refill_amount, refill_interval_ms, Arc::new(SystemClock))
    }

    /// Creates a full bucket reading time from `clock`.
    pub fn with_clock(
        capacity: u32,
        refill_amount: u32,
        refill_interval_ms: Millis,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigurationError> {
        if capacity == 0 {
            return Err(ConfigurationError::ZeroCapacity);
        }
        if refill_amount == 0 {
            return Err(ConfigurationError::ZeroRate);
        }
        if refill_interval_ms == 0 {
            return Err(ConfigurationError::ZeroInterval);
        }

        let now = clock.now_millis();
        Ok(TokenBucket {
            capacity,
            refill_amount,
            refill_interval: refill_interval_ms,
            clock,
            state: Mutex::new(TokenBucketState {
                available: capacity, // bucket starts full
                last_refill: now,
            }),
        })
    }

    /// Tokens currently available, after crediting elapsed refills.
    pub fn available_tokens(&self) -> u32 {
        let mut state = self.state.lock();
        self.refill(&mut state);
        state.available
    }

    /// Credits whole elapsed refill intervals, clamped to capacity.
    fn refill(&self, state: &mut TokenBucketState) {
        let now = self.clock.now_millis();
        // A backdated clock reads as zero elapsed time.
        let elapsed = now.saturating_sub(state.last_refill);
        if elapsed < self.refill_interval {
            return;
        }

        let intervals = elapsed / self.refill_interval;
        let credited = intervals.saturating_mul(self.refill_amount as u64);
        state.available = (state.available as u64)
            .saturating_add(credited)
            .min(self.capacity as u64) as u32;
        // Catch up to now; the partial interval in progress is forfeited.
        state.last_refill = now;
    }
}

impl RateLimiter for TokenBucket {
    fn allow_request(&self, _id: Option<RequestId>) -> bool {
        let mut state = self.state.lock();
        self.refill(&mut state);

        if state.available > 0 {
            state.available -= 1;
            true
        } else {
            false
        }
    }
}
