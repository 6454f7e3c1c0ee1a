use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

use crate::clock::{Clock, SystemClock};
use crate::error::ConfigurationError;
use crate::limiter::RateLimiter;
use crate::types::{Millis, RequestId};

/// Token bucket with background refill.
///
/// Same capacity and refill parameters as
/// [`TokenBucket`](crate::strategies::TokenBucket), but refill is driven by
/// a recurring background task that fires every `refill_interval_ms`
/// instead of being computed inside the admission call. The request path is
/// a single lock-free check-and-decrement on an atomic counter, so
/// admission latency is independent of refill cost, and a bucket that sat
/// dormant refills steadily rather than bursting at the first request.
///
/// The refill task is owned by the bucket: [`shutdown`](Self::shutdown)
/// stops it deterministically, and dropping the bucket aborts it as a
/// backstop. There are never blocked callers to unblock — a denied caller
/// got an immediate `false`.
///
/// # Concurrency
///
/// The task and the request path communicate only through the atomic
/// counter. Refill claims the elapsed span with a compare-and-swap on the
/// accounting instant (so delayed ticks catch up exactly once), then raises
/// the level clamped to capacity; decrements retry on a compare-and-swap
/// loop. Neither side can push the level below zero or above capacity.
///
/// # Example
///
/// ```rust,no_run
/// use admission_core::RateLimiter;
/// use admission_core::strategies::ScheduledTokenBucket;
///
/// # async fn demo() {
/// let bucket = ScheduledTokenBucket::new(5, 1, 1000).unwrap();
/// assert!(bucket.allow());
/// // ... tokens keep arriving every second whether or not anyone calls
/// bucket.shutdown();
/// # }
/// ```
pub struct ScheduledTokenBucket {
    shared: Arc<RefillState>,
    refill_task: JoinHandle<()>,
}

impl std::fmt::Debug for ScheduledTokenBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledTokenBucket")
            .field("capacity", &self.shared.capacity)
            .field("refill_amount", &self.shared.refill_amount)
            .field("refill_interval", &self.shared.refill_interval)
            .finish_non_exhaustive()
    }
}

/// State shared between the request path and the refill task.
struct RefillState {
    capacity: u32,
    refill_amount: u32,
    refill_interval: Millis,
    /// Current token level; the only channel between task and callers.
    available: AtomicU32,
    /// Instant of the last claimed refill span.
    last_refill: AtomicU64,
    clock: Arc<dyn Clock>,
}

impl RefillState {
    /// Credits whole elapsed refill intervals, clamped to capacity.
    ///
    /// The elapsed span is claimed by a compare-and-swap on `last_refill`
    /// first, so when two refills race only one credits the span.
    fn refill(&self) {
        let now = self.clock.now_millis();
        let last = self.last_refill.load(Ordering::Acquire);
        let elapsed = now.saturating_sub(last);
        if elapsed < self.refill_interval {
            return;
        }

        let intervals = elapsed / self.refill_interval;
        let credited = intervals.saturating_mul(self.refill_amount as u64);

        if self
            .last_refill
            .compare_exchange(last, now, Ordering::AcqRel, Ordering::Relaxed)
            .is_err()
        {
            // Another refill claimed this span.
            return;
        }

        self.available
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                Some(
                    (current as u64)
                        .saturating_add(credited)
                        .min(self.capacity as u64) as u32,
                )
            })
            .ok();
    }

    /// Lock-free check-and-decrement of one token.
    fn try_take(&self) -> bool {
        loop {
            let current = self.available.load(Ordering::Acquire);
            if current == 0 {
                return false;
            }
            if self
                .available
                .compare_exchange(current, current - 1, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return true;
            }
        }
    }
}

impl ScheduledTokenBucket {
    /// Creates a full bucket on the system clock and starts its refill task.
    ///
    /// Returns [`ConfigurationError`] if `capacity`, `refill_amount`, or
    /// `refill_interval_ms` is zero.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime, since the refill task is
    /// spawned onto the current runtime.
    pub fn new(
        capacity: u32,
        refill_amount: u32,
        refill_interval_ms: Millis,
    ) -> Result<Self, ConfigurationError> {
        Self::with_clock(capacity, refill_amount, refill_interval_ms, Arc::new(SystemClock))
    }

    /// Creates a full bucket reading time from `clock`.
    ///
    /// The refill cadence still comes from the runtime timer; `clock` only
    /// feeds the elapsed-time catch-up accounting.
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
        let shared = Arc::new(RefillState {
            capacity,
            refill_amount,
            refill_interval: refill_interval_ms,
            available: AtomicU32::new(capacity), // bucket starts full
            last_refill: AtomicU64::new(now),
            clock,
        });

        let task_state = Arc::clone(&shared);
        let refill_task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_millis(refill_interval_ms));
            // A stalled runtime catches up via the elapsed-time claim, not
            // by replaying missed ticks back to back.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                // The first tick completes immediately, before any time has
                // elapsed; refill() sees elapsed 0 and credits nothing.
                ticker.tick().await;
                task_state.refill();
                trace!(
                    available = task_state.available.load(Ordering::Relaxed),
                    "refill tick"
                );
            }
        });
        debug!(
            capacity,
            refill_amount, refill_interval_ms, "scheduled token bucket started"
        );

        Ok(ScheduledTokenBucket {
            shared,
            refill_task,
        })
    }

    /// Tokens currently available. Plain atomic load; the background task
    /// owns all refill accounting.
    pub fn available_tokens(&self) -> u32 {
        self.shared.available.load(Ordering::Acquire)
    }

    /// Stops the refill task. No refill begins after this returns; the
    /// counter keeps serving (and denying) callers, it just stops growing.
    pub fn shutdown(&self) {
        self.refill_task.abort();
        debug!("scheduled token bucket refill task stopped");
    }

    /// Whether the refill task is still alive. Reports `false` once
    /// [`shutdown`](Self::shutdown) has taken effect, and also if the task
    /// itself died — the owner of the limiter's lifecycle can watch this
    /// instead of losing refills silently.
    pub fn is_running(&self) -> bool {
        !self.refill_task.is_finished()
    }
}

impl RateLimiter for ScheduledTokenBucket {
    fn allow_request(&self, _id: Option<RequestId>) -> bool {
        self.shared.try_take()
    }
}

impl Drop for ScheduledTokenBucket {
    fn drop(&mut self) {
        self.refill_task.abort();
    }
}
