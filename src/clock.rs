//! Time sources for admission accounting.
//!
//! Every strategy reads the current time through the [`Clock`] trait instead
//! of calling into the OS directly, so the temporal invariants (refill,
//! leak, window roll) can be exercised in tests with a controlled clock.
//!
//! Production limiters use [`SystemClock`]; tests use [`ManualClock`] and
//! advance it explicitly. A reading that goes backwards is tolerated
//! everywhere: strategies clamp elapsed time to zero rather than erroring.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::Millis;

/// Source of wall-clock readings in milliseconds.
///
/// Implementations are expected to be cheap to call and
/// monotonic-enough: strategies tolerate regressions by treating a
/// backwards reading as zero elapsed time.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds.
    fn now_millis(&self) -> Millis;
}

/// Wall clock: milliseconds since the Unix epoch.
///
/// A system clock set before the epoch reads as 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> Millis {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as Millis)
            .unwrap_or(0)
    }
}

/// Hand-driven clock for deterministic tests.
///
/// Starts at 0 (or a chosen instant) and only moves when told to. `set`
/// may move time backwards, which is how the clock-regression paths are
/// exercised.
///
/// # Example
///
/// ```rust
/// use admission_core::{Clock, ManualClock};
///
/// let clock = ManualClock::new(0);
/// clock.advance(250);
/// assert_eq!(clock.now_millis(), 250);
/// clock.set(100); // backdated
/// assert_eq!(clock.now_millis(), 100);
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// Creates a clock frozen at `start` milliseconds.
    pub fn new(start: Millis) -> Self {
        ManualClock {
            now: AtomicU64::new(start),
        }
    }

    /// Moves the clock forward by `delta` milliseconds.
    pub fn advance(&self, delta: Millis) {
        self.now.fetch_add(delta, Ordering::SeqCst);
    }

    /// Pins the clock to an absolute instant, forwards or backwards.
    pub fn set(&self, instant: Millis) {
        self.now.store(instant, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> Millis {
        self.now.load(Ordering::SeqCst)
    }
}
