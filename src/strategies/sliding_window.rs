use std::sync::Arc;

use parking_lot::Mutex;

use crate::clock::{Clock, SystemClock};
use crate::error::ConfigurationError;
use crate::limiter::RateLimiter;
use crate::request::{Request, RequestLog};
use crate::types::{Millis, RequestId};

/// Sliding (moving) window.
///
/// Counts only the requests inside a trailing interval of `window_ms`
/// ending at the current instant. Each call first evicts every logged
/// request whose age strictly exceeds the window, then admits iff fewer
/// than `max_requests` remain live. There is no window boundary to reset
/// at, so the fixed-window boundary burst cannot happen; the cost is
/// O(window size) bookkeeping per call instead of O(1).
///
/// # Boundary tie-break
///
/// Eviction uses strict greater-than on age: a request exactly
/// `window_ms` old is still live. With a 1000 ms window, an entry stamped
/// at t=0 survives a call at t=1000 and is evicted at t=1001.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use admission_core::{ManualClock, RateLimiter};
/// use admission_core::strategies::SlidingWindow;
///
/// let clock = Arc::new(ManualClock::new(0));
/// let window = SlidingWindow::with_clock(2, 1000, clock.clone()).unwrap();
///
/// assert!(window.allow_request(Some(1)));  // t=0
/// clock.set(500);
/// assert!(window.allow_request(Some(2)));  // t=500
/// clock.set(600);
/// assert!(!window.allow_request(Some(3))); // 2 live, denied
///
/// clock.set(1001);                         // t=0 entry ages out
/// assert!(window.allow_request(Some(4)));
/// ```
pub struct SlidingWindow {
    /// Maximum live requests inside the trailing window.
    max_requests: u32,
    /// Window duration in milliseconds.
    window: Millis,
    clock: Arc<dyn Clock>,
    /// Time-ordered log of live admissions, guarded by one lock.
    log: Mutex<RequestLog>,
}

impl std::fmt::Debug for SlidingWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlidingWindow")
            .field("max_requests", &self.max_requests)
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

impl SlidingWindow {
    /// Creates a limiter on the system clock.
    ///
    /// Returns [`ConfigurationError`] if `max_requests` or `window_ms` is
    /// zero.
    pub fn new(max_requests: u32, window_ms: Millis) -> Result<Self, ConfigurationError> {
        Self::with_clock(max_requests, window_ms, Arc::new(SystemClock))
    }

    /// Creates a limiter reading time from `clock`.
    pub fn with_clock(
        max_requests: u32,
        window_ms: Millis,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigurationError> {
        if max_requests == 0 {
            return Err(ConfigurationError::ZeroCapacity);
        }
        if window_ms == 0 {
            return Err(ConfigurationError::ZeroInterval);
        }

        Ok(SlidingWindow {
            max_requests,
            window: window_ms,
            clock,
            log: Mutex::new(RequestLog::with_limit(max_requests as usize)),
        })
    }

    /// Snapshot of the currently-live requests, oldest first, after
    /// evicting aged-out entries. A copy — mutating it cannot touch the
    /// limiter.
    pub fn requests(&self) -> Vec<Request> {
        let mut log = self.log.lock();
        let now = self.clock.now_millis();
        log.evict_expired(now, self.window);
        log.snapshot()
    }
}

impl RateLimiter for SlidingWindow {
    fn allow_request(&self, id: Option<RequestId>) -> bool {
        let mut log = self.log.lock();
        // Clock is read inside the critical section so decisions and their
        // timestamps share one total order.
        let now = self.clock.now_millis();
        log.evict_expired(now, self.window);

        if (log.len() as u64) < self.max_requests as u64 {
            let mut request = Request::new(id, now);
            request.admit();
            log.record(request);
            true
        } else {
            false
        }
    }
}
