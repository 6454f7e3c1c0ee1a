use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::clock::{Clock, SystemClock};
use crate::error::ConfigurationError;
use crate::limiter::RateLimiter;
use crate::request::{Request, RequestLog};
use crate::types::{Millis, RequestId};

/// Fixed window counter.
///
/// Counts admissions within discrete windows of `window_ms`. When a call
/// finds the current window expired, the window restarts at that call's
/// instant with a zero count and an empty request log; the reset happens
/// atomically with the admission check that discovered it. History from
/// the prior window is discarded outright — no carry-over, no smoothing.
///
/// # Boundary behavior
///
/// Because each window forgets the last one completely, up to
/// `2 × max_requests` admissions can land in a short span straddling a
/// window boundary. That burst is the well-known fixed-window artifact and
/// is preserved here as intended behavior;
/// [`SlidingWindow`](crate::strategies::SlidingWindow) is the strategy
/// that trades bookkeeping for eliminating it.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use admission_core::{ManualClock, RateLimiter};
/// use admission_core::strategies::FixedWindow;
///
/// let clock = Arc::new(ManualClock::new(0));
/// let window = FixedWindow::with_clock(2, 10_000, clock.clone()).unwrap();
///
/// assert!(window.allow_request(Some(1)));
/// assert!(window.allow_request(Some(2)));
/// assert!(!window.allow_request(Some(3))); // window exhausted
///
/// clock.advance(10_000);                   // window expired: fresh count
/// assert!(window.allow_request(Some(4)));
/// assert_eq!(window.requests().len(), 1);  // prior window's log is gone
/// ```
pub struct FixedWindow {
    /// Maximum admissions per window.
    max_requests: u32,
    /// Window duration in milliseconds.
    window: Millis,
    clock: Arc<dyn Clock>,
    /// Window start, count, and log, mutated together under one lock.
    state: Mutex<FixedWindowState>,
}

impl std::fmt::Debug for FixedWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedWindow")
            .field("max_requests", &self.max_requests)
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

struct FixedWindowState {
    /// Instant the current window began.
    window_start: Millis,
    /// Admissions in the current window.
    count: u32,
    /// Admitted requests of the current window, for introspection.
    log: RequestLog,
}

impl FixedWindow {
    /// Creates a limiter on the system clock; the first window starts now.
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

        let now = clock.now_millis();
        Ok(FixedWindow {
            max_requests,
            window: window_ms,
            clock,
            state: Mutex::new(FixedWindowState {
                window_start: now,
                count: 0,
                log: RequestLog::with_limit(max_requests as usize),
            }),
        })
    }

    /// Snapshot of the admitted requests in the current window, oldest
    /// first. A copy — mutating it cannot touch the limiter.
    pub fn requests(&self) -> Vec<Request> {
        self.state.lock().log.snapshot()
    }

    /// Restarts the window at `now` if the current one has run its
    /// duration. A backdated `now` reads as zero elapsed time.
    fn roll_window(&self, state: &mut FixedWindowState, now: Millis) {
        if now.saturating_sub(state.window_start) >= self.window {
            state.window_start = now;
            state.count = 0;
            state.log.clear();
            trace!(window_start = now, "fixed window reset");
        }
    }
}

impl RateLimiter for FixedWindow {
    fn allow_request(&self, id: Option<RequestId>) -> bool {
        let mut state = self.state.lock();
        // Clock is read inside the critical section so decisions and their
        // timestamps share one total order.
        let now = self.clock.now_millis();
        self.roll_window(&mut state, now);

        if state.count < self.max_requests {
            state.count += 1;
            let mut request = Request::new(id, now);
            request.admit();
            state.log.record(request);
            true
        } else {
            false
        }
    }
}
