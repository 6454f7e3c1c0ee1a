use std::sync::Arc;
use std::thread;

use admission_core::strategies::FixedWindow;
use admission_core::{ConfigurationError, ManualClock, RateLimiter, RequestStatus};

fn window_at_zero(max: u32, duration: u64) -> (FixedWindow, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(0));
    let window = FixedWindow::with_clock(max, duration, clock.clone()).unwrap();
    (window, clock)
}

#[test]
fn rejects_zero_max_requests() {
    assert_eq!(
        FixedWindow::new(0, 10_000).unwrap_err(),
        ConfigurationError::ZeroCapacity
    );
}

#[test]
fn rejects_zero_window_duration() {
    assert_eq!(
        FixedWindow::new(3, 0).unwrap_err(),
        ConfigurationError::ZeroInterval
    );
}

#[test]
fn window_scenario() {
    // max=3 per 10s window.
    let (window, clock) = window_at_zero(3, 10_000);

    // Three calls at t=0 fill the window.
    assert!(window.allow_request(Some(1)));
    assert!(window.allow_request(Some(2)));
    assert!(window.allow_request(Some(3)));

    // t=5000 is still inside the window: denied.
    clock.set(5000);
    assert!(!window.allow_request(Some(4)));

    // t=10001: the window expired, count resets, admitted.
    clock.set(10_001);
    assert!(window.allow_request(Some(5)));
}

#[test]
fn reset_clears_count_and_log() {
    let (window, clock) = window_at_zero(2, 1000);

    assert!(window.allow_request(Some(1)));
    assert!(window.allow_request(Some(2)));
    assert_eq!(window.requests().len(), 2);

    // The reset discards the prior window's history outright.
    clock.set(1000);
    assert!(window.allow_request(Some(3)));
    let live = window.requests();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].id(), Some(3));
    assert_eq!(live[0].timestamp(), 1000);
    assert_eq!(live[0].status(), RequestStatus::Admitted);
}

#[test]
fn boundary_straddle_admits_double() {
    // The documented fixed-window artifact: max admissions right before a
    // boundary plus max right after = 2x max in a 2ms span.
    let (window, clock) = window_at_zero(3, 10_000);

    clock.set(9999);
    for i in 0..3 {
        assert!(window.allow_request(Some(i)));
    }
    assert!(!window.allow_request(Some(99)));

    clock.set(10_000); // 10_000 - 0 >= 10_000: fresh window
    for i in 10..13 {
        assert!(window.allow_request(Some(i)));
    }
    assert!(!window.allow_request(Some(99)));
}

#[test]
fn windows_restart_at_the_discovering_call() {
    // Reset pins the new window to the call that found the old one
    // expired, not to aligned multiples of the duration.
    let (window, clock) = window_at_zero(1, 10_000);

    assert!(window.allow_request(Some(1))); // window [0, 10000)

    clock.set(10_001);
    assert!(window.allow_request(Some(2))); // window now starts at 10001

    // 20_000 is only 9999ms into the new window: still the same window.
    clock.set(20_000);
    assert!(!window.allow_request(Some(3)));

    clock.set(20_001);
    assert!(window.allow_request(Some(4)));
}

#[test]
fn backwards_clock_does_not_reset() {
    let (window, clock) = window_at_zero(2, 1000);

    clock.set(5000);
    assert!(window.allow_request(Some(1)));
    assert!(window.allow_request(Some(2)));

    // Regression: elapsed clamps to zero, the window neither expires nor
    // loses its count.
    clock.set(0);
    assert!(!window.allow_request(Some(3)));
    assert_eq!(window.requests().len(), 2);
}

#[test]
fn denied_call_leaves_window_untouched() {
    let (window, clock) = window_at_zero(1, 1000);

    assert!(window.allow_request(Some(1)));
    for _ in 0..5 {
        assert!(!window.allow_request(Some(2)));
    }
    assert_eq!(window.requests().len(), 1);

    // The original window still expires on its own schedule.
    clock.set(1000);
    assert!(window.allow_request(Some(3)));
}

#[test]
fn snapshot_is_isolated_from_the_limiter() {
    let (window, _clock) = window_at_zero(2, 1000);
    assert!(window.allow_request(Some(1)));

    let mut copy = window.requests();
    copy.clear();
    assert_eq!(window.requests().len(), 1);
}

#[test]
fn id_is_optional() {
    let (window, _clock) = window_at_zero(2, 1000);
    assert!(window.allow());
    assert_eq!(window.requests()[0].id(), None);
}

#[test]
fn concurrent_calls_admit_exactly_max() {
    // 8 threads race for 3 slots on a frozen clock: exactly 3 admissions.
    let clock = Arc::new(ManualClock::new(0));
    let window = Arc::new(FixedWindow::with_clock(3, 10_000, clock).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let window = Arc::clone(&window);
            thread::spawn(move || window.allow_request(Some(i)))
        })
        .collect();

    let admitted = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|&admitted| admitted)
        .count();
    assert_eq!(admitted, 3);
    assert_eq!(window.requests().len(), 3);
}
