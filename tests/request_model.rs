use admission_core::{Clock, ManualClock, Request, RequestLog, RequestStatus, SystemClock};

#[test]
fn request_starts_new() {
    let request = Request::new(Some(1), 42);
    assert_eq!(request.id(), Some(1));
    assert_eq!(request.timestamp(), 42);
    assert_eq!(request.status(), RequestStatus::New);
}

#[test]
fn status_settles_once() {
    let mut request = Request::new(Some(1), 0);
    request.admit();
    assert_eq!(request.status(), RequestStatus::Admitted);

    // Already settled: both transitions are now no-ops.
    request.reject();
    assert_eq!(request.status(), RequestStatus::Admitted);
    request.admit();
    assert_eq!(request.status(), RequestStatus::Admitted);
}

#[test]
fn rejection_settles_once_too() {
    let mut request = Request::new(None, 7);
    request.reject();
    request.admit();
    assert_eq!(request.status(), RequestStatus::Rejected);
}

#[test]
fn log_eviction_is_strictly_greater_than() {
    let mut log = RequestLog::with_limit(4);
    log.record(Request::new(Some(1), 0));
    log.record(Request::new(Some(2), 500));

    // Age of the oldest entry is exactly the window: it stays.
    log.evict_expired(1000, 1000);
    assert_eq!(log.len(), 2);

    // One past the boundary: only the t=0 entry goes.
    log.evict_expired(1001, 1000);
    assert_eq!(log.len(), 1);
    assert_eq!(log.snapshot()[0].id(), Some(2));
}

#[test]
fn log_eviction_tolerates_backdated_readings() {
    let mut log = RequestLog::with_limit(2);
    log.record(Request::new(Some(1), 5000));

    // now < timestamp: age clamps to zero, nothing is evicted.
    log.evict_expired(0, 1000);
    assert_eq!(log.len(), 1);
}

#[test]
fn log_snapshot_is_a_copy() {
    let mut log = RequestLog::with_limit(2);
    log.record(Request::new(Some(9), 10));

    let mut copy = log.snapshot();
    copy.clear();
    assert_eq!(log.len(), 1);
    assert!(!log.is_empty());
}

#[test]
fn log_clear_empties_everything() {
    let mut log = RequestLog::with_limit(3);
    log.record(Request::new(Some(1), 0));
    log.record(Request::new(Some(2), 1));
    log.clear();
    assert!(log.is_empty());
    assert!(log.snapshot().is_empty());
}

#[test]
fn manual_clock_moves_only_when_told() {
    let clock = ManualClock::new(42);
    assert_eq!(clock.now_millis(), 42);

    clock.advance(8);
    assert_eq!(clock.now_millis(), 50);

    clock.set(10); // backwards is allowed
    assert_eq!(clock.now_millis(), 10);
}

#[test]
fn system_clock_is_past_epoch() {
    // Anything running this test is well past 2001.
    assert!(SystemClock.now_millis() > 1_000_000_000_000);
}
