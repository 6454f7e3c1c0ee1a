use std::sync::Arc;
use std::thread;

use admission_core::strategies::LeakyBucket;
use admission_core::{ConfigurationError, ManualClock, RateLimiter};

fn bucket_at_zero(capacity: u32, rate: u32, interval: u64) -> (LeakyBucket, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(0));
    let bucket = LeakyBucket::with_clock(capacity, rate, interval, clock.clone()).unwrap();
    (bucket, clock)
}

#[test]
fn rejects_zero_capacity() {
    assert_eq!(
        LeakyBucket::new(0, 1, 1000).unwrap_err(),
        ConfigurationError::ZeroCapacity
    );
}

#[test]
fn rejects_zero_leak_rate() {
    assert_eq!(
        LeakyBucket::new(5, 0, 1000).unwrap_err(),
        ConfigurationError::ZeroRate
    );
}

#[test]
fn rejects_zero_leak_interval() {
    assert_eq!(
        LeakyBucket::new(5, 1, 0).unwrap_err(),
        ConfigurationError::ZeroInterval
    );
}

#[test]
fn starts_empty() {
    let (bucket, _clock) = bucket_at_zero(5, 1, 1000);
    assert_eq!(bucket.available_space(), 5);
}

#[test]
fn admissions_fill_the_bucket() {
    // capacity=5, leak 1 per second: five immediate calls fill the bucket,
    // the sixth finds it full.
    let (bucket, _clock) = bucket_at_zero(5, 1, 1000);

    for _ in 0..5 {
        assert!(bucket.allow());
    }
    assert_eq!(bucket.available_space(), 0);
    assert!(!bucket.allow());
}

#[test]
fn leak_then_admit_scenario() {
    let (bucket, clock) = bucket_at_zero(5, 1, 1000);

    for _ in 0..5 {
        assert!(bucket.allow());
    }
    assert!(!bucket.allow());

    // 2000ms elapsed = 2 whole intervals * 1 = 2 drained, level 5 -> 3.
    // The admission then raises it to 4, leaving one slot of space.
    clock.set(2000);
    assert!(bucket.allow());
    assert_eq!(bucket.available_space(), 1);
}

#[test]
fn sub_interval_time_is_not_leaked() {
    let (bucket, clock) = bucket_at_zero(2, 1, 1000);

    assert!(bucket.allow());
    assert!(bucket.allow()); // level = 2, full

    // 999ms: less than one interval, nothing drains and the leak instant
    // does not move.
    clock.set(999);
    assert!(!bucket.allow());

    // 1000ms from the original instant completes the interval. Had the
    // 999ms call advanced the instant, only 1ms would have elapsed here.
    clock.set(1000);
    assert!(bucket.allow()); // 1 drained, admit brings level back to 2
    assert!(!bucket.allow());
}

#[test]
fn leak_clamps_at_empty() {
    let (bucket, clock) = bucket_at_zero(5, 3, 1000);

    assert!(bucket.allow()); // level = 1

    // 10 intervals * 3 = 30 would drain far past zero; level floors at 0.
    clock.set(10_000);
    assert_eq!(bucket.available_space(), 5);
}

#[test]
fn backwards_clock_drains_nothing() {
    let (bucket, clock) = bucket_at_zero(2, 1, 1000);

    clock.set(5000);
    assert!(bucket.allow());
    assert!(bucket.allow()); // full at t=5000

    // Regression to 0: elapsed clamps to zero, still full.
    clock.set(0);
    assert!(!bucket.allow());
    assert_eq!(bucket.available_space(), 0);

    // Leak instant stayed at 5000.
    clock.set(6000);
    assert!(bucket.allow());
}

#[test]
fn denied_call_leaves_state_untouched() {
    let (bucket, clock) = bucket_at_zero(3, 1, 1000);

    for _ in 0..3 {
        assert!(bucket.allow());
    }
    for _ in 0..10 {
        assert!(!bucket.allow());
    }

    // 1000ms drains exactly one: space for exactly one more.
    clock.set(1000);
    assert_eq!(bucket.available_space(), 1);
}

#[test]
fn concurrent_fill_admits_exactly_capacity() {
    // 8 threads race for 5 slots on a frozen clock: exactly 5 admissions.
    let clock = Arc::new(ManualClock::new(0));
    let bucket = Arc::new(LeakyBucket::with_clock(5, 1, 1000, clock).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let bucket = Arc::clone(&bucket);
            thread::spawn(move || bucket.allow())
        })
        .collect();

    let admitted = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|&admitted| admitted)
        .count();
    assert_eq!(admitted, 5);
    assert_eq!(bucket.available_space(), 0);
}
