//! Admission strategy implementations.
//!
//! Each strategy owns its state exclusively and makes a constant-time
//! admit/reject decision through
//! [`RateLimiter::allow_request`](crate::RateLimiter::allow_request).
//!
//! # Available Strategies
//!
//! - **[`TokenBucket`]** - lazy-refill bucket; absorbs bursts up to capacity
//! - **[`ScheduledTokenBucket`]** - background-refill bucket; lock-free
//!   request path, steady refill independent of traffic
//! - **[`LeakyBucket`]** - queue draining at a constant rate; smooths bursts
//! - **[`FixedWindow`]** - discrete window counting; simplest, allows
//!   boundary bursts
//! - **[`SlidingWindow`]** - trailing-interval log; no boundary artifact
//!
//! # Strategy Comparison
//!
//! | Strategy | Memory | Request path | Burst handling | Use case |
//! |----------|--------|--------------|----------------|----------|
//! | Token Bucket | O(1) | locked, does refill | allows bursts | bursty traffic |
//! | Scheduled Token Bucket | O(1) | lock-free | steady admission | latency-sensitive paths |
//! | Leaky Bucket | O(1) | locked, does leak | smooths bursts | constant-rate draining |
//! | Fixed Window | O(window) | locked | boundary bursts | simple counting |
//! | Sliding Window | O(window) | locked, does eviction | smooth | exact trailing limits |
//!
//! # Concurrency
//!
//! All strategies but the scheduled bucket run their whole
//! account-decide-mutate sequence inside one critical section per limiter
//! instance, giving decisions a strict total order. The scheduled bucket
//! replaces the lock with an atomic counter shared with its refill task.
//! No strategy ever blocks a caller waiting for capacity: a denial is an
//! immediate `false`.

pub mod token_bucket;
pub use token_bucket::TokenBucket;

pub mod scheduled_token_bucket;
pub use scheduled_token_bucket::ScheduledTokenBucket;

pub mod leaky_bucket;
pub use leaky_bucket::LeakyBucket;

pub mod fixed_window;
pub use fixed_window::FixedWindow;

pub mod sliding_window;
pub use sliding_window::SlidingWindow;
