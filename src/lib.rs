//! In-process admission control for Rust applications.
//!
//! Given a stream of incoming requests, each limiter decides per request,
//! in constant time, whether to admit or reject it. Five classical
//! strategies are provided, all thread-safe, each encoding a distinct
//! temporal accounting discipline.
//!
//! # Quick Start
//!
//! ```rust
//! use admission_core::RateLimiter;
//! use admission_core::strategies::TokenBucket;
//!
//! // Capacity 100, refilling 10 tokens every 5 seconds.
//! let limiter = TokenBucket::new(100, 10, 5000).unwrap();
//!
//! if limiter.allow() {
//!     // handle the request
//! } else {
//!     // turn it away; retry is the caller's business
//! }
//! ```
//!
//! # Available Strategies
//!
//! ## [Token Bucket](strategies::TokenBucket)
//! Allows bursts up to capacity while holding the average rate; refill is
//! computed lazily on each call:
//! ```rust
//! # use admission_core::strategies::TokenBucket;
//! let limiter = TokenBucket::new(100, 5, 1000).unwrap(); // 5 tokens back per second
//! ```
//!
//! ## [Scheduled Token Bucket](strategies::ScheduledTokenBucket)
//! Same accounting, but a background task refills at the configured
//! cadence and the request path is a single lock-free decrement:
//! ```rust,no_run
//! # use admission_core::strategies::ScheduledTokenBucket;
//! # async fn demo() {
//! let limiter = ScheduledTokenBucket::new(100, 5, 1000).unwrap();
//! // ...
//! limiter.shutdown();
//! # }
//! ```
//!
//! ## [Leaky Bucket](strategies::LeakyBucket)
//! A queue draining at a constant rate; admission fills the queue:
//! ```rust
//! # use admission_core::strategies::LeakyBucket;
//! let limiter = LeakyBucket::new(100, 5, 1000).unwrap(); // drains 5 per second
//! ```
//!
//! ## [Fixed Window](strategies::FixedWindow)
//! Discrete windows with a hard reset at each boundary:
//! ```rust
//! # use admission_core::strategies::FixedWindow;
//! let limiter = FixedWindow::new(100, 60_000).unwrap(); // 100 per minute
//! ```
//!
//! ## [Sliding Window](strategies::SlidingWindow)
//! Exact trailing-interval counting over a per-request log:
//! ```rust
//! # use admission_core::strategies::SlidingWindow;
//! let limiter = SlidingWindow::new(100, 60_000).unwrap(); // 100 per trailing minute
//! ```
//!
//! # Core Concepts
//!
//! ## Time
//! Strategies read wall-clock milliseconds through the [`Clock`] trait.
//! Production code uses the default [`SystemClock`]; tests inject a
//! [`ManualClock`] and drive time by hand. A clock reading that goes
//! backwards is clamped to zero elapsed time — no refill, no leak, no
//! reset, and no error.
//!
//! ## Decisions are booleans
//! A denial is a normal outcome, reported as `false`. Nothing at call time
//! throws, blocks, or queues. The only failure in the crate is
//! [`ConfigurationError`] at construction, for zero capacities, rates, or
//! intervals.
//!
//! ## Introspection is by snapshot
//! The window strategies expose `requests()`, which copies the internal
//! log; callers can never reach the live structure. Bucket introspection
//! (`available_tokens`, `available_space`) performs the same elapsed-time
//! accounting an admission would.
//!
//! # Strategy Selection Guide
//!
//! - **Allow controlled bursts**: [`TokenBucket`](strategies::TokenBucket)
//! - **Keep the request path lock-free**:
//!   [`ScheduledTokenBucket`](strategies::ScheduledTokenBucket)
//! - **Drain at a strict constant rate**:
//!   [`LeakyBucket`](strategies::LeakyBucket)
//! - **Simplest bookkeeping**: [`FixedWindow`](strategies::FixedWindow)
//! - **No boundary bursts, exact trailing count**:
//!   [`SlidingWindow`](strategies::SlidingWindow)

pub mod clock;
pub mod error;
pub mod limiter;
pub mod request;
pub mod strategies;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::ConfigurationError;
pub use limiter::RateLimiter;
pub use request::{Request, RequestLog, RequestStatus};
pub use types::{Millis, RequestId};
