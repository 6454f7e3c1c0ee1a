//! Scalar type aliases shared by every strategy.
//!
//! All temporal quantities in this crate (timestamps, refill and leak
//! intervals, window durations) are wall-clock milliseconds carried as
//! [`Millis`]. Request identifiers are opaque caller-chosen values carried
//! as [`RequestId`]; the crate never interprets them.

/// Wall-clock milliseconds.
///
/// The unit of every timestamp, interval, and window duration in the crate.
/// `u64` milliseconds give ~584 million years of range, comfortably more
/// than any admission window needs.
pub type Millis = u64;

/// Opaque request identifier supplied by the caller.
///
/// Window-based strategies store it on the [`Request`](crate::Request)
/// entries they log; bucket strategies ignore it.
pub type RequestId = u64;
