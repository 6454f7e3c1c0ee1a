//! Construction-time validation errors.
//!
//! Limiter construction is the only fallible operation in the crate. Once a
//! limiter exists, a denial is an ordinary `false` from
//! [`allow_request`](crate::RateLimiter::allow_request), never an error.

use thiserror::Error;

/// Rejected limiter configuration.
///
/// Returned by every strategy constructor before any state is created; a
/// limiter with a zero capacity, rate, or interval cannot make meaningful
/// admission decisions.
///
/// # Example
///
/// ```rust
/// use admission_core::{ConfigurationError, strategies::TokenBucket};
///
/// let err = TokenBucket::new(0, 1, 1000).unwrap_err();
/// assert_eq!(err, ConfigurationError::ZeroCapacity);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// Capacity / maximum request count must be greater than 0.
    #[error("capacity must be greater than 0")]
    ZeroCapacity,

    /// Refill or leak amount per interval must be greater than 0.
    #[error("rate must be greater than 0")]
    ZeroRate,

    /// Interval or window duration must be greater than 0 milliseconds.
    #[error("interval must be greater than 0 ms")]
    ZeroInterval,
}
