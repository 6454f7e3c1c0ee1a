//! Capability trait shared by all admission strategies.

use crate::types::RequestId;

/// The admission decision interface implemented by every strategy.
///
/// A limiter answers one question per call: admit or reject the request
/// arriving now. A denial is a normal `false` — never an error — and the
/// limiter never queues or blocks the caller; a denied caller retries (or
/// not) on its own schedule.
///
/// Strategy-specific introspection (`available_tokens`, `available_space`,
/// `requests`) lives on the concrete types, since the shapes differ per
/// algorithm.
pub trait RateLimiter: Send + Sync {
    /// Decides whether to admit the request arriving now.
    ///
    /// Window-based strategies stamp `id` onto the [`Request`](crate::Request)
    /// they log for the admission; bucket strategies ignore it.
    fn allow_request(&self, id: Option<RequestId>) -> bool;

    /// [`allow_request`](Self::allow_request) without an identifier, for
    /// strategies (and callers) that don't track request identity.
    fn allow(&self) -> bool {
        self.allow_request(None)
    }
}
