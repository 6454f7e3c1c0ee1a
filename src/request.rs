//! Request records and the per-strategy request log.
//!
//! Window-based strategies materialize a [`Request`] for every admission and
//! keep it in a [`RequestLog`] so introspection can answer "which admitted
//! requests fall inside the current window". Bucket strategies only move
//! counters and never create requests.

use std::collections::VecDeque;

use crate::types::{Millis, RequestId};

/// Lifecycle status of a request.
///
/// A request is created `New` and settles exactly once, to either
/// `Admitted` or `Rejected`. Once settled the status is frozen; late calls
/// to [`Request::admit`] or [`Request::reject`] are no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    /// Created, not yet decided.
    New,
    /// Counted against the limit and admitted.
    Admitted,
    /// Turned away.
    Rejected,
}

/// An immutable identity + timestamp record with a single-assignment status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    id: Option<RequestId>,
    timestamp: Millis,
    status: RequestStatus,
}

impl Request {
    /// Creates a request stamped at `timestamp`, in the `New` state.
    pub fn new(id: Option<RequestId>, timestamp: Millis) -> Self {
        Request {
            id,
            timestamp,
            status: RequestStatus::New,
        }
    }

    /// Caller-supplied identifier, if any.
    pub fn id(&self) -> Option<RequestId> {
        self.id
    }

    /// Arrival instant in milliseconds.
    pub fn timestamp(&self) -> Millis {
        self.timestamp
    }

    /// Current lifecycle status.
    pub fn status(&self) -> RequestStatus {
        self.status
    }

    /// Settles the request as admitted. No-op unless the status is `New`.
    pub fn admit(&mut self) {
        if self.status == RequestStatus::New {
            self.status = RequestStatus::Admitted;
        }
    }

    /// Settles the request as rejected. No-op unless the status is `New`.
    pub fn reject(&mut self) {
        if self.status == RequestStatus::New {
            self.status = RequestStatus::Rejected;
        }
    }
}

/// Bounded, time-ordered log of admitted requests.
///
/// Owned exclusively by the strategy that fills it; queries hand out
/// snapshot copies via [`RequestLog::snapshot`], never the live structure.
/// Entries arrive in timestamp order (each strategy records under the same
/// lock it decides under) and leave from the front.
#[derive(Debug)]
pub struct RequestLog {
    entries: VecDeque<Request>,
    max_entries: usize,
}

impl RequestLog {
    /// Creates an empty log that is expected to hold at most `max_entries`.
    pub fn with_limit(max_entries: usize) -> Self {
        RequestLog {
            entries: VecDeque::with_capacity(max_entries),
            max_entries,
        }
    }

    /// Appends a request. The caller has already decided to admit it and
    /// checked the bound.
    pub fn record(&mut self, request: Request) {
        debug_assert!(self.entries.len() < self.max_entries);
        debug_assert!(
            self.entries
                .back()
                .map_or(true, |last| last.timestamp() <= request.timestamp()),
            "log entries must stay time-ordered"
        );
        self.entries.push_back(request);
    }

    /// Drops every entry whose age at `now` strictly exceeds `window`.
    ///
    /// An entry exactly at the boundary age stays live: with a 1000 ms
    /// window, an entry stamped at 0 survives a reading of 1000 and is
    /// evicted at 1001.
    pub fn evict_expired(&mut self, now: Millis, window: Millis) {
        while let Some(oldest) = self.entries.front() {
            if now.saturating_sub(oldest.timestamp()) > window {
                self.entries.pop_front();
            } else {
                break;
            }
        }
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copies the live entries, oldest first.
    pub fn snapshot(&self) -> Vec<Request> {
        self.entries.iter().cloned().collect()
    }
}
