//! # Request Tracker
//!
//! Remembers when each in-flight lookup was submitted so the result header
//! can show how long it took. Entries are keyed by `RequestId`, never by
//! identifier, and each entry is removed by the first completion for it.

use crate::repl::models::RequestId;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackerError {
    /// A completion arrived for a request that was never recorded or was
    /// already consumed
    #[error("no submission recorded for request {0}")]
    UnknownRequest(RequestId),
}

/// Submission instants of outstanding lookups
#[derive(Debug, Default)]
pub struct RequestTracker {
    started: HashMap<RequestId, Instant>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `id` was submitted now
    pub fn record(&mut self, id: RequestId) {
        self.record_at(id, Instant::now());
    }

    /// Record a submission at a given instant
    pub fn record_at(&mut self, id: RequestId, started: Instant) {
        if self.started.insert(id, started).is_some() {
            tracing::warn!("Request {} was recorded twice", id);
        }
    }

    /// Remove the entry for `id` and return the time since it was recorded
    pub fn consume(&mut self, id: RequestId) -> Result<Duration, TrackerError> {
        let started = self
            .started
            .remove(&id)
            .ok_or(TrackerError::UnknownRequest(id))?;
        Ok(started.elapsed())
    }

    /// Number of lookups still waiting for a completion
    pub fn pending(&self) -> usize {
        self.started.len()
    }

    pub fn is_pending(&self, id: RequestId) -> bool {
        self.started.contains_key(&id)
    }
}
