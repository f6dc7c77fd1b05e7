// # Published Address State
//
// Process-local memory of the publisher loop.
//
// ## Crash Behavior
//
// - State lives only in memory and is empty after a restart
// - The first cycle after a restart republishes the current address once
//
// ## Invariant
//
// `last_known_address` changes only through `record_published`, which the
// publisher calls after the remote store confirmed the write. A failed write
// leaves the state untouched so the next cycle retries the same address.

use chrono::{DateTime, Utc};

/// Last address confirmed by the pointer store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishedAddressState {
    last_known_address: Option<String>,
    last_published_at: Option<DateTime<Utc>>,
}

impl PublishedAddressState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// The last successfully published address
    pub fn last_known_address(&self) -> Option<&str> {
        self.last_known_address.as_deref()
    }

    /// When the last successful publish happened
    pub fn last_published_at(&self) -> Option<DateTime<Utc>> {
        self.last_published_at
    }

    /// Whether `address` differs from the last published one
    ///
    /// An empty state differs from every address.
    pub fn differs_from(&self, address: &str) -> bool {
        self.last_known_address.as_deref() != Some(address)
    }

    /// Record a confirmed write, returning the previous address
    pub fn record_published(&mut self, address: impl Into<String>) -> Option<String> {
        self.last_published_at = Some(Utc::now());
        self.last_known_address.replace(address.into())
    }
}
