//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::time::Instant;

// == Cache Entry ==
/// A fetched JSON document together with the moment it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Logical key the payload was fetched for
    pub key: String,
    /// The parsed JSON document
    pub payload: Arc<Value>,
    /// Monotonic insertion time, used for TTL checks
    pub stored_at: Instant,
    /// Wall-clock insertion time, for diagnostics
    pub stored_at_utc: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    pub fn new(key: impl Into<String>, payload: Arc<Value>) -> Self {
        Self {
            key: key.into(),
            payload,
            stored_at: Instant::now(),
            stored_at_utc: Utc::now(),
        }
    }

    // == Age ==
    /// Time elapsed since the entry was stored.
    pub fn age(&self) -> Duration {
        self.stored_at.elapsed()
    }

    // == Is Valid ==
    /// Checks whether the entry can still be served without a re-fetch.
    ///
    /// Boundary condition: an entry whose age equals the TTL is stale.
    pub fn is_valid(&self, ttl: Duration) -> bool {
        self.age() < ttl
    }

    /// Remaining validity, or zero once stale.
    pub fn ttl_remaining(&self, ttl: Duration) -> Duration {
        ttl.saturating_sub(self.age())
    }
}
