//! Cache Store Module
//!
//! Keyed JSON document cache with TTL validity. Entries are never evicted on
//! their own; a stale entry stays until it is overwritten or cleared.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::trace;

use crate::cache::{CacheEntry, CacheStats};

// == Cache Store ==
/// Cache storage owned by a single data source.
#[derive(Debug)]
pub struct CacheStore {
    /// Entries by logical key
    entries: HashMap<String, CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
    /// Validity window for every entry
    ttl: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store whose entries stay valid for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            ttl,
        }
    }

    /// Returns the configured validity window.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Get ==
    /// Returns the payload for `key` if a valid entry exists.
    ///
    /// Expired entries are left in place and counted as stale.
    pub fn get(&mut self, key: &str) -> Option<Arc<Value>> {
        match self.entries.get(key) {
            Some(entry) if entry.is_valid(self.ttl) => {
                self.stats.record_hit();
                Some(Arc::clone(&entry.payload))
            }
            Some(entry) => {
                trace!(key, age_ms = entry.age().as_millis() as u64, "cache entry stale");
                self.stats.record_stale();
                None
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Peek ==
    /// Looks at an entry without touching statistics, valid or not.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    // == Insert ==
    /// Stores `payload` under `key`, replacing any previous entry and
    /// resetting its timestamp.
    pub fn insert(&mut self, key: &str, payload: Arc<Value>) {
        self.entries
            .insert(key.to_string(), CacheEntry::new(key, payload));
        self.stats.record_store();
        self.stats.set_total_entries(self.entries.len());
    }

    // == Remove ==
    /// Removes the entry for `key`. Returns whether one existed.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.stats.record_clears(1);
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }

    // == Clear ==
    /// Removes every entry. Returns the number removed.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.stats.record_clears(count);
        self.stats.set_total_entries(0);
        count
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
