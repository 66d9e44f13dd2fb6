//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses and stale lookups.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from a valid entry
    pub hits: u64,
    /// Lookups for a key with no entry
    pub misses: u64,
    /// Lookups that found an expired entry
    pub stale: u64,
    /// Entries written (inserts and overwrites)
    pub stores: u64,
    /// Entries removed by explicit clears
    pub clears: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses + stale), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses + self.stale;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Stale ==
    /// Increments the stale lookup counter.
    pub fn record_stale(&mut self) {
        self.stale += 1;
    }

    // == Record Store ==
    /// Increments the store counter.
    pub fn record_store(&mut self) {
        self.stores += 1;
    }

    // == Record Clears ==
    /// Adds `count` removed entries to the clear counter.
    pub fn record_clears(&mut self, count: usize) {
        self.clears += count as u64;
    }

    // == Update Entry Count ==
    /// Updates the total entries count.
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats, CacheStats::default());
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_counts_stale_as_lookup() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_miss();
        stats.record_stale();
        stats.record_hit();
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_record_clears_accumulates() {
        let mut stats = CacheStats::new();
        stats.record_clears(3);
        stats.record_clears(0);
        stats.record_clears(1);
        assert_eq!(stats.clears, 4);
    }
}
