//! Cache Module
//!
//! Provides the in-memory JSON document cache with TTL validity.

mod entry;
mod stats;
mod store;


use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Shared Cache ==
/// Cache handle injected into a data source.
pub type SharedCache = Arc<RwLock<CacheStore>>;

/// Creates a fresh, independently owned cache.
pub fn shared_cache(ttl: Duration) -> SharedCache {
    Arc::new(RwLock::new(CacheStore::new(ttl)))
}
