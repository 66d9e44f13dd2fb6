//! Local Data Source
//!
//! Cache-first data source over a [`ResourceLoader`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{validate_key, DataSource, ResourceLoader};
use crate::cache::{CacheStats, SharedCache};
use crate::error::Result;

// == Local Data Source ==
/// Serves static JSON documents through a loader, with a private TTL cache.
pub struct LocalDataSource<L: ResourceLoader> {
    loader: L,
    cache: SharedCache,
    cache_enabled: bool,
}

impl<L: ResourceLoader> LocalDataSource<L> {
    // == Constructor ==
    /// Creates a source using `loader` for transport and `cache` for storage.
    ///
    /// With `cache_enabled` false every fetch reaches the loader and nothing
    /// is stored.
    pub fn new(loader: L, cache: SharedCache, cache_enabled: bool) -> Self {
        Self {
            loader,
            cache,
            cache_enabled,
        }
    }

    /// Returns the underlying loader.
    pub fn loader(&self) -> &L {
        &self.loader
    }
}

#[async_trait]
impl<L: ResourceLoader> DataSource for LocalDataSource<L> {
    fn name(&self) -> &'static str {
        self.loader.name()
    }

    async fn fetch(&self, key: &str) -> Result<Arc<Value>> {
        validate_key(key)?;

        if self.cache_enabled {
            if let Some(payload) = self.cache.write().await.get(key) {
                debug!(key, "cache hit");
                return Ok(payload);
            }
        }

        debug!(key, source = %self.loader.locate(key), "cache miss, loading");
        let payload = Arc::new(self.loader.load(key).await?);

        if self.cache_enabled {
            self.cache.write().await.insert(key, Arc::clone(&payload));
        }

        Ok(payload)
    }

    async fn clear_cache(&self, key: Option<&str>) {
        let mut cache = self.cache.write().await;
        match key {
            Some(key) => {
                if cache.remove(key) {
                    debug!(key, "cache entry cleared");
                }
            }
            None => {
                let removed = cache.clear();
                debug!(removed, "cache cleared");
            }
        }
    }

    async fn cache_stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }
}
