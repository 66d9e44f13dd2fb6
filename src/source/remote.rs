//! Remote Storage Data Source
//!
//! Placeholder for documents kept in a remote object storage bucket.
//! Resolving download URLs is not implemented, so every fetch fails.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use super::{validate_key, DataSource, RESOURCE_EXTENSION};
use crate::cache::{CacheStats, SharedCache};
use crate::config::RemoteStorageConfig;
use crate::error::{DataError, Result};

/// Data source backed by remote object storage.
pub struct RemoteDataSource {
    config: RemoteStorageConfig,
    cache: SharedCache,
}

impl RemoteDataSource {
    // == Constructor ==
    /// Creates a source for `config`'s bucket, using `cache` for storage.
    pub fn new(config: RemoteStorageConfig, cache: SharedCache) -> Self {
        Self { config, cache }
    }

    /// Object path the document for `key` would be stored under.
    pub fn object_path(&self, key: &str) -> String {
        format!(
            "{}/{}.{}",
            self.config.storage_path.trim_end_matches('/'),
            key,
            RESOURCE_EXTENSION
        )
    }
}

#[async_trait]
impl DataSource for RemoteDataSource {
    fn name(&self) -> &'static str {
        "remote-storage"
    }

    async fn fetch(&self, key: &str) -> Result<Arc<Value>> {
        validate_key(key)?;

        // TODO: resolve a download URL for object_path(key) and GET it once
        // the storage SDK is picked.
        warn!(
            key,
            bucket = self.config.bucket.as_str(),
            object = %self.object_path(key),
            "remote storage requested but not implemented"
        );
        Err(DataError::BackendUnavailable(
            "remote storage is not implemented yet".to_string(),
        ))
    }

    async fn clear_cache(&self, key: Option<&str>) {
        let mut cache = self.cache.write().await;
        match key {
            Some(key) => {
                cache.remove(key);
            }
            None => {
                cache.clear();
            }
        }
    }

    async fn cache_stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }
}
