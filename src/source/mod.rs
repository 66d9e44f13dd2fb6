//! Data Source Module
//!
//! Resolves logical keys (`"status"`, `"schedules"`, ...) to JSON documents.
//! Each variant owns its own cache and performs at most one transport call
//! per fetch; retrying is left to [`crate::fetch::Fetcher`].

mod loader;
mod local;
mod remote;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;

use crate::cache::{shared_cache, CacheStats};
use crate::config::{Config, DataSourceKind};
use crate::error::{DataError, Result};

pub use loader::{FileLoader, HttpLoader, ResourceLoader};
pub use local::LocalDataSource;
pub use remote::RemoteDataSource;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// File extension appended to every logical key
pub const RESOURCE_EXTENSION: &str = "json";

// == Data Source Trait ==
/// Capability set shared by every backend variant.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &'static str;

    /// Returns the document for `key`, from cache when a valid entry exists.
    async fn fetch(&self, key: &str) -> Result<Arc<Value>>;

    /// Drops the cache entry for `key`, or every entry when `key` is None.
    async fn clear_cache(&self, key: Option<&str>);

    /// Snapshot of this source's cache statistics.
    async fn cache_stats(&self) -> CacheStats;
}

// == Key Validation ==
/// Checks that `key` is usable as a resource address.
///
/// Keys are `/`-separated segments of letters, digits (any script), `_`, `-` and `.`,
/// with no empty, `.` or `..` segments.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(DataError::InvalidKey("key must not be empty".to_string()));
    }

    if key.len() > MAX_KEY_LENGTH {
        return Err(DataError::InvalidKey(format!(
            "key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }

    for segment in key.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return Err(DataError::InvalidKey(format!(
                "'{}' contains an empty or relative path segment",
                key
            )));
        }

        if let Some(c) = segment
            .chars()
            .find(|c| !(c.is_alphanumeric() || matches!(c, '_' | '-' | '.')))
        {
            return Err(DataError::InvalidKey(format!(
                "'{}' contains unsupported character {:?}",
                key, c
            )));
        }
    }

    Ok(())
}

// == Decode ==
/// Deserializes a fetched document into the caller's expected shape.
///
/// A shape mismatch fails with [`DataError::MalformedPayload`].
pub fn decode<T: DeserializeOwned>(key: &str, payload: &Value) -> Result<T> {
    T::deserialize(payload).map_err(|e| DataError::MalformedPayload {
        key: key.to_string(),
        message: e.to_string(),
    })
}

// == Factory ==
/// Builds the data source selected by `config`, with a freshly owned cache.
///
/// A `base_path` starting with `http://` or `https://` is fetched over HTTP,
/// anything else is read from disk.
pub fn build_data_source(config: &Config) -> Result<Arc<dyn DataSource>> {
    let cache = shared_cache(config.cache.ttl());

    let source: Arc<dyn DataSource> = match config.data_source {
        DataSourceKind::Local if is_url(&config.base_path) => {
            info!("Using HTTP data source at {}", config.base_path);
            Arc::new(LocalDataSource::new(
                HttpLoader::new(&config.base_path)?,
                cache,
                config.cache.enabled,
            ))
        }
        DataSourceKind::Local => {
            info!("Using file data source at {}", config.base_path);
            Arc::new(LocalDataSource::new(
                FileLoader::new(&config.base_path),
                cache,
                config.cache.enabled,
            ))
        }
        DataSourceKind::Firebase => {
            info!(
                "Using remote storage data source (bucket '{}')",
                config.remote.bucket
            );
            Arc::new(RemoteDataSource::new(config.remote.clone(), cache))
        }
    };

    Ok(source)
}

fn is_url(base_path: &str) -> bool {
    base_path.starts_with("http://") || base_path.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_validate_key_accepts_known_keys() {
        for key in ["status", "schedules", "chat_rooms", "goodstrade", "room-01", "chat/room.2"] {
            assert!(validate_key(key).is_ok(), "{} should be valid", key);
        }
    }

    #[test]
    fn test_validate_key_accepts_unicode_room_ids() {
        for key in ["팬카페", "ゆに_01", "room/방-2"] {
            assert!(validate_key(key).is_ok(), "{} should be valid", key);
        }
    }

    #[test]
    fn test_validate_key_rejects_bad_keys() {
        let too_long = "k".repeat(MAX_KEY_LENGTH + 1);
        for key in [
            "",
            "../secret",
            "a//b",
            "/abs",
            "trailing/",
            "sp ace",
            "q?x=1",
            "tab\there",
            "nul\0",
            "chatroom/팬/..",
            too_long.as_str(),
        ] {
            assert!(
                matches!(validate_key(key), Err(DataError::InvalidKey(_))),
                "{:?} should be rejected",
                key
            );
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    #[test]
    fn test_decode_matching_shape() {
        let decoded: Vec<Named> = decode("status", &json!([{"name": "Yuni"}])).unwrap();
        assert_eq!(decoded, vec![Named { name: "Yuni".into() }]);
    }

    #[test]
    fn test_decode_wrong_shape_is_malformed() {
        let result: Result<Vec<Named>> = decode("status", &json!({"name": 3}));
        assert!(matches!(
            result,
            Err(DataError::MalformedPayload { ref key, .. }) if key == "status"
        ));
    }

    #[tokio::test]
    async fn test_build_data_source_variants() {
        let local = build_data_source(&Config::default()).unwrap();
        assert_eq!(local.name(), "file");

        let http = build_data_source(&Config {
            base_path: "http://localhost:8080/data".into(),
            ..Config::default()
        })
        .unwrap();
        assert_eq!(http.name(), "http");

        let remote = build_data_source(&Config {
            data_source: DataSourceKind::Firebase,
            ..Config::default()
        })
        .unwrap();
        assert_eq!(remote.name(), "remote-storage");
    }
}
