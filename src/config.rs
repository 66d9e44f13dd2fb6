//! Configuration Module
//!
//! Handles loading and managing data layer configuration from environment variables.

use std::env;
use std::time::Duration;

use tracing::warn;

// == Data Source Kind ==
/// Backend variant selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataSourceKind {
    /// Static JSON files under `base_path` (directory or URL prefix)
    #[default]
    Local,
    /// Remote object storage bucket, not implemented yet
    Firebase,
}

impl DataSourceKind {
    /// Parses a configuration value. Unknown values yield None.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Some(Self::Local),
            "firebase" => Some(Self::Firebase),
            _ => None,
        }
    }
}

// == Retry On ==
/// Which errors the retry orchestrator retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryOn {
    /// Retry every error kind, including not-found
    #[default]
    All,
    /// Retry transport failures only; fail fast on everything else
    Transient,
}

impl RetryOn {
    /// Parses a configuration value. Unknown values yield None.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "transient" => Some(Self::Transient),
            _ => None,
        }
    }
}

/// Cache settings shared by every data source variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// When false every fetch goes straight to transport
    pub enabled: bool,
    /// Entry validity window in milliseconds
    pub ttl_ms: u64,
}

impl CacheConfig {
    /// Entry validity window as a Duration.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_ms: 5 * 60 * 1000,
        }
    }
}

/// Retry and backoff settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts per fetch, including the first
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles for each later attempt
    pub base_delay_ms: u64,
    /// Error kinds eligible for another attempt
    pub retry_on: RetryOn,
}

impl RetryConfig {
    /// Delay to wait after failed attempt `attempt` (1-based).
    ///
    /// `base_delay_ms * 2^(attempt - 1)`, saturating on overflow.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        let factor = 1u64.checked_shl(exponent).unwrap_or(u64::MAX);
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            retry_on: RetryOn::All,
        }
    }
}

/// Remote storage settings, used once the remote backend exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteStorageConfig {
    /// Storage bucket name
    pub bucket: String,
    /// Prefix under which JSON documents live in the bucket
    pub storage_path: String,
}

impl Default for RemoteStorageConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            storage_path: "data".to_string(),
        }
    }
}

/// Data layer configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backend variant
    pub data_source: DataSourceKind,
    /// Directory or URL prefix for local JSON documents
    pub base_path: String,
    /// Cache settings
    pub cache: CacheConfig,
    /// Retry settings
    pub retry: RetryConfig,
    /// Remote storage settings
    pub remote: RemoteStorageConfig,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DATA_SOURCE` - `local` or `firebase` (default: local)
    /// - `DATA_BASE_PATH` - Directory or http(s) URL prefix (default: /data)
    /// - `CACHE_ENABLED` - `true`/`false` (default: true)
    /// - `CACHE_TTL_MS` - Cache entry validity in ms (default: 300000)
    /// - `RETRY_MAX_ATTEMPTS` - Attempts per fetch (default: 3)
    /// - `RETRY_BASE_DELAY_MS` - First backoff delay in ms (default: 1000)
    /// - `RETRY_ON` - `all` or `transient` (default: all)
    /// - `REMOTE_STORAGE_BUCKET` - Remote bucket name (default: empty)
    /// - `REMOTE_STORAGE_PATH` - Remote object prefix (default: data)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let data_source = match lookup("DATA_SOURCE") {
            Some(raw) => DataSourceKind::parse(&raw).unwrap_or_else(|| {
                warn!("Unknown DATA_SOURCE '{}', falling back to local", raw);
                DataSourceKind::Local
            }),
            None => defaults.data_source,
        };

        let retry_on = match lookup("RETRY_ON") {
            Some(raw) => RetryOn::parse(&raw).unwrap_or_else(|| {
                warn!("Unknown RETRY_ON '{}', falling back to all", raw);
                RetryOn::All
            }),
            None => defaults.retry.retry_on,
        };

        Self {
            data_source,
            base_path: lookup("DATA_BASE_PATH")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.base_path),
            cache: CacheConfig {
                enabled: lookup("CACHE_ENABLED")
                    .and_then(|v| parse_bool(&v))
                    .unwrap_or(defaults.cache.enabled),
                ttl_ms: lookup("CACHE_TTL_MS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.cache.ttl_ms),
            },
            retry: RetryConfig {
                max_attempts: lookup("RETRY_MAX_ATTEMPTS")
                    .and_then(|v| v.parse().ok())
                    .filter(|n: &u32| *n > 0)
                    .unwrap_or(defaults.retry.max_attempts),
                base_delay_ms: lookup("RETRY_BASE_DELAY_MS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.retry.base_delay_ms),
                retry_on,
            },
            remote: RemoteStorageConfig {
                bucket: lookup("REMOTE_STORAGE_BUCKET").unwrap_or(defaults.remote.bucket),
                storage_path: lookup("REMOTE_STORAGE_PATH")
                    .filter(|v| !v.trim().is_empty())
                    .unwrap_or(defaults.remote.storage_path),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_source: DataSourceKind::Local,
            base_path: "/data".to_string(),
            cache: CacheConfig::default(),
            retry: RetryConfig::default(),
            remote: RemoteStorageConfig::default(),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.data_source, DataSourceKind::Local);
        assert_eq!(config.base_path, "/data");
        assert!(config.cache.enabled);
        assert_eq!(config.cache.ttl_ms, 300_000);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.base_delay_ms, 1000);
        assert_eq!(config.retry.retry_on, RetryOn::All);
        assert_eq!(config.remote.storage_path, "data");
    }

    #[test]
    fn test_config_from_empty_lookup_is_default() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_from_lookup_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATA_SOURCE", "firebase"),
            ("DATA_BASE_PATH", "./public/data"),
            ("CACHE_ENABLED", "false"),
            ("CACHE_TTL_MS", "1500"),
            ("RETRY_MAX_ATTEMPTS", "5"),
            ("RETRY_BASE_DELAY_MS", "10"),
            ("RETRY_ON", "transient"),
            ("REMOTE_STORAGE_BUCKET", "fan-site"),
        ]));

        assert_eq!(config.data_source, DataSourceKind::Firebase);
        assert_eq!(config.base_path, "./public/data");
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.ttl(), Duration::from_millis(1500));
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.base_delay_ms, 10);
        assert_eq!(config.retry.retry_on, RetryOn::Transient);
        assert_eq!(config.remote.bucket, "fan-site");
        assert_eq!(config.remote.storage_path, "data");
    }

    #[test]
    fn test_config_invalid_values_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATA_SOURCE", "s3"),
            ("CACHE_ENABLED", "maybe"),
            ("CACHE_TTL_MS", "-1"),
            ("RETRY_MAX_ATTEMPTS", "0"),
            ("RETRY_ON", "sometimes"),
        ]));

        assert_eq!(config.data_source, DataSourceKind::Local);
        assert!(config.cache.enabled);
        assert_eq!(config.cache.ttl_ms, 300_000);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.retry_on, RetryOn::All);
    }

    #[test]
    fn test_delay_after_doubles() {
        let retry = RetryConfig::default();
        assert_eq!(retry.delay_after(1), Duration::from_millis(1000));
        assert_eq!(retry.delay_after(2), Duration::from_millis(2000));
        assert_eq!(retry.delay_after(3), Duration::from_millis(4000));
    }

    #[test]
    fn test_delay_after_saturates() {
        let retry = RetryConfig {
            base_delay_ms: u64::MAX / 2,
            ..RetryConfig::default()
        };
        assert_eq!(retry.delay_after(80), Duration::from_millis(u64::MAX));
    }
}
