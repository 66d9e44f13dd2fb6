//! Fetch Module
//!
//! Bounded retry with exponential backoff around a [`DataSource`].
//!
//! # Backoff
//! After failed attempt `n` the fetcher waits `base_delay_ms * 2^(n-1)`
//! before attempt `n + 1`: 1s, 2s, 4s, ... with the default settings.
//! Every wait and every transport call races the caller's
//! [`CancellationToken`]; a cancelled token ends the fetch immediately with
//! [`DataError::Cancelled`].

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{Config, RetryConfig, RetryOn};
use crate::error::{DataError, Result};
use crate::source::{build_data_source, decode, DataSource};

// == Fetcher ==
/// Retry orchestrator shared by every request session.
#[derive(Clone)]
pub struct Fetcher {
    source: Arc<dyn DataSource>,
    retry: RetryConfig,
}

impl Fetcher {
    // == Constructor ==
    /// Creates a fetcher over `source` with the given retry settings.
    pub fn new(source: Arc<dyn DataSource>, retry: RetryConfig) -> Self {
        Self { source, retry }
    }

    /// Builds the configured data source and wraps it.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(build_data_source(config)?, config.retry.clone()))
    }

    /// The wrapped data source.
    pub fn source(&self) -> &Arc<dyn DataSource> {
        &self.source
    }

    /// The retry settings in use.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    // == Fetch With Retry ==
    /// Fetches `key` with the configured attempt budget.
    pub async fn fetch_with_retry(&self, key: &str) -> Result<Arc<Value>> {
        self.fetch_with_attempts(key, self.retry.max_attempts).await
    }

    /// Fetches `key` with an explicit attempt budget.
    pub async fn fetch_with_attempts(&self, key: &str, max_attempts: u32) -> Result<Arc<Value>> {
        self.fetch_cancellable(key, max_attempts, &CancellationToken::new())
            .await
    }

    /// Fetches `key`, giving up early once `token` is cancelled.
    ///
    /// A budget of zero is treated as a single attempt. On exhaustion the
    /// error of the final attempt is returned unchanged.
    pub async fn fetch_cancellable(
        &self,
        key: &str,
        max_attempts: u32,
        token: &CancellationToken,
    ) -> Result<Arc<Value>> {
        let max_attempts = max_attempts.max(1);
        let mut attempt = 1;

        loop {
            if token.is_cancelled() {
                return Err(DataError::Cancelled(key.to_string()));
            }

            let result = tokio::select! {
                biased;
                _ = token.cancelled() => return Err(DataError::Cancelled(key.to_string())),
                result = self.source.fetch(key) => result,
            };

            let err = match result {
                Ok(payload) => {
                    if attempt > 1 {
                        info!(key, attempt, "fetch succeeded after retry");
                    }
                    return Ok(payload);
                }
                Err(err) => err,
            };

            if attempt >= max_attempts || !self.should_retry(&err) {
                warn!(key, attempt, max_attempts, error = %err, "fetch failed");
                return Err(err);
            }

            let delay = self.retry.delay_after(attempt);
            warn!(
                key,
                attempt,
                max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "fetch failed, retrying"
            );

            tokio::select! {
                biased;
                _ = token.cancelled() => return Err(DataError::Cancelled(key.to_string())),
                _ = tokio::time::sleep(delay) => {}
            }

            attempt += 1;
        }
    }

    // == Typed Fetch ==
    /// Fetches `key` with retries and decodes it into `T`.
    ///
    /// Decoding happens once, after transport succeeded; a shape mismatch is
    /// not retried.
    pub async fn fetch_as<T: DeserializeOwned>(
        &self,
        key: &str,
        token: &CancellationToken,
    ) -> Result<T> {
        let payload = self
            .fetch_cancellable(key, self.retry.max_attempts, token)
            .await?;
        decode(key, &payload)
    }

    // == Invalidate ==
    /// Drops the cached document for `key` so the next fetch hits transport.
    pub async fn invalidate(&self, key: &str) {
        debug!(key, "invalidating cache entry");
        self.source.clear_cache(Some(key)).await;
    }

    fn should_retry(&self, err: &DataError) -> bool {
        match err {
            DataError::InvalidKey(_) | DataError::Cancelled(_) => false,
            _ => match self.retry.retry_on {
                RetryOn::All => true,
                RetryOn::Transient => err.is_transient(),
            },
        }
    }
}
