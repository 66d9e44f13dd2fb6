//! Request Lifecycle Controller
//!
//! Binds one logical key to observable state for a single consumer.
//!
//! Every load runs as its own task tagged with a generation number and a
//! cancellation token. Starting a new load (key change or refetch) bumps the
//! generation and cancels the previous token first; a task whose generation
//! is no longer current never touches the state. Teardown cancels the
//! in-flight token and closes the controller for good.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::state::ResourceState;
use crate::error::Result;
use crate::fetch::Fetcher;

/// In-flight request bookkeeping.
struct Session {
    key: String,
    generation: u64,
    token: CancellationToken,
    closed: bool,
}

struct Inner<T> {
    fetcher: Arc<Fetcher>,
    state: watch::Sender<ResourceState<T>>,
    session: Mutex<Session>,
    /// Cancelled on teardown
    closed: CancellationToken,
}

impl<T> Inner<T> {
    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Applies a finished load if it still belongs to the current session.
    ///
    /// Returns whether the state was updated.
    fn commit(&self, generation: u64, key: &str, result: Result<T>) -> bool {
        let session = self.session();

        if session.closed || session.generation != generation || session.token.is_cancelled() {
            debug!(key, generation, "discarding superseded response");
            return false;
        }

        match result {
            Ok(data) => {
                debug!(key, generation, "load succeeded");
                self.state.send_modify(|state| state.succeed(data));
                true
            }
            Err(err) => {
                let message = err.user_message(key);
                warn!(key, error = %err, "load failed");
                self.state.send_modify(|state| state.fail(message));
                true
            }
        }
    }
}

// == Resource ==
/// Request lifecycle controller for one consumer and one key at a time.
///
/// Dropping the controller tears it down.
pub struct Resource<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Resource<T> {
    /// Key currently requested.
    pub fn key(&self) -> String {
        self.inner.session().key.clone()
    }

    /// Current state snapshot.
    pub fn state(&self) -> ResourceState<T> {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<ResourceState<T>> {
        self.inner.state.subscribe()
    }

    // == Settled ==
    /// Waits until no load is in flight and returns the state.
    ///
    /// Returns immediately with the last state after teardown.
    pub async fn settled(&self) -> ResourceState<T> {
        let mut rx = self.subscribe();
        tokio::select! {
            _ = self.inner.closed.cancelled() => {}
            result = rx.wait_for(|state| state.is_settled()) => {
                if let Ok(state) = result {
                    return state.clone();
                }
            }
        }
        self.state()
    }

    // == Teardown ==
    /// Cancels the in-flight load; no state change happens afterwards.
    pub fn teardown(&self) {
        let mut session = self.inner.session();
        if session.closed {
            return;
        }
        session.closed = true;
        session.token.cancel();
        self.inner.closed.cancel();
        debug!(key = session.key.as_str(), "resource torn down");
    }

    /// True once torn down.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.is_cancelled()
    }
}

impl<T> Resource<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a controller and starts loading `key` unless it is empty.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(fetcher: Arc<Fetcher>, key: impl Into<String>) -> Self {
        let key = key.into();
        let (state, _) = watch::channel(ResourceState::idle(key.clone()));

        let resource = Self {
            inner: Arc::new(Inner {
                fetcher,
                state,
                session: Mutex::new(Session {
                    key: String::new(),
                    generation: 0,
                    token: CancellationToken::new(),
                    closed: false,
                }),
                closed: CancellationToken::new(),
            }),
        };

        resource.start(key, false);
        resource
    }

    // == Set Key ==
    /// Switches to `key`, superseding any in-flight load.
    ///
    /// Setting the key already requested does nothing.
    pub fn set_key(&self, key: impl Into<String>) {
        let key = key.into();
        let mut session = self.inner.session();
        if session.key == key {
            return;
        }
        self.launch(&mut session, key, false);
    }

    // == Refetch ==
    /// Drops the cached document for the current key and loads it again.
    ///
    /// Resolves once the new load finished or was superseded. A key change
    /// or another refetch that lands while the cache is being cleared wins,
    /// and this call then returns without loading.
    pub async fn refetch(&self) {
        let (key, generation) = {
            let session = self.inner.session();
            if session.closed || session.key.is_empty() {
                return;
            }
            (session.key.clone(), session.generation)
        };

        self.inner.fetcher.invalidate(&key).await;

        let task = {
            let mut session = self.inner.session();
            if session.generation != generation {
                debug!(key = key.as_str(), generation, "refetch superseded while clearing cache");
                return;
            }
            self.launch(&mut session, key, true)
        };

        if let Some(task) = task {
            let _ = task.await;
        }
    }

    fn start(&self, key: String, keep_data: bool) -> Option<JoinHandle<()>> {
        let mut session = self.inner.session();
        self.launch(&mut session, key, keep_data)
    }

    /// Supersedes the current session and spawns the load for `key`.
    ///
    /// Must be called with the session lock held.
    fn launch(
        &self,
        session: &mut Session,
        key: String,
        keep_data: bool,
    ) -> Option<JoinHandle<()>> {
        if session.closed {
            return None;
        }

        session.token.cancel();
        session.token = CancellationToken::new();
        session.generation += 1;
        session.key = key.clone();

        if key.is_empty() {
            self.inner
                .state
                .send_replace(ResourceState::idle(String::new()));
            return None;
        }

        self.inner
            .state
            .send_modify(|state| state.begin_loading(&key, keep_data));

        let generation = session.generation;
        let token = session.token.clone();
        let inner = Arc::clone(&self.inner);
        debug!(key = key.as_str(), generation, "load started");

        Some(tokio::spawn(async move {
            let result = inner.fetcher.fetch_as::<T>(&key, &token).await;
            inner.commit(generation, &key, result);
        }))
    }
}

impl<T> Drop for Resource<T> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStats;
    use crate::config::RetryConfig;
    use crate::error::DataError;
    use crate::session::LoadStatus;
    use crate::source::DataSource;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::time::Duration;

    struct EchoSource;

    #[async_trait]
    impl DataSource for EchoSource {
        fn name(&self) -> &'static str {
            "echo"
        }

        async fn fetch(&self, key: &str) -> Result<Arc<Value>> {
            Ok(Arc::new(json!(key)))
        }

        async fn clear_cache(&self, _key: Option<&str>) {}

        async fn cache_stats(&self) -> CacheStats {
            CacheStats::default()
        }
    }

    /// Source that reports its own cancellation.
    struct CancellingSource;

    #[async_trait]
    impl DataSource for CancellingSource {
        fn name(&self) -> &'static str {
            "cancelling"
        }

        async fn fetch(&self, key: &str) -> Result<Arc<Value>> {
            Err(DataError::Cancelled(key.to_string()))
        }

        async fn clear_cache(&self, _key: Option<&str>) {}

        async fn cache_stats(&self) -> CacheStats {
            CacheStats::default()
        }
    }

    fn resource(key: &str) -> Resource<String> {
        let fetcher = Fetcher::new(Arc::new(EchoSource), RetryConfig::default());
        Resource::new(Arc::new(fetcher), key)
    }

    #[tokio::test]
    async fn test_commit_discards_stale_generation() {
        let resource = resource("");
        resource.set_key("status");
        resource.set_key("schedules");

        // generation 2 belongs to "status", which was superseded
        let applied = resource
            .inner
            .commit(2, "status", Ok("from status".to_string()));

        assert!(!applied);
        let state = resource.settled().await;
        assert_eq!(state.data.as_deref().map(String::as_str), Some("schedules"));
    }

    #[tokio::test]
    async fn test_commit_reports_cancellation_from_live_session() {
        let resource = resource("");
        resource.set_key("status");
        let generation = resource.inner.session().generation;
        resource.settled().await;

        // the session's own token is still live, so this came from the source
        let applied = resource.inner.commit(
            generation,
            "status",
            Err(DataError::Cancelled("status".into())),
        );

        assert!(applied);
        let state = resource.state();
        assert_eq!(state.status, LoadStatus::Failed);
        assert!(!state.loading);
        assert!(state.error.is_some());
    }

    #[tokio::test]
    async fn test_source_cancellation_still_settles() {
        let fetcher = Fetcher::new(Arc::new(CancellingSource), RetryConfig::default());
        let resource: Resource<String> = Resource::new(Arc::new(fetcher), "status");

        let state = tokio::time::timeout(Duration::from_secs(1), resource.settled())
            .await
            .expect("settled must not hang");

        assert_eq!(state.status, LoadStatus::Failed);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_commit_after_teardown_is_ignored() {
        let resource = resource("status");
        resource.settled().await;
        let generation = resource.inner.session().generation;

        resource.teardown();
        let applied = resource
            .inner
            .commit(generation, "status", Ok("late".to_string()));

        assert!(!applied);
        assert_eq!(
            resource.state().data.as_deref().map(String::as_str),
            Some("status")
        );
    }

    #[tokio::test]
    async fn test_empty_key_is_idle() {
        let resource = resource("");
        let state = resource.state();

        assert_eq!(state.status, LoadStatus::Idle);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_set_same_key_does_not_restart() {
        let resource = resource("status");
        resource.settled().await;
        let generation = resource.inner.session().generation;

        resource.set_key("status");

        assert_eq!(resource.inner.session().generation, generation);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settled_returns_after_teardown() {
        let resource = resource("status");
        resource.teardown();

        let state = tokio::time::timeout(Duration::from_secs(1), resource.settled())
            .await
            .expect("settled must not hang after teardown");
        assert_eq!(state.key, "status");
    }
}
