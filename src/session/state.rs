//! Resource State
//!
//! Snapshot of what a consumer sees for its requested key.

use std::sync::Arc;

// == Load Status ==
/// Lifecycle of a single consumer's request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// No key requested
    Idle,
    /// Fetch in flight
    Loading,
    /// Data populated, error cleared
    Success,
    /// Error populated, data cleared
    Failed,
}

// == Resource State ==
/// Data, loading flag and error message for one consumer.
#[derive(Debug)]
pub struct ResourceState<T> {
    /// Key this state belongs to
    pub key: String,
    pub status: LoadStatus,
    /// Last successfully loaded document
    pub data: Option<Arc<T>>,
    /// True while a fetch is in flight
    pub loading: bool,
    /// Message of the last failure
    pub error: Option<String>,
}

impl<T> ResourceState<T> {
    /// State for a consumer with no key.
    pub fn idle(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            status: LoadStatus::Idle,
            data: None,
            loading: false,
            error: None,
        }
    }

    /// True once no fetch is in flight.
    pub fn is_settled(&self) -> bool {
        !self.loading
    }

    pub(crate) fn begin_loading(&mut self, key: &str, keep_data: bool) {
        if !keep_data {
            self.data = None;
        }
        self.key = key.to_string();
        self.status = LoadStatus::Loading;
        self.loading = true;
        self.error = None;
    }

    pub(crate) fn succeed(&mut self, data: T) {
        self.status = LoadStatus::Success;
        self.data = Some(Arc::new(data));
        self.loading = false;
        self.error = None;
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.status = LoadStatus::Failed;
        self.data = None;
        self.loading = false;
        self.error = Some(message);
    }
}

// Manual impl: cloning shares the Arc, so T need not be Clone.
impl<T> Clone for ResourceState<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            status: self.status,
            data: self.data.clone(),
            loading: self.loading,
            error: self.error.clone(),
        }
    }
}
