//! Error types for the data layer
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Data Error Enum ==
/// Unified error type for data sources, the retry orchestrator and
/// request sessions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    /// The backend reported that the resource does not exist
    #[error("Resource not found: {key}.json ({status})")]
    NotFound {
        /// Logical key that was requested
        key: String,
        /// Status code reported by the backend
        status: u16,
    },

    /// The selected backend cannot serve requests
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Connection failure or unparseable payload
    #[error("{message}")]
    Transport {
        /// Logical key that was requested
        key: String,
        /// Underlying failure description
        message: String,
    },

    /// Payload parsed as JSON but does not match the expected shape
    #[error("Malformed payload for {key}: {message}")]
    MalformedPayload {
        /// Logical key that was requested
        key: String,
        /// Deserializer message
        message: String,
    },

    /// Logical key rejected before any transport call
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Request was cancelled before it finished
    #[error("Request cancelled: {0}")]
    Cancelled(String),
}

impl DataError {
    // == Constructors ==
    /// Creates a transport error for the given key.
    pub fn transport(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates a not-found error carrying the backend status code.
    pub fn not_found(key: impl Into<String>, status: u16) -> Self {
        Self::NotFound {
            key: key.into(),
            status,
        }
    }

    // == Classification ==
    /// Returns true for failures that a later attempt might not hit again.
    pub fn is_transient(&self) -> bool {
        matches!(self, DataError::Transport { .. })
    }

    /// Returns true if the error only signals a superseded request.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DataError::Cancelled(_))
    }

    // == User Message ==
    /// Message shown to a consumer for this error.
    ///
    /// Uses the error's own message when it has one, otherwise a generic
    /// "failed to load" message naming the key.
    pub fn user_message(&self, key: &str) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            format!("failed to load {}", key)
        } else {
            message
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the data layer.
pub type Result<T> = std::result::Result<T, DataError>;
