//! Error types for worksheet storage.

use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while talking to a worksheet store.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StoreError {
    /// The request never got an HTTP answer.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The store answered with a non-success status.
    #[error("Store returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// The response body was not what the API documents.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// An access token could not be obtained.
    #[error("Authorization error: {0}")]
    Auth(String),

    /// The store is misconfigured.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Whether retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            StoreError::Transport(_) => true,
            StoreError::Status { status, .. } => *status == 429 || *status >= 500,
            StoreError::Decode(_) | StoreError::Auth(_) | StoreError::Config(_) => false,
        }
    }

    /// Creates a configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        StoreError::Config(message.into())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            StoreError::Decode(e.to_string())
        } else {
            StoreError::Transport(e.to_string())
        }
    }
}
