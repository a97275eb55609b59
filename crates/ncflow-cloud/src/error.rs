//! Cloud provider error types

use std::time::Duration;
use thiserror::Error;

/// Boxed error returned by a refresh accessor
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Cloud provider errors
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("State file error: {0}")]
    StateError(String),

    #[error("Lock acquisition failed: {0}")]
    LockError(String),

    /// The refresh accessor failed while waiting on a resource
    #[error("Error refreshing {resource} ({id}): {source}")]
    Refresh {
        resource: String,
        id: String,
        #[source]
        source: BoxError,
    },

    /// Neither the target state nor a not-found condition was observed in time
    #[error(
        "Timeout while waiting for {resource} ({id}) to become {target} \
         (last state: {last_state}, elapsed: {elapsed:?})"
    )]
    WaitTimeout {
        resource: String,
        id: String,
        target: String,
        last_state: String,
        elapsed: Duration,
    },

    /// Only raised by strict waits
    #[error("Unexpected state '{state}' for {resource} ({id}), wanted {target}")]
    UnexpectedState {
        resource: String,
        id: String,
        state: String,
        target: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CloudError {
    /// Whether this error means the remote object is gone
    pub fn is_not_found(&self) -> bool {
        matches!(self, CloudError::ResourceNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;
