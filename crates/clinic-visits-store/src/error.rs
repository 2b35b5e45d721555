use std::time::Duration;

use clinic_visits_core::ValidationError;
use thiserror::Error;

/// Errors talking to the remote store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The request never completed
    #[error("Network error: {0}")]
    Network(String),

    /// The deadline passed and the request was aborted
    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The request completed but the store reported failure
    #[error("Store error: {0}")]
    Remote(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The response body was not a valid envelope
    #[error("Malformed store response: {0}")]
    Decode(String),

    #[error("Remote store is not configured")]
    NotConfigured,
}

impl StoreError {
    /// Failures that warrant the one-shot fallback transport.
    pub fn is_transport(&self) -> bool {
        matches!(self, StoreError::Network(_) | StoreError::Timeout(_))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
