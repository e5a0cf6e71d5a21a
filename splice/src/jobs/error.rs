//! Job backend error types

use thiserror::Error;

/// Errors that can occur talking to the job backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Job backend returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid job backend response: {0}")]
    Json(#[from] serde_json::Error),
}
