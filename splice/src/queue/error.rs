//! Queue error types

use thiserror::Error;

/// Errors that can occur while reading the merge queue
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Queue endpoint returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid queue payload: {0}")]
    Json(#[from] serde_json::Error),
}
