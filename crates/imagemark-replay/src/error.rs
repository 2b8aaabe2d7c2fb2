//! Replay errors.

use thiserror::Error;

/// Errors from loading or replaying a scene.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Usage: imagemark-replay <scene.json>")]
    Usage,
}

/// Result type for replay operations.
pub type ReplayResult<T> = Result<T, ReplayError>;
