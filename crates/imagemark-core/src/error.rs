//! Error types.
//!
//! Board operations themselves never fail: unknown ids and missing
//! preconditions are no-ops. These types cover the fallible edges.

use thiserror::Error;

/// Configuration parse errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Reported by the host when the reference image could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageLoadError {
    #[error("Image not found: {0}")]
    NotFound(String),
    #[error("Image decode error: {0}")]
    Decode(String),
    #[error("Image has no size")]
    EmptyImage,
    #[error("Image load error: {0}")]
    Other(String),
}
