//! Error types for quickcap.

use thiserror::Error;

use crate::validate::FieldErrors;

/// Errors that can occur in quickcap operations.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// Field-level problems found by the form validator. Never sent to a backend.
    #[error("Invalid item: {0}")]
    Validation(FieldErrors),

    /// Backend unreachable or answered with a non-2xx status.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Malformed import payload or share link.
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Item not found: {0}")]
    NotFound(String),

    /// A record that breaks an item invariant (e.g. a task without effort).
    #[error("Invalid item record: {0}")]
    InvalidItem(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for CaptureError {
    fn from(err: reqwest::Error) -> Self {
        CaptureError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for CaptureError {
    fn from(err: serde_json::Error) -> Self {
        CaptureError::Serialization(err.to_string())
    }
}

/// Result type alias for quickcap operations.
pub type CaptureResult<T> = Result<T, CaptureError>;
