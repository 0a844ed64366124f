//! Error types for the editor core.

use thiserror::Error;

/// Errors raised by the editor core.
///
/// Drawing and history operations never fail; these only surface from
/// configuration, image wrapping and explicit tool settings.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Invalid image buffer: expected {expected} bytes, got {actual}")]
    InvalidImage { expected: usize, actual: usize },
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;
