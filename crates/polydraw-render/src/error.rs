//! Error types for the raster backend.

use thiserror::Error;

/// Raster backend errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Cannot allocate a {width}x{height} surface")]
    SurfaceAlloc { width: u32, height: u32 },
    #[error("PNG error: {0}")]
    Png(String),
    #[error("Font error: {0}")]
    Font(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for raster backend operations.
pub type RenderResult<T> = Result<T, RenderError>;

impl From<png::EncodingError> for RenderError {
    fn from(err: png::EncodingError) -> Self {
        RenderError::Png(err.to_string())
    }
}

impl From<png::DecodingError> for RenderError {
    fn from(err: png::DecodingError) -> Self {
        RenderError::Png(err.to_string())
    }
}
