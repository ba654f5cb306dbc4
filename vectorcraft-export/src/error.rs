//! Export error types.

use thiserror::Error;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur during export or image input.
#[derive(Debug, Error)]
pub enum ExportError {
    /// SVG assembly or rasterization failed.
    #[error("SVG rendering failed: {0}")]
    Svg(String),

    /// Raster encoding failed.
    #[error("Encoding failed: {0}")]
    Encode(String),

    /// Image input could not be decoded.
    #[error("Failed to decode image input: {0}")]
    Decode(String),

    /// Drawable not found in scene.
    #[error("Drawable not found: {0}")]
    NotFound(String),

    /// Snapshot serialization failed.
    #[error("Snapshot serialization failed: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// File output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
