//! Error types for scene operations.
//!
//! Invalid-target conditions (locked, missing, or type-mismatched drawables)
//! are silent no-ops at the controller level, not errors; the error type only
//! covers genuinely exceptional failures.

use thiserror::Error;

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Errors that can occur while working with a scene.
#[derive(Debug, Error)]
pub enum SceneError {
    /// Scene serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
