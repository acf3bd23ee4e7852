//! Error types for editing operations.

use crate::elements::ElementId;
use thiserror::Error;

/// Errors surfaced to callers of the editor.
///
/// Geometry problems and stale ids from async completions are absorbed and
/// never show up here.
#[derive(Debug, Error)]
pub enum EditError {
    #[error("element {0} already exists on this slide")]
    DuplicateElement(ElementId),

    #[error("slide index {index} out of range (deck has {len} slides)")]
    SlideOutOfRange { index: usize, len: usize },

    #[error("a gesture is already active")]
    GestureActive,

    #[error("no gesture is active")]
    NoActiveGesture,

    #[error("element {0} not found")]
    ElementNotFound(ElementId),

    #[error("a deck must keep at least one slide")]
    LastSlide,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for editing operations.
pub type EditResult<T> = Result<T, EditError>;

/// Errors from loading an [`EditorConfig`](crate::config::EditorConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
