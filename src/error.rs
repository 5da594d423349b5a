use thiserror::Error;

/// Errors surfaced by editor operations.
///
/// `IoFailure` is the only variant shown to the user as a modal message;
/// the others are refused operations that callers treat as no-ops.
#[derive(Debug, Error)]
pub enum EditorError {
    /// A file could not be opened, decoded, or written.
    #[error("file operation failed: {0}")]
    IoFailure(#[from] image::ImageError),

    /// The operation is not allowed in the current state
    /// (e.g. deleting the last layer, index out of range).
    #[error("invalid operation: {0}")]
    InvalidOperation(&'static str),

    /// The canvas has not been realized yet, so there is nothing to capture.
    #[error("canvas is not realized yet")]
    CaptureUnavailable,
}
