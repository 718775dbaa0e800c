//! Error types for file management operations.

/// Errors produced by file management calls.
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    #[error("no response from server")]
    TransportUnavailable,

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
