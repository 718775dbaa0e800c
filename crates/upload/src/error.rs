//! Upload error types.

/// Errors that abort a resumable upload.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("no response from server")]
    TransportUnavailable,

    #[error("failed to initiate resumable upload, status code: {status}")]
    Initiation { status: u16 },

    #[error("upload session response has no Location header")]
    MissingLocation,

    #[error("failed to upload chunk, status code: {status}: {body}")]
    Chunk { status: u16, body: String },

    #[error("server completed the upload after byte {end} of {total}")]
    PrematureCompletion { end: u64, total: u64 },

    #[error("invalid chunk {start}-{end}/{total} with {len} bytes of data")]
    InvalidRange {
        start: u64,
        end: u64,
        total: u64,
        len: usize,
    },

    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,

    #[error("byte source is empty")]
    EmptySource,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl UploadError {
    /// HTTP status code carried by the error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Initiation { status } | Self::Chunk { status, .. } => Some(*status),
            _ => None,
        }
    }
}
