//! Resumable chunked uploads for the Up2Share API.
//!
//! An upload is negotiated once (`POST files#resumable`, answered with `201`
//! and a `Location` header naming the session), then the byte source is sent
//! as ordered `Content-Range` PUTs to that location. The server answers each
//! chunk with `308` (send more) or `201` (upload finished).

mod error;
mod handler;
mod locator;
mod plan;
mod types;

pub use error::UploadError;
pub use handler::{ResumableUploadHandler, random_filename};
pub use locator::extract_key;
pub use plan::{ChunkPlan, ChunkRange};
pub use types::{Chunk, ChunkOutcome, UploadReport, UploadSession, UploadState};

/// Default chunk size: 5 MiB.
pub const DEFAULT_CHUNK_SIZE: u64 = 5 * 1024 * 1024;

/// Content type used when the caller does not name one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Endpoint that opens a resumable upload session.
///
/// The fragment never reaches the wire; the server sees `POST /files`.
pub const RESUMABLE_ENDPOINT: &str = "files#resumable";
