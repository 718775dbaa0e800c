//! Resumable upload handler.
//!
//! Drives the session protocol over any [`Transport`]: one initiation
//! request, then strictly sequential chunk PUTs. A chunk is read from the
//! source only after the previous chunk's outcome is known.

use std::io::SeekFrom;

use rand::Rng;
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncSeek, AsyncSeekExt};
use tracing::{debug, error, info, warn};
use up2share_transport::{Request, Transport};

use crate::locator::extract_key;
use crate::plan::{ChunkPlan, ChunkRange};
use crate::types::{Chunk, ChunkOutcome, UploadReport, UploadSession, UploadState};
use crate::{DEFAULT_CONTENT_TYPE, RESUMABLE_ENDPOINT, UploadError};

/// Random filename length in bytes (produces 32 hex characters).
const FILENAME_BYTES: usize = 16;

const STATUS_CREATED: u16 = 201;
const STATUS_RESUME_INCOMPLETE: u16 = 308;

#[derive(Serialize)]
struct InitiateBody<'a> {
    filename: &'a str,
}

/// Generates a collision-resistant filename as a 32-character hex string.
pub fn random_filename() -> String {
    let mut bytes = [0u8; FILENAME_BYTES];
    rand::thread_rng().fill(&mut bytes);
    hex::encode(bytes)
}

/// Uploads byte sources to the service in resumable chunks.
pub struct ResumableUploadHandler<T> {
    transport: T,
}

impl<T: Transport> ResumableUploadHandler<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Opens an upload session with the default content type.
    pub async fn initiate(
        &self,
        filename: &str,
        total_size: u64,
    ) -> Result<UploadSession, UploadError> {
        self.initiate_with_content_type(filename, total_size, DEFAULT_CONTENT_TYPE)
            .await
    }

    /// Opens an upload session.
    ///
    /// Only `201` counts as success; its `Location` header becomes the
    /// session URI.
    pub async fn initiate_with_content_type(
        &self,
        filename: &str,
        total_size: u64,
        content_type: &str,
    ) -> Result<UploadSession, UploadError> {
        let body = serde_json::to_vec(&InitiateBody { filename })?;
        let request = Request::post(RESUMABLE_ENDPOINT)
            .with_header("Content-Type", content_type)
            .with_header("X-Upload-Content-Length", total_size.to_string())
            .with_header("X-Upload-Content-Type", DEFAULT_CONTENT_TYPE)
            .with_body(body);

        let response = self
            .transport
            .request(request)
            .await
            .ok_or(UploadError::TransportUnavailable)?;

        if response.status() != STATUS_CREATED {
            return Err(UploadError::Initiation {
                status: response.status(),
            });
        }

        let session_uri = response
            .header("Location")
            .ok_or(UploadError::MissingLocation)?
            .to_string();
        debug!(%session_uri, "location URI");

        let session_key = extract_key(&session_uri);
        info!(key = ?session_key, filename, total_size, "resumable upload initiated");

        Ok(UploadSession {
            session_uri,
            session_key,
            total_size,
            filename: filename.to_string(),
            content_type: content_type.to_string(),
        })
    }

    /// Sends one chunk (`chunk_start..=chunk_end`) to the session URI.
    ///
    /// `201` completes the upload, `308` asks for more, anything else is a
    /// [`UploadError::Chunk`]. The range is validated before sending.
    pub async fn upload_chunk(
        &self,
        session_uri: &str,
        total_size: u64,
        chunk_data: &[u8],
        chunk_start: u64,
        chunk_end: u64,
    ) -> Result<ChunkOutcome, UploadError> {
        let range = ChunkRange {
            start: chunk_start,
            end: chunk_end,
        };
        let valid = chunk_start <= chunk_end
            && chunk_end < total_size
            && chunk_data.len() as u64 == range.len();
        if !valid {
            return Err(UploadError::InvalidRange {
                start: chunk_start,
                end: chunk_end,
                total: total_size,
                len: chunk_data.len(),
            });
        }

        info!(
            start = chunk_start,
            end = chunk_end,
            total = total_size,
            "uploading chunk"
        );

        let request = Request::put(session_uri)
            .with_header("Content-Range", range.content_range(total_size))
            .with_header("Content-Type", DEFAULT_CONTENT_TYPE)
            .with_header("Content-Length", range.len().to_string())
            .with_body(chunk_data.to_vec());

        let response = self
            .transport
            .request(request)
            .await
            .ok_or(UploadError::TransportUnavailable)?;

        let status = response.status();
        info!(status, "chunk response");
        debug!(headers = ?response.headers(), body = %response.text(), "chunk response details");

        match status {
            STATUS_CREATED => Ok(ChunkOutcome::Completed(response.into_headers())),
            STATUS_RESUME_INCOMPLETE => Ok(ChunkOutcome::InProgress),
            _ => {
                let body = response.text();
                error!(status, %body, "chunk rejected");
                Err(UploadError::Chunk { status, body })
            }
        }
    }

    /// Uploads an entire byte source.
    ///
    /// The source length is found by seeking to the end; the source is then
    /// rewound and read sequentially. It is borrowed, never closed. Without a
    /// `filename`, or with an empty one, a random one is generated.
    ///
    /// A `201` before the final chunk is reported as
    /// [`UploadError::PrematureCompletion`]. A `308` on the final chunk is
    /// returned as-is; see [`UploadReport::is_confirmed`].
    pub async fn drive_upload<R>(
        &self,
        source: &mut R,
        chunk_size: u64,
        filename: Option<&str>,
    ) -> Result<UploadReport, UploadError>
    where
        R: AsyncRead + AsyncSeek + Unpin + ?Sized,
    {
        let mut state = StateTracker::new();
        let mut result = self.drive(&mut state, source, chunk_size, filename).await;

        match &mut result {
            Ok(report) => {
                state.advance(UploadState::Completed);
                report.state = state.current();
                info!(
                    chunks = report.chunks_sent,
                    bytes = report.bytes_sent,
                    confirmed = report.is_confirmed(),
                    "resumable upload completed"
                );
            }
            Err(e) => {
                if state.current() != UploadState::NotStarted {
                    state.advance(UploadState::Failed);
                }
                error!(error = %e, "resumable upload failed");
            }
        }

        result
    }

    async fn drive<R>(
        &self,
        state: &mut StateTracker,
        source: &mut R,
        chunk_size: u64,
        filename: Option<&str>,
    ) -> Result<UploadReport, UploadError>
    where
        R: AsyncRead + AsyncSeek + Unpin + ?Sized,
    {
        if chunk_size == 0 {
            return Err(UploadError::InvalidChunkSize);
        }

        let total_size = source.seek(SeekFrom::End(0)).await?;
        source.seek(SeekFrom::Start(0)).await?;
        info!(total_size, "total file size");

        if total_size == 0 {
            return Err(UploadError::EmptySource);
        }

        let filename = match filename.filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None => random_filename(),
        };

        state.advance(UploadState::Initiating);
        let session = self.initiate(&filename, total_size).await?;

        state.advance(UploadState::Uploading);
        let mut outcome = ChunkOutcome::InProgress;
        let mut chunks_sent = 0u64;
        let mut bytes_sent = 0u64;

        for range in ChunkPlan::new(total_size, chunk_size)? {
            let chunk = Chunk::read_from(source, range).await?;
            outcome = self
                .upload_chunk(
                    &session.session_uri,
                    total_size,
                    &chunk.data,
                    chunk.start,
                    chunk.end,
                )
                .await?;
            chunks_sent += 1;
            bytes_sent += range.len();

            if outcome.is_completed() && range.end + 1 < total_size {
                return Err(UploadError::PrematureCompletion {
                    end: range.end,
                    total: total_size,
                });
            }
        }

        if !outcome.is_completed() {
            warn!(
                session_uri = %session.session_uri,
                "all bytes sent but server did not confirm completion"
            );
        }

        Ok(UploadReport {
            session,
            state: state.current(),
            outcome,
            chunks_sent,
            bytes_sent,
        })
    }
}

/// Tracks and logs state transitions for one upload attempt.
struct StateTracker {
    state: UploadState,
}

impl StateTracker {
    fn new() -> Self {
        Self {
            state: UploadState::NotStarted,
        }
    }

    fn current(&self) -> UploadState {
        self.state
    }

    fn advance(&mut self, next: UploadState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal upload transition {} -> {}",
            self.state,
            next
        );
        debug!(from = %self.state, to = %next, "upload state");
        self.state = next;
    }
}
