use tokio::io::{AsyncRead, AsyncReadExt};
use up2share_transport::header::{HeaderMap, LOCATION};

use crate::plan::ChunkRange;

/// A negotiated resumable upload session. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSession {
    /// Location returned by the server; chunks are PUT here.
    pub session_uri: String,
    /// `key` query parameter of `session_uri`, if the server included one.
    pub session_key: Option<String>,
    pub total_size: u64,
    pub filename: String,
    pub content_type: String,
}

/// A chunk of source data ready to send.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// First byte offset (inclusive).
    pub start: u64,
    /// Last byte offset (inclusive).
    pub end: u64,
    pub data: Vec<u8>,
}

impl Chunk {
    /// Reads exactly `range.len()` bytes from the current position of `source`.
    pub async fn read_from<R>(source: &mut R, range: ChunkRange) -> std::io::Result<Self>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let len = usize::try_from(range.len()).map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("chunk of {} bytes does not fit in memory", range.len()),
            )
        })?;
        let mut data = vec![0u8; len];
        source.read_exact(&mut data).await?;
        Ok(Self {
            start: range.start,
            end: range.end,
            data,
        })
    }

    pub fn range(&self) -> ChunkRange {
        ChunkRange {
            start: self.start,
            end: self.end,
        }
    }
}

/// Server verdict on one accepted chunk.
///
/// Rejected chunks are reported as [`UploadError::Chunk`](crate::UploadError::Chunk).
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkOutcome {
    /// `201`: the resource is complete. Carries the response headers.
    Completed(HeaderMap),
    /// `308`: chunk accepted, more data expected.
    InProgress,
}

impl ChunkOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Response headers of a completed upload.
    pub fn headers(&self) -> Option<&HeaderMap> {
        match self {
            Self::Completed(headers) => Some(headers),
            Self::InProgress => None,
        }
    }

    /// Final `Location` of a completed upload, if the server sent one.
    pub fn location(&self) -> Option<&str> {
        self.headers()?.get(LOCATION)?.to_str().ok()
    }
}

/// Lifecycle of one upload attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    NotStarted,
    Initiating,
    Uploading,
    Completed,
    Failed,
}

impl UploadState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Whether `self -> next` is a legal transition.
    ///
    /// `Failed` is reachable from any non-terminal state after `NotStarted`.
    pub fn can_transition_to(self, next: UploadState) -> bool {
        use UploadState::*;
        matches!(
            (self, next),
            (NotStarted, Initiating)
                | (Initiating, Uploading)
                | (Uploading, Completed)
                | (Initiating | Uploading, Failed)
        )
    }
}

impl std::fmt::Display for UploadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NotStarted => "not_started",
            Self::Initiating => "initiating",
            Self::Uploading => "uploading",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Result of a successful [`drive_upload`](crate::ResumableUploadHandler::drive_upload).
#[derive(Debug, Clone)]
pub struct UploadReport {
    pub session: UploadSession,
    /// Final state of the attempt. `Completed` means every byte was accepted;
    /// see [`is_confirmed`](Self::is_confirmed) for the server's verdict.
    pub state: UploadState,
    /// Outcome of the final chunk.
    pub outcome: ChunkOutcome,
    pub chunks_sent: u64,
    pub bytes_sent: u64,
}

impl UploadReport {
    /// `true` when the server answered the final chunk with `201`.
    pub fn is_confirmed(&self) -> bool {
        self.outcome.is_completed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use up2share_transport::header::HeaderValue;

    #[test]
    fn legal_transitions() {
        use UploadState::*;
        assert!(NotStarted.can_transition_to(Initiating));
        assert!(Initiating.can_transition_to(Uploading));
        assert!(Uploading.can_transition_to(Completed));
        assert!(Initiating.can_transition_to(Failed));
        assert!(Uploading.can_transition_to(Failed));
    }

    #[test]
    fn illegal_transitions() {
        use UploadState::*;
        assert!(!NotStarted.can_transition_to(Uploading));
        assert!(!NotStarted.can_transition_to(Failed));
        assert!(!Initiating.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Uploading));
        assert!(!Completed.can_transition_to(Initiating));
    }

    #[test]
    fn terminal_states() {
        assert!(UploadState::Completed.is_terminal());
        assert!(UploadState::Failed.is_terminal());
        assert!(!UploadState::Uploading.is_terminal());
    }

    #[test]
    fn outcome_accessors() {
        let mut headers = HeaderMap::new();
        headers.insert(LOCATION, HeaderValue::from_static("/files/42"));
        let done = ChunkOutcome::Completed(headers);
        assert!(done.is_completed());
        assert_eq!(done.location(), Some("/files/42"));

        let empty = ChunkOutcome::Completed(HeaderMap::new());
        assert!(empty.is_completed());
        assert!(empty.headers().unwrap().is_empty());
        assert_eq!(empty.location(), None);

        assert!(!ChunkOutcome::InProgress.is_completed());
        assert!(ChunkOutcome::InProgress.headers().is_none());
    }

    #[tokio::test]
    async fn chunk_reads_exact_range() {
        let mut source = std::io::Cursor::new(b"0123456789".to_vec());
        let first = Chunk::read_from(&mut source, ChunkRange { start: 0, end: 3 })
            .await
            .unwrap();
        let second = Chunk::read_from(&mut source, ChunkRange { start: 4, end: 5 })
            .await
            .unwrap();
        assert_eq!(first.data, b"0123");
        assert_eq!(second.data, b"45");
        assert_eq!(second.range(), ChunkRange { start: 4, end: 5 });
    }

    #[tokio::test]
    async fn chunk_short_read_fails() {
        let mut source = std::io::Cursor::new(b"abc".to_vec());
        let err = Chunk::read_from(&mut source, ChunkRange { start: 0, end: 9 })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    }
}
