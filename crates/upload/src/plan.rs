//! Chunk boundary planning.

use crate::UploadError;

/// Inclusive byte range of one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRange {
    pub start: u64,
    pub end: u64,
}

impl ChunkRange {
    /// Number of bytes covered. Zero when `start > end`.
    pub fn len(&self) -> u64 {
        self.end
            .checked_sub(self.start)
            .map_or(0, |span| span.saturating_add(1))
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// `Content-Range` header value for this chunk.
    pub fn content_range(&self, total_size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, total_size)
    }
}

/// Iterator over the chunk ranges covering `[0, total_size - 1]`.
///
/// Ranges are contiguous and ascending; every one except possibly the last
/// is exactly `chunk_size` bytes.
#[derive(Debug, Clone)]
pub struct ChunkPlan {
    cursor: u64,
    total_size: u64,
    chunk_size: u64,
}

impl ChunkPlan {
    /// Plans chunks for `total_size` bytes. A zero `chunk_size` is rejected.
    pub fn new(total_size: u64, chunk_size: u64) -> Result<Self, UploadError> {
        if chunk_size == 0 {
            return Err(UploadError::InvalidChunkSize);
        }
        Ok(Self {
            cursor: 0,
            total_size,
            chunk_size,
        })
    }

    /// Offset of the next byte to be planned.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Bytes not yet covered by a returned range.
    pub fn remaining(&self) -> u64 {
        self.total_size - self.cursor
    }
}

impl Iterator for ChunkPlan {
    type Item = ChunkRange;

    fn next(&mut self) -> Option<ChunkRange> {
        if self.cursor >= self.total_size {
            return None;
        }
        let start = self.cursor;
        let end = start
            .saturating_add(self.chunk_size - 1)
            .min(self.total_size - 1);
        self.cursor = end + 1;
        Some(ChunkRange { start, end })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining().div_ceil(self.chunk_size);
        let n = usize::try_from(n).unwrap_or(usize::MAX);
        (n, Some(n))
    }
}

impl ExactSizeIterator for ChunkPlan {}
