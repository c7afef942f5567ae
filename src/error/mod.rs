//! Error types for delimchunk.

use std::io;

use thiserror::Error;

/// Errors that can occur while sequencing or reading chunks.
#[derive(Debug, Error)]
pub enum ChunkError {
    /// An I/O error occurred while pulling from the source.
    ///
    /// Passed through unchanged; the source decides whether it is transient.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// The source ran out before a delimiter closed an oversized chunk.
    ///
    /// Only raised under [`DelimiterPolicy::Strict`](crate::DelimiterPolicy::Strict).
    #[error("no delimiter found past limit {limit} for chunk starting at offset {offset}")]
    DelimiterNotFound {
        /// Absolute stream offset where the unaligned chunk starts.
        offset: u64,
        /// The configured chunk limit.
        limit: usize,
    },

    /// The next chunk was requested before the current one was drained.
    #[error("chunk {index} not drained ({delivered} bytes delivered) before next chunk was requested")]
    SequencingViolation {
        /// Zero-based index of the chunk that is still open.
        index: u64,
        /// Bytes the open chunk had delivered so far.
        delivered: usize,
    },
}

impl From<ChunkError> for io::Error {
    fn from(e: ChunkError) -> Self {
        match e {
            ChunkError::Io(e) => e,
            ChunkError::InvalidConfig { .. } => io::Error::new(io::ErrorKind::InvalidInput, e),
            ChunkError::DelimiterNotFound { .. } => io::Error::new(io::ErrorKind::InvalidData, e),
            ChunkError::SequencingViolation { .. } => io::Error::other(e),
        }
    }
}
