//! Chunker - configuration holder and entry point.
//!
//! - [`Chunker::chunk`] - Opens a [`ChunkSequencer`] over any [`Read`] source
//! - [`Chunker::chunk_bytes`] - Segments a buffer already in memory
//!
//! Both paths place boundaries identically: a chunk ends right after the
//! first delimiter that starts at or after position `limit - 1`.
//!
//! # Example
//!
//! ```
//! use delimchunk::{ChunkConfig, Chunker};
//! use bytes::Bytes;
//!
//! let config = ChunkConfig::new(6, &b"5"[..], 4096)?;
//! let chunks = Chunker::new(config).chunk_bytes(Bytes::from_static(b"0123456789"))?;
//!
//! assert_eq!(chunks.len(), 2);
//! assert_eq!(&chunks[0].data[..], b"012345");
//! assert_eq!(&chunks[1].data[..], b"6789");
//! # Ok::<(), delimchunk::ChunkError>(())
//! ```

use std::io::Read;

use bytes::Bytes;
use log::debug;

use super::ChunkSequencer;
use crate::boundary::BoundarySearch;
use crate::chunk::{Chunk, ChunkHash};
use crate::config::{ChunkConfig, DelimiterPolicy, EmptySourcePolicy};
use crate::error::ChunkError;

/// Splits byte streams into delimiter-aligned chunks.
///
/// `Chunker` holds a configuration and hands out chunk sequences. It is
/// cheap to clone and can be reused for any number of sources.
///
/// # Example
///
/// ```
/// use delimchunk::Chunker;
/// use std::io::Cursor;
///
/// let mut chunks = Chunker::default().chunk(Cursor::new(b"one\ntwo\n"))?;
/// let only = chunks.next_chunk()?.unwrap().read_to_chunk()?;
/// assert_eq!(&only.data[..], b"one\ntwo\n");
/// assert!(chunks.next_chunk()?.is_none());
/// # Ok::<(), delimchunk::ChunkError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Chunker {
    config: ChunkConfig,
}

impl Chunker {
    /// Creates a new chunker with the given configuration.
    ///
    /// The configuration is validated when a source is chunked.
    pub fn new(config: ChunkConfig) -> Self {
        Self { config }
    }

    /// Opens a chunk sequence over `source`.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if the configuration is invalid.
    pub fn chunk<R: Read>(self, source: R) -> Result<ChunkSequencer<R>, ChunkError> {
        self.config.validate()?;
        debug!(
            "chunking with limit {} delimiter {:?} buffer {}",
            self.config.limit(),
            self.config.delimiter(),
            self.config.buffer_size()
        );
        Ok(ChunkSequencer::new(source, self.config))
    }

    /// Chunks an in-memory buffer.
    ///
    /// Every returned chunk is a zero-copy slice of `data`. The result is
    /// identical to draining [`Chunker::chunk`] over the same bytes.
    ///
    /// # Errors
    ///
    /// - [`ChunkError::InvalidConfig`] if the configuration is invalid.
    /// - [`ChunkError::DelimiterNotFound`] under [`DelimiterPolicy::Strict`]
    ///   if the data ends in an oversized chunk without a delimiter.
    pub fn chunk_bytes(&self, data: impl Into<Bytes>) -> Result<Vec<Chunk>, ChunkError> {
        self.config.validate()?;
        let data = data.into();
        let limit = self.config.limit();
        let delimiter = self.config.delimiter();

        if data.is_empty() {
            return Ok(match self.config.empty_source_policy() {
                EmptySourcePolicy::SingleEmptyChunk => vec![self.create_chunk(data, 0)],
                EmptySourcePolicy::NoChunks => Vec::new(),
            });
        }

        let mut chunks = Vec::new();
        let mut start = 0usize;

        while start < data.len() {
            let rest = &data[start..];
            let len = match BoundarySearch::new(limit).search(delimiter, rest, 0) {
                Some(len) => len,
                None if self.config.delimiter_policy() == DelimiterPolicy::Strict
                    && rest.len() > limit =>
                {
                    return Err(ChunkError::DelimiterNotFound {
                        offset: start as u64,
                        limit,
                    });
                }
                None => rest.len(),
            };

            chunks.push(self.create_chunk(data.slice(start..start + len), start as u64));
            start += len;
        }

        Ok(chunks)
    }

    /// Returns the configuration used by this chunker.
    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    fn create_chunk(&self, data: Bytes, offset: u64) -> Chunk {
        let hash = self.compute_hash(&data);
        Chunk { data, offset, hash }
    }

    /// Computes hash for the given data if hashing is enabled.
    fn compute_hash(&self, data: &[u8]) -> Option<ChunkHash> {
        if !self.config.hash_config().enabled {
            return None;
        }
        #[cfg(feature = "hash-blake3")]
        return Some(crate::hash::Blake3Hasher::hash(data));
        #[cfg(not(feature = "hash-blake3"))]
        return None;
    }
}

/// Opens a chunk sequence over `source` with the given configuration.
///
/// Shorthand for `Chunker::new(config).chunk(source)`.
pub fn chunk<R: Read>(source: R, config: ChunkConfig) -> Result<ChunkSequencer<R>, ChunkError> {
    Chunker::new(config).chunk(source)
}
