//! The Chunk type - a fully read, delimiter-aligned chunk.

use bytes::Bytes;
use std::fmt;

use super::ChunkHash;

/// A materialised chunk: its bytes, where it starts in the stream, and an
/// optional content hash.
///
/// Produced by [`Chunker::chunk_bytes`](crate::Chunker::chunk_bytes) and
/// [`ChunkReader::read_to_chunk`](crate::ChunkReader::read_to_chunk).
///
/// # Example
///
/// ```
/// use delimchunk::Chunk;
/// use bytes::Bytes;
///
/// let chunk = Chunk::new(Bytes::from_static(b"a,b\n"), 120);
///
/// assert_eq!(chunk.len(), 4);
/// assert_eq!(chunk.range(), 120..124);
/// assert!(chunk.ends_with(b"\n"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// The chunk bytes.
    pub data: Bytes,

    /// Absolute offset of the first byte in the source stream.
    pub offset: u64,

    /// The content hash of this chunk (if computed).
    pub hash: Option<ChunkHash>,
}

impl Chunk {
    /// Creates a chunk without a hash.
    pub fn new(data: impl Into<Bytes>, offset: u64) -> Self {
        Self {
            data: data.into(),
            offset,
            hash: None,
        }
    }

    /// Attaches a hash.
    pub fn with_hash(mut self, hash: ChunkHash) -> Self {
        self.hash = Some(hash);
        self
    }

    /// Returns the length of the chunk data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the chunk has no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns true if the chunk ends with `delimiter`.
    ///
    /// Holds for every chunk of a sequence except possibly the last.
    pub fn ends_with(&self, delimiter: &[u8]) -> bool {
        self.data.ends_with(delimiter)
    }

    /// Returns the end offset (exclusive).
    pub fn end(&self) -> u64 {
        self.offset + self.data.len() as u64
    }

    /// Returns the stream range covered by the chunk.
    pub fn range(&self) -> std::ops::Range<u64> {
        self.offset..self.end()
    }

    /// Consumes the chunk and returns the underlying data.
    pub fn into_data(self) -> Bytes {
        self.data
    }

    /// Splits the chunk into (data, hash).
    pub fn into_parts(self) -> (Bytes, Option<ChunkHash>) {
        (self.data, self.hash)
    }
}

impl AsRef<[u8]> for Chunk {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chunk({} bytes @ {}", self.len(), self.offset)?;
        if let Some(hash) = self.hash {
            write!(f, ", hash={}", hash)?;
        }
        write!(f, ")")
    }
}
