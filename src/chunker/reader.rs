//! Bounded reader over a single chunk.
//!
//! A [`ChunkReader`] hands out the bytes of one chunk in whatever request
//! sizes the caller picks. It pulls from the source only when the bytes it
//! already holds cannot satisfy a request, and it resolves the chunk boundary
//! lazily: the delimiter search runs over each pull as it arrives, never over
//! the whole chunk up front.
//!
//! Reads follow a strict short-read rule. A read returns exactly the requested
//! size while the chunk has that much left; the first read that cannot be
//! satisfied in full returns what is left and closes the chunk, and every
//! read after that returns nothing.

use std::io::{self, Read};

use bytes::{Bytes, BytesMut};
use log::{debug, trace};

use crate::boundary::BoundarySearch;
use crate::buffer::BufferedPuller;
use crate::chunk::{Chunk, ChunkHash};
use crate::config::{ChunkConfig, DelimiterPolicy};
use crate::error::ChunkError;

#[cfg(feature = "hash-blake3")]
use crate::hash::Blake3Hasher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Open,
    Ended,
    /// Strict policy found no delimiter before the source ran out.
    Failed,
}

/// Everything one chunk owns. Lives inside the sequencer so it survives the
/// borrow held by its [`ChunkReader`].
#[derive(Debug)]
pub(crate) struct ChunkState {
    index: u64,
    offset: u64,
    limit: usize,
    /// Pulled but undelivered bytes, starting at chunk position `delivered`.
    remainder: BytesMut,
    delivered: usize,
    search: BoundarySearch,
    /// Chunk length, once known.
    boundary: Option<usize>,
    phase: Phase,
    #[cfg(feature = "hash-blake3")]
    hasher: Option<Blake3Hasher>,
    hash: Option<ChunkHash>,
}

impl ChunkState {
    /// Opens chunk `index` at stream `offset`, seeded with the previous
    /// chunk's remainder.
    pub(crate) fn new(index: u64, offset: u64, config: &ChunkConfig, seed: BytesMut) -> Self {
        trace!(
            "chunk {} opened at offset {} with {} carried bytes",
            index,
            offset,
            seed.len()
        );

        #[cfg(feature = "hash-blake3")]
        let hasher = config.hash_config().enabled.then(Blake3Hasher::new);

        Self {
            index,
            offset,
            limit: config.limit(),
            remainder: seed,
            delivered: 0,
            search: BoundarySearch::new(config.limit()),
            boundary: None,
            phase: Phase::Open,
            #[cfg(feature = "hash-blake3")]
            hasher,
            hash: None,
        }
    }

    pub(crate) fn index(&self) -> u64 {
        self.index
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn delivered(&self) -> usize {
        self.delivered
    }

    /// Stream offset just past the bytes delivered so far.
    pub(crate) fn end_offset(&self) -> u64 {
        self.offset + self.delivered as u64
    }

    /// Hands the undelivered bytes over to the next chunk.
    pub(crate) fn into_remainder(self) -> BytesMut {
        self.remainder
    }

    pub(crate) fn failure(&self) -> ChunkError {
        ChunkError::DelimiterNotFound {
            offset: self.offset,
            limit: self.limit,
        }
    }

    /// Runs the delimiter search over whatever arrived since the last call.
    fn scan(&mut self, config: &ChunkConfig) {
        if self.boundary.is_some() {
            return;
        }
        self.boundary = self
            .search
            .search(config.delimiter(), &self.remainder, self.delivered);
        if let Some(len) = self.boundary {
            debug!(
                "chunk {} boundary at {} bytes (offset {})",
                self.index,
                len,
                self.offset + len as u64
            );
        }
    }

    /// Bytes that can be delivered without passing the boundary.
    ///
    /// Before the boundary is known, bytes from the search cursor onward are
    /// held back: they may be the head of a delimiter still arriving.
    fn available(&self) -> usize {
        let pulled = self.delivered + self.remainder.len();
        let end = match self.boundary {
            Some(len) => len,
            None => self.search.cursor().min(pulled),
        };
        end - self.delivered
    }

    /// The source is exhausted and no delimiter was found past the limit.
    fn close_at_exhaustion(&mut self, policy: DelimiterPolicy) -> Result<(), ChunkError> {
        let len = self.delivered + self.remainder.len();
        if policy == DelimiterPolicy::Strict && len > self.limit {
            self.phase = Phase::Failed;
            return Err(self.failure());
        }
        debug!(
            "chunk {} absorbs the rest of the source ({} bytes)",
            self.index, len
        );
        self.boundary = Some(len);
        Ok(())
    }

    fn consume(&mut self, n: usize) -> Bytes {
        let data = self.remainder.split_to(n).freeze();
        self.delivered += n;

        #[cfg(feature = "hash-blake3")]
        if let Some(hasher) = self.hasher.as_mut() {
            hasher.update(&data);
            if self.phase == Phase::Ended {
                self.hash = Some(hasher.finalize());
            }
        }

        data
    }
}

/// A bounded, single-use reader over one chunk of the source.
///
/// Obtained from [`ChunkSequencer::next_chunk`](crate::ChunkSequencer::next_chunk).
/// The reader borrows the sequencer, so it must be dropped before the next
/// chunk is requested, and it must have been read to the end by then.
///
/// Besides [`read_bytes`](Self::read_bytes) the reader implements
/// [`std::io::Read`], so it plugs into `io::copy`, `read_to_end` and friends.
///
/// # Example
///
/// ```
/// use std::io::{Cursor, Read};
/// use delimchunk::{ChunkConfig, Chunker};
///
/// let config = ChunkConfig::new(6, &b"5"[..], 4)?;
/// let mut chunks = Chunker::new(config).chunk(Cursor::new(b"0123456789"))?;
///
/// let mut first = chunks.next_chunk()?.unwrap();
/// assert_eq!(&first.read_bytes(4)?[..], b"0123");
/// assert_eq!(&first.read_bytes(4)?[..], b"45");
/// assert!(first.read_bytes(4)?.is_empty());
///
/// let mut second = chunks.next_chunk()?.unwrap();
/// let mut rest = Vec::new();
/// second.read_to_end(&mut rest)?;
/// assert_eq!(rest, b"6789");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct ChunkReader<'a, R> {
    state: &'a mut ChunkState,
    puller: &'a mut BufferedPuller<R>,
    config: &'a ChunkConfig,
}

impl<'a, R: Read> ChunkReader<'a, R> {
    pub(crate) fn new(
        state: &'a mut ChunkState,
        puller: &'a mut BufferedPuller<R>,
        config: &'a ChunkConfig,
    ) -> Self {
        Self {
            state,
            puller,
            config,
        }
    }

    /// Reads up to `n` bytes of this chunk.
    ///
    /// Returns exactly `n` bytes while the chunk has that many left. A shorter
    /// result (possibly empty) means the chunk is finished; every later call
    /// returns empty.
    ///
    /// # Errors
    ///
    /// - [`ChunkError::Io`] if the source fails. Bytes pulled before the
    ///   failure are kept, so the read may be retried.
    /// - [`ChunkError::DelimiterNotFound`] under
    ///   [`DelimiterPolicy::Strict`] when the source ends before a delimiter
    ///   closes an oversized chunk. The reader stays failed.
    pub fn read_bytes(&mut self, n: usize) -> Result<Bytes, ChunkError> {
        let n = self.fill(n)?;
        Ok(self.state.consume(n))
    }

    /// Reads the rest of this chunk into a [`Chunk`].
    ///
    /// The returned chunk starts at the current [`position`](Self::position).
    /// If hashing is enabled its hash covers exactly the returned bytes.
    pub fn read_to_chunk(&mut self) -> Result<Chunk, ChunkError> {
        let start = self.state.delivered;
        let offset = self.state.end_offset();
        let n = self.fill(usize::MAX)?;
        let data = self.state.consume(n);

        let hash = if start == 0 {
            self.state.hash
        } else {
            rehash(self.config, &data)
        };

        Ok(Chunk { data, offset, hash })
    }

    /// Consumes the reader and returns the rest of the chunk.
    ///
    /// Same as [`read_to_chunk`](Self::read_to_chunk); the chunk is finished
    /// afterwards, so the sequencer can move on.
    pub fn into_chunk(mut self) -> Result<Chunk, ChunkError> {
        self.read_to_chunk()
    }

    /// Makes up to `want` bytes deliverable, pulling as needed, and returns
    /// how many can be consumed. Ends the chunk on a short count.
    fn fill(&mut self, want: usize) -> Result<usize, ChunkError> {
        match self.state.phase {
            Phase::Ended => return Ok(0),
            Phase::Failed => return Err(self.state.failure()),
            Phase::Open => {}
        }

        loop {
            self.state.scan(self.config);

            let available = self.state.available();
            if available >= want {
                return Ok(want);
            }

            if self.state.boundary.is_some() {
                self.state.phase = Phase::Ended;
                trace!(
                    "chunk {} drained after {} bytes",
                    self.state.index,
                    self.state.delivered + available
                );
                return Ok(available);
            }

            if self.puller.is_exhausted() {
                self.state
                    .close_at_exhaustion(self.config.delimiter_policy())?;
                continue;
            }

            self.puller.pull_into(&mut self.state.remainder)?;
        }
    }
}

impl<R> ChunkReader<'_, R> {
    /// Zero-based position of this chunk in the sequence.
    pub fn index(&self) -> u64 {
        self.state.index
    }

    /// Absolute stream offset of the chunk's first byte.
    pub fn offset(&self) -> u64 {
        self.state.offset
    }

    /// Bytes of this chunk delivered so far.
    pub fn position(&self) -> usize {
        self.state.delivered
    }

    /// The chunk length, once the boundary has been found.
    pub fn boundary(&self) -> Option<usize> {
        self.state.boundary
    }

    /// Bytes already pulled from the source but not yet delivered.
    ///
    /// Once the chunk is finished these are the bytes carried into the next
    /// chunk.
    pub fn remainder(&self) -> &[u8] {
        &self.state.remainder
    }

    /// Returns true once a read came back short.
    pub fn is_finished(&self) -> bool {
        self.state.phase == Phase::Ended
    }

    /// BLAKE3 hash of the whole chunk.
    ///
    /// `None` until the chunk is finished, or if hashing is disabled.
    pub fn hash(&self) -> Option<ChunkHash> {
        self.state.hash
    }
}

impl<R: Read> Read for ChunkReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.fill(buf.len())?;
        let data = self.state.consume(n);
        buf[..n].copy_from_slice(&data);
        Ok(n)
    }
}

impl<R> std::fmt::Debug for ChunkReader<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkReader")
            .field("index", &self.state.index)
            .field("offset", &self.state.offset)
            .field("position", &self.state.delivered)
            .field("boundary", &self.state.boundary)
            .field("remainder", &self.state.remainder.len())
            .field("phase", &self.state.phase)
            .finish()
    }
}

fn rehash(config: &ChunkConfig, data: &[u8]) -> Option<ChunkHash> {
    if !config.hash_config().enabled {
        return None;
    }
    #[cfg(feature = "hash-blake3")]
    return Some(Blake3Hasher::hash(data));
    #[cfg(not(feature = "hash-blake3"))]
    return None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn open(config: &ChunkConfig, data: &[u8]) -> (ChunkState, BufferedPuller<Cursor<Vec<u8>>>) {
        let state = ChunkState::new(0, 0, config, BytesMut::new());
        let puller = BufferedPuller::new(Cursor::new(data.to_vec()), config.buffer_size());
        (state, puller)
    }

    #[test]
    fn test_exact_reads_stay_open_until_short() {
        let config = ChunkConfig::new(6, &b"5"[..], 4).unwrap();
        let (mut state, mut puller) = open(&config, b"0123456789");
        let mut reader = ChunkReader::new(&mut state, &mut puller, &config);

        assert_eq!(&reader.read_bytes(3).unwrap()[..], b"012");
        assert_eq!(&reader.read_bytes(3).unwrap()[..], b"345");
        assert!(!reader.is_finished());
        assert!(reader.read_bytes(3).unwrap().is_empty());
        assert!(reader.is_finished());
        assert_eq!(reader.boundary(), Some(6));
        assert_eq!(reader.remainder(), b"67");
    }

    #[test]
    fn test_short_read_is_final() {
        let config = ChunkConfig::new(6, &b"5"[..], 4).unwrap();
        let (mut state, mut puller) = open(&config, b"0123456789");
        let mut reader = ChunkReader::new(&mut state, &mut puller, &config);

        assert_eq!(&reader.read_bytes(100).unwrap()[..], b"012345");
        assert!(reader.is_finished());
        assert!(reader.read_bytes(100).unwrap().is_empty());
        assert!(reader.read_bytes(1).unwrap().is_empty());
    }

    #[test]
    fn test_zero_sized_read_does_not_end_chunk() {
        let config = ChunkConfig::new(4, &b"\n"[..], 4).unwrap();
        let (mut state, mut puller) = open(&config, b"abc\ndef");
        let mut reader = ChunkReader::new(&mut state, &mut puller, &config);

        assert!(reader.read_bytes(0).unwrap().is_empty());
        assert!(!reader.is_finished());
        assert_eq!(&reader.read_bytes(10).unwrap()[..], b"abc\n");
    }

    #[test]
    fn test_straddling_multi_byte_delimiter() {
        // "\r\n" is split across two 3-byte pulls: "ab\r" + "\ncd".
        let config = ChunkConfig::new(2, &b"\r\n"[..], 3).unwrap();
        let (mut state, mut puller) = open(&config, b"ab\r\ncd");
        let mut reader = ChunkReader::new(&mut state, &mut puller, &config);

        assert_eq!(&reader.read_bytes(1).unwrap()[..], b"a");
        assert_eq!(&reader.read_bytes(64).unwrap()[..], b"b\r\n");
        assert!(reader.is_finished());
        assert_eq!(reader.remainder(), b"cd");
    }

    #[test]
    fn test_seeded_remainder_is_read_first() {
        let config = ChunkConfig::new(2, &b";"[..], 8).unwrap();
        let mut state = ChunkState::new(1, 10, &config, BytesMut::from(&b"xy;z"[..]));
        let mut puller = BufferedPuller::new(Cursor::new(b"ignored".to_vec()), 8);
        let mut reader = ChunkReader::new(&mut state, &mut puller, &config);

        assert_eq!(reader.index(), 1);
        assert_eq!(reader.offset(), 10);
        assert_eq!(&reader.read_bytes(16).unwrap()[..], b"xy;");
        // The boundary was inside the seed, so the source was never touched.
        assert_eq!(puller.pulled(), 0);
    }

    #[test]
    fn test_strict_policy_fails_and_stays_failed() {
        let config = ChunkConfig::new(2, &b"\n"[..], 4)
            .unwrap()
            .with_delimiter_policy(DelimiterPolicy::Strict);
        let (mut state, mut puller) = open(&config, b"0123456789");
        let mut reader = ChunkReader::new(&mut state, &mut puller, &config);

        let err = reader.read_bytes(100).unwrap_err();
        assert!(matches!(
            err,
            ChunkError::DelimiterNotFound {
                offset: 0,
                limit: 2
            }
        ));
        assert!(matches!(
            reader.read_bytes(1),
            Err(ChunkError::DelimiterNotFound { .. })
        ));
        assert_eq!(state.phase(), Phase::Failed);
    }

    #[test]
    fn test_strict_policy_accepts_short_tail() {
        let config = ChunkConfig::new(8, &b"\n"[..], 4)
            .unwrap()
            .with_delimiter_policy(DelimiterPolicy::Strict);
        let (mut state, mut puller) = open(&config, b"tail");
        let mut reader = ChunkReader::new(&mut state, &mut puller, &config);

        assert_eq!(&reader.read_bytes(100).unwrap()[..], b"tail");
        assert!(reader.is_finished());
    }

    #[test]
    fn test_read_to_chunk_after_partial_read() {
        let config = ChunkConfig::new(6, &b"5"[..], 4).unwrap();
        let (mut state, mut puller) = open(&config, b"0123456789");
        let mut reader = ChunkReader::new(&mut state, &mut puller, &config);

        reader.read_bytes(2).unwrap();
        let chunk = reader.read_to_chunk().unwrap();
        assert_eq!(&chunk.data[..], b"2345");
        assert_eq!(chunk.offset, 2);
        assert!(chunk.hash.is_none());
        assert!(reader.is_finished());
    }

    #[test]
    fn test_io_read_matches_read_bytes() {
        let config = ChunkConfig::new(3, &b"|"[..], 2).unwrap();
        let (mut state, mut puller) = open(&config, b"ab|cd|ef");
        let mut reader = ChunkReader::new(&mut state, &mut puller, &config);

        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"ab|");
        assert!(reader.is_finished());
        assert_eq!(reader.remainder(), b"c");
    }

    #[test]
    fn test_into_chunk_finishes_state() {
        let config = ChunkConfig::new(3, &b";"[..], 4).unwrap();
        let (mut state, mut puller) = open(&config, b"ab;cd;");
        let chunk = ChunkReader::new(&mut state, &mut puller, &config)
            .into_chunk()
            .unwrap();

        assert_eq!(&chunk.data[..], b"ab;");
        assert_eq!(state.phase(), Phase::Ended);
        assert_eq!(&state.into_remainder()[..], b"c");
    }

    #[cfg(feature = "hash-blake3")]
    #[test]
    fn test_hash_covers_whole_chunk() {
        let config = ChunkConfig::new(6, &b"5"[..], 4)
            .unwrap()
            .with_hash_config(crate::HashConfig::enabled());
        let (mut state, mut puller) = open(&config, b"0123456789");
        let mut reader = ChunkReader::new(&mut state, &mut puller, &config);

        reader.read_bytes(1).unwrap();
        assert!(reader.hash().is_none());
        reader.read_bytes(64).unwrap();
        assert_eq!(reader.hash(), Some(Blake3Hasher::hash(b"012345")));
    }
}
