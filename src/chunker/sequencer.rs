//! The ordered sequence of chunks over one source.

use std::io::Read;
use std::mem;

use bytes::BytesMut;
use log::debug;

use super::reader::{ChunkReader, ChunkState, Phase};
use crate::buffer::BufferedPuller;
use crate::config::{ChunkConfig, EmptySourcePolicy};
use crate::error::ChunkError;

/// Produces the chunks of a source one [`ChunkReader`] at a time.
///
/// Each call to [`next_chunk`](Self::next_chunk) resumes exactly where the
/// previous chunk ended, starting with the bytes that chunk pulled but did
/// not deliver. A chunk has to be read to its end (a read that comes back
/// short) before the next one may be requested.
///
/// The sequencer owns the source for its whole lifetime; get it back with
/// [`into_inner`](Self::into_inner).
///
/// # Example
///
/// ```
/// use std::io::{self, Cursor};
/// use delimchunk::{ChunkConfig, Chunker};
///
/// let source = Cursor::new(b"a\nbb\nccc\ndddd\n".to_vec());
/// let config = ChunkConfig::default().with_limit(4);
/// let mut chunks = Chunker::new(config).chunk(source)?;
///
/// let mut batches = Vec::new();
/// while let Some(mut chunk) = chunks.next_chunk()? {
///     let mut batch = Vec::new();
///     io::copy(&mut chunk, &mut batch)?;
///     batches.push(batch);
/// }
///
/// assert_eq!(batches, [&b"a\nbb\n"[..], b"ccc\n", b"dddd\n"]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct ChunkSequencer<R> {
    puller: BufferedPuller<R>,
    config: ChunkConfig,
    current: Option<ChunkState>,
    /// Bytes waiting to seed the next chunk.
    carry: BytesMut,
    /// Stream offset of the next chunk.
    offset: u64,
    emitted: u64,
    done: bool,
}

impl<R: Read> ChunkSequencer<R> {
    /// Creates a sequencer. The configuration must already be validated.
    pub(crate) fn new(source: R, config: ChunkConfig) -> Self {
        Self {
            puller: BufferedPuller::new(source, config.buffer_size()),
            config,
            current: None,
            carry: BytesMut::new(),
            offset: 0,
            emitted: 0,
            done: false,
        }
    }

    /// Returns a reader over the next chunk, or `None` once the source is
    /// fully covered.
    ///
    /// # Errors
    ///
    /// - [`ChunkError::SequencingViolation`] if the previous chunk has not
    ///   been read to its end.
    /// - [`ChunkError::DelimiterNotFound`] if the previous chunk failed under
    ///   strict policy; the sequence cannot continue.
    /// - [`ChunkError::Io`] if probing the source for more data fails. The
    ///   call may be retried.
    pub fn next_chunk(&mut self) -> Result<Option<ChunkReader<'_, R>>, ChunkError> {
        if self.done {
            return Ok(None);
        }

        if let Some(prev) = &self.current {
            match prev.phase() {
                Phase::Open => {
                    return Err(ChunkError::SequencingViolation {
                        index: prev.index(),
                        delivered: prev.delivered(),
                    });
                }
                Phase::Failed => return Err(prev.failure()),
                Phase::Ended => {}
            }
        }

        if let Some(prev) = self.current.take() {
            self.offset = prev.end_offset();
            self.carry = prev.into_remainder();
        }

        // Only the very first chunk may be empty, and only if allowed.
        let may_be_empty = self.emitted == 0
            && self.config.empty_source_policy() == EmptySourcePolicy::SingleEmptyChunk;
        if self.carry.is_empty() && !may_be_empty {
            self.puller.pull_into(&mut self.carry)?;
            if self.carry.is_empty() {
                debug!(
                    "sequence ended after {} chunks, {} bytes",
                    self.emitted, self.offset
                );
                self.done = true;
                return Ok(None);
            }
        }

        let seed = mem::take(&mut self.carry);
        let state = self
            .current
            .insert(ChunkState::new(self.emitted, self.offset, &self.config, seed));
        self.emitted += 1;

        Ok(Some(ChunkReader::new(state, &mut self.puller, &self.config)))
    }
}

impl<R> ChunkSequencer<R> {
    /// Returns the configuration in use.
    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    /// Stream offset where the next chunk will start.
    pub fn offset(&self) -> u64 {
        match &self.current {
            Some(state) if state.phase() == Phase::Ended => state.end_offset(),
            _ => self.offset,
        }
    }

    /// Number of chunks handed out so far.
    pub fn chunks_emitted(&self) -> u64 {
        self.emitted
    }

    /// Total bytes taken from the source, including bytes not yet delivered.
    pub fn bytes_pulled(&self) -> u64 {
        self.puller.pulled()
    }

    /// Returns true once the sequence has reported its end.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Returns a reference to the source.
    pub fn get_ref(&self) -> &R {
        self.puller.get_ref()
    }

    /// Returns the source.
    ///
    /// Bytes already pulled but not yet delivered are dropped with the
    /// sequencer.
    pub fn into_inner(self) -> R {
        self.puller.into_inner()
    }
}

impl<R> std::fmt::Debug for ChunkSequencer<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkSequencer")
            .field("config", &self.config)
            .field("offset", &self.offset())
            .field("emitted", &self.emitted)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sequencer(data: &[u8], config: ChunkConfig) -> ChunkSequencer<Cursor<Vec<u8>>> {
        ChunkSequencer::new(Cursor::new(data.to_vec()), config)
    }

    #[test]
    fn test_refuses_next_chunk_before_short_read() {
        let config = ChunkConfig::new(6, &b"5"[..], 4).unwrap();
        let mut chunks = sequencer(b"0123456789", config);

        let mut first = chunks.next_chunk().unwrap().unwrap();
        assert_eq!(&first.read_bytes(6).unwrap()[..], b"012345");
        assert!(!first.is_finished());

        // All six bytes are out, but no short read has closed the chunk.
        let err = chunks.next_chunk().unwrap_err();
        assert!(matches!(
            err,
            ChunkError::SequencingViolation {
                index: 0,
                delivered: 6
            }
        ));
    }

    #[test]
    fn test_drained_chunk_hands_remainder_on() {
        let config = ChunkConfig::new(6, &b"5"[..], 4).unwrap();
        let mut chunks = sequencer(b"0123456789", config);

        let mut first = chunks.next_chunk().unwrap().unwrap();
        assert_eq!(&first.read_bytes(7).unwrap()[..], b"012345");
        assert_eq!(first.remainder(), b"67");
        assert_eq!(chunks.offset(), 6);

        let mut second = chunks.next_chunk().unwrap().unwrap();
        assert_eq!(second.offset(), 6);
        assert_eq!(second.remainder(), b"67");
        assert_eq!(&second.read_bytes(10).unwrap()[..], b"6789");
        assert!(chunks.next_chunk().unwrap().is_none());
    }

    #[test]
    fn test_abandoned_chunk_blocks_sequence() {
        let config = ChunkConfig::new(2, &b"\n"[..], 4).unwrap();
        let mut chunks = sequencer(b"a\nb\nc\n", config);

        {
            let mut first = chunks.next_chunk().unwrap().unwrap();
            first.read_bytes(1).unwrap();
        }
        assert!(matches!(
            chunks.next_chunk(),
            Err(ChunkError::SequencingViolation { index: 0, .. })
        ));
        // Still refused: nothing was skipped.
        assert!(chunks.next_chunk().is_err());
        assert_eq!(chunks.offset(), 0);
    }

    #[test]
    fn test_empty_source_single_empty_chunk() {
        let mut chunks = sequencer(b"", ChunkConfig::default());

        let mut only = chunks.next_chunk().unwrap().unwrap();
        assert!(only.read_bytes(16).unwrap().is_empty());
        assert!(only.is_finished());

        assert!(chunks.next_chunk().unwrap().is_none());
        assert!(chunks.next_chunk().unwrap().is_none());
        assert_eq!(chunks.chunks_emitted(), 1);
    }

    #[test]
    fn test_empty_source_no_chunks() {
        let config = ChunkConfig::default().with_empty_source_policy(EmptySourcePolicy::NoChunks);
        let mut chunks = sequencer(b"", config);

        assert!(chunks.next_chunk().unwrap().is_none());
        assert!(chunks.is_done());
        assert_eq!(chunks.chunks_emitted(), 0);
    }

    #[test]
    fn test_no_trailing_empty_chunk_on_buffer_multiple() {
        // Source length is an exact multiple of the pull size, so exhaustion
        // is only discovered by the probe after the last chunk.
        let config = ChunkConfig::new(4, &b"\n"[..], 4).unwrap();
        let mut chunks = sequencer(b"abc\ndef\n", config);

        let mut lengths = Vec::new();
        while let Some(mut chunk) = chunks.next_chunk().unwrap() {
            lengths.push(chunk.read_to_chunk().unwrap().len());
        }
        assert_eq!(lengths, [4, 4]);
        assert_eq!(chunks.offset(), 8);
    }

    #[test]
    fn test_failed_chunk_poisons_sequence() {
        let config = ChunkConfig::new(2, &b"\n"[..], 4)
            .unwrap()
            .with_delimiter_policy(crate::DelimiterPolicy::Strict);
        let mut chunks = sequencer(b"0123456789", config);

        let mut first = chunks.next_chunk().unwrap().unwrap();
        assert!(first.read_bytes(100).is_err());
        assert!(matches!(
            chunks.next_chunk(),
            Err(ChunkError::DelimiterNotFound { offset: 0, limit: 2 })
        ));
    }

    #[test]
    fn test_into_inner_returns_source() {
        let mut chunks = sequencer(b"x\n", ChunkConfig::default());
        chunks.next_chunk().unwrap().unwrap().read_to_chunk().unwrap();
        assert!(chunks.next_chunk().unwrap().is_none());

        let source = chunks.into_inner();
        assert_eq!(source.position(), 2);
    }
}
