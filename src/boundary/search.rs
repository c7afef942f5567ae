//! Resumable delimiter search past a chunk's limit.
//!
//! A chunk of nominal size `limit` ends right after the first delimiter that
//! starts at chunk position `limit - 1` or later. Data arrives piecewise, so
//! the search keeps a cursor: every position before it is known not to start
//! a delimiter, and the next search resumes there instead of rescanning.

use super::Delimiter;

/// Forward search over the window `[max(limit - 1, 0), end)` of one chunk.
///
/// Positions are chunk-relative. Callers hand in the bytes they still hold,
/// together with the chunk position of the first one (`base`); `base` must
/// never pass [`cursor`](Self::cursor).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BoundarySearch {
    cursor: usize,
}

impl BoundarySearch {
    /// Starts a search for a chunk with the given limit.
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            cursor: limit.saturating_sub(1),
        }
    }

    /// First chunk position that may still start a delimiter.
    ///
    /// Bytes before it are settled as chunk content; bytes from it onward may
    /// be part of a delimiter that has not fully arrived yet.
    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    /// Searches `data` (chunk bytes starting at position `base`).
    ///
    /// Returns the chunk length (the position just past the delimiter) if one
    /// is found. Otherwise advances the cursor so that a delimiter straddling
    /// the end of `data` is found by the next call.
    pub(crate) fn search(
        &mut self,
        delimiter: &Delimiter,
        data: &[u8],
        base: usize,
    ) -> Option<usize> {
        debug_assert!(base <= self.cursor);

        let end = base + data.len();
        let width = delimiter.len();
        if self.cursor + width > end {
            return None;
        }

        match delimiter.find(&data[self.cursor - base..]) {
            Some(at) => Some(self.cursor + at + width),
            None => {
                self.cursor = end + 1 - width;
                None
            }
        }
    }
}
