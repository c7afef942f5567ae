//! The delimiter pattern that marks permissible chunk boundaries.

use std::fmt;

use bytes::Bytes;
use memchr::memmem;

/// A fixed byte sequence marking where a chunk may end.
///
/// The pattern is compiled once into a [`memmem::Finder`]; single-byte
/// delimiters (the common `b'\n'` case) go through `memchr` directly.
///
/// # Example
///
/// ```
/// use delimchunk::Delimiter;
///
/// let delimiter = Delimiter::new(&b"\r\n"[..]);
/// assert_eq!(delimiter.len(), 2);
/// assert_eq!(delimiter.find(b"abc\r\ndef"), Some(3));
/// ```
#[derive(Clone)]
pub struct Delimiter {
    pattern: Bytes,
    finder: memmem::Finder<'static>,
}

impl Delimiter {
    /// Creates a delimiter from a byte pattern.
    ///
    /// An empty pattern is accepted here and rejected by
    /// [`ChunkConfig::validate`](crate::ChunkConfig::validate).
    pub fn new(pattern: impl Into<Bytes>) -> Self {
        let pattern = pattern.into();
        let finder = memmem::Finder::new(&pattern[..]).into_owned();
        Self { pattern, finder }
    }

    /// Returns the raw pattern bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pattern
    }

    /// Returns the pattern length in bytes.
    pub fn len(&self) -> usize {
        self.pattern.len()
    }

    /// Returns true if the pattern has no bytes.
    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    /// Returns the start of the first occurrence in `haystack`.
    #[inline]
    pub fn find(&self, haystack: &[u8]) -> Option<usize> {
        match self.pattern.len() {
            1 => memchr::memchr(self.pattern[0], haystack),
            _ => self.finder.find(haystack),
        }
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Self::new(Bytes::from_static(crate::config::DEFAULT_DELIMITER))
    }
}

impl PartialEq for Delimiter {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for Delimiter {}

impl AsRef<[u8]> for Delimiter {
    fn as_ref(&self) -> &[u8] {
        &self.pattern
    }
}

impl fmt::Debug for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Delimiter")
            .field(&self.pattern.escape_ascii().to_string())
            .finish()
    }
}

impl From<&'static [u8]> for Delimiter {
    fn from(pattern: &'static [u8]) -> Self {
        Self::new(Bytes::from_static(pattern))
    }
}

impl From<Vec<u8>> for Delimiter {
    fn from(pattern: Vec<u8>) -> Self {
        Self::new(pattern)
    }
}
