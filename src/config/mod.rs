//! Configuration for chunking behavior.
//!
//! This module provides types to configure how a stream is segmented:
//!
//! - [`ChunkConfig`] - Limit, delimiter, pull size, policies and hashing
//! - [`DelimiterPolicy`] - What happens when no delimiter follows the limit
//! - [`EmptySourcePolicy`] - Whether an empty source yields one chunk or none
//! - [`HashConfig`] - Whether to compute BLAKE3 hashes of chunk content
//!
//! # Example
//!
//! ```
//! use delimchunk::{ChunkConfig, DelimiterPolicy, HashConfig};
//!
//! // 64 KiB chunks of CRLF-terminated records, pulled 8 KiB at a time
//! let config = ChunkConfig::new(64 * 1024, &b"\r\n"[..], 8 * 1024)?;
//!
//! // Reject oversized tails that never hit a delimiter
//! let config = config
//!     .with_delimiter_policy(DelimiterPolicy::Strict)
//!     .with_hash_config(HashConfig::enabled());
//!
//! # Ok::<(), delimchunk::ChunkError>(())
//! ```

use bytes::Bytes;

use crate::boundary::Delimiter;
use crate::error::ChunkError;

/// Default nominal chunk size (1 MiB).
pub const DEFAULT_LIMIT: usize = 1024 * 1024;

/// Default record delimiter (a single newline).
pub const DEFAULT_DELIMITER: &[u8] = b"\n";

/// Default number of bytes requested from the source per pull (4 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 4 * 1024;

/// Behavior when the source ends before a delimiter closes a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DelimiterPolicy {
    /// The chunk takes every remaining byte and becomes the final chunk.
    #[default]
    Absorb,
    /// A final chunk longer than the limit without a delimiter is an error
    /// ([`ChunkError::DelimiterNotFound`]). A tail that fits within the limit
    /// is still accepted.
    Strict,
}

/// Behavior for a source that yields no bytes at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EmptySourcePolicy {
    /// Produce exactly one chunk whose reads return empty.
    #[default]
    SingleEmptyChunk,
    /// Produce no chunks.
    NoChunks,
}

/// Configuration for delimiter-aligned chunking.
///
/// - `limit` - Nominal chunk size. Every chunk but the last is at least this
///   long and extends past it only up to the end of the next delimiter.
/// - `delimiter` - Non-empty byte pattern that terminates a record.
/// - `buffer_size` - Bytes requested from the source per pull.
///
/// # Example
///
/// ```
/// use delimchunk::ChunkConfig;
///
/// // Use default configuration (1 MiB, b"\n", 4 KiB pulls)
/// let config = ChunkConfig::default();
///
/// // Builder pattern
/// let config = ChunkConfig::default()
///     .with_limit(256 * 1024)
///     .with_delimiter(&b"\0"[..])
///     .with_buffer_size(16 * 1024);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkConfig {
    /// Nominal chunk size in bytes.
    limit: usize,

    /// Record delimiter.
    delimiter: Delimiter,

    /// Pull size in bytes.
    buffer_size: usize,

    /// Handling of a missing delimiter at end of source.
    delimiter_policy: DelimiterPolicy,

    /// Handling of an empty source.
    empty_source_policy: EmptySourcePolicy,

    /// Configuration for hashing behavior.
    hash_config: HashConfig,
}

impl ChunkConfig {
    /// Creates a new configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if:
    /// - `limit` is zero
    /// - `delimiter` is empty
    /// - `buffer_size` is zero
    ///
    /// # Example
    ///
    /// ```
    /// use delimchunk::ChunkConfig;
    ///
    /// let config = ChunkConfig::new(6, &b"5"[..], 4)?;
    /// assert_eq!(config.limit(), 6);
    ///
    /// assert!(ChunkConfig::new(6, &b""[..], 4).is_err());
    /// # Ok::<(), delimchunk::ChunkError>(())
    /// ```
    pub fn new(
        limit: usize,
        delimiter: impl Into<Bytes>,
        buffer_size: usize,
    ) -> Result<Self, ChunkError> {
        let config = Self {
            limit,
            delimiter: Delimiter::new(delimiter),
            buffer_size,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the nominal chunk size.
    ///
    /// Note: This does not validate the configuration. Use [`ChunkConfig::validate`]
    /// to check if the configuration is valid.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the record delimiter.
    ///
    /// Note: This does not validate the configuration.
    pub fn with_delimiter(mut self, delimiter: impl Into<Bytes>) -> Self {
        self.delimiter = Delimiter::new(delimiter);
        self
    }

    /// Sets the pull size.
    ///
    /// Note: This does not validate the configuration.
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Sets the missing-delimiter policy.
    pub fn with_delimiter_policy(mut self, policy: DelimiterPolicy) -> Self {
        self.delimiter_policy = policy;
        self
    }

    /// Sets the empty-source policy.
    pub fn with_empty_source_policy(mut self, policy: EmptySourcePolicy) -> Self {
        self.empty_source_policy = policy;
        self
    }

    /// Sets the hash configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use delimchunk::{ChunkConfig, HashConfig};
    ///
    /// let config = ChunkConfig::default()
    ///     .with_hash_config(HashConfig::enabled());
    /// assert!(config.hash_config().enabled);
    /// ```
    pub fn with_hash_config(mut self, config: HashConfig) -> Self {
        self.hash_config = config;
        self
    }

    /// Returns the nominal chunk size.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the record delimiter.
    pub fn delimiter(&self) -> &Delimiter {
        &self.delimiter
    }

    /// Returns the pull size.
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Returns the missing-delimiter policy.
    pub fn delimiter_policy(&self) -> DelimiterPolicy {
        self.delimiter_policy
    }

    /// Returns the empty-source policy.
    pub fn empty_source_policy(&self) -> EmptySourcePolicy {
        self.empty_source_policy
    }

    /// Returns the hash configuration.
    pub fn hash_config(&self) -> &HashConfig {
        &self.hash_config
    }

    /// Validates the current configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use delimchunk::ChunkConfig;
    ///
    /// let config = ChunkConfig::default().with_limit(0);
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ChunkError> {
        if self.limit == 0 {
            return Err(ChunkError::InvalidConfig {
                message: "limit must be non-zero",
            });
        }

        if self.delimiter.is_empty() {
            return Err(ChunkError::InvalidConfig {
                message: "delimiter must not be empty",
            });
        }

        if self.buffer_size == 0 {
            return Err(ChunkError::InvalidConfig {
                message: "buffer_size must be non-zero",
            });
        }

        Ok(())
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            delimiter: Delimiter::default(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            delimiter_policy: DelimiterPolicy::default(),
            empty_source_policy: EmptySourcePolicy::default(),
            hash_config: HashConfig::default(),
        }
    }
}

/// Configuration for chunk hashing behavior.
///
/// `HashConfig` controls whether a BLAKE3 hash is computed over the bytes of
/// each chunk as they are read. Hashing is disabled by default and has no
/// effect unless the `hash-blake3` feature is enabled.
///
/// # Example
///
/// ```
/// use delimchunk::HashConfig;
///
/// let config = HashConfig::enabled();
/// assert!(config.enabled);
/// assert!(!HashConfig::default().enabled);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HashConfig {
    /// Whether to compute BLAKE3 hashes for chunks.
    pub enabled: bool,
}

impl HashConfig {
    /// Creates a new hash configuration.
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Enables hashing.
    pub const fn enabled() -> Self {
        Self { enabled: true }
    }

    /// Disables hashing.
    pub const fn disabled() -> Self {
        Self { enabled: false }
    }
}
