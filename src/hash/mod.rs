//! Content hashing for chunks.
//!
//! - [`Blake3Hasher`] - Incremental BLAKE3 (requires `hash-blake3` feature)

#[cfg(feature = "hash-blake3")]
mod blake3;

#[cfg(feature = "hash-blake3")]
pub(crate) use blake3::Blake3Hasher;
