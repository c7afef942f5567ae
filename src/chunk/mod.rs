//! Chunk types.
//!
//! - [`Chunk`] - Materialised chunk with data, offset, hash
//! - [`ChunkHash`] - 32-byte BLAKE3 digest

mod data;
mod hash;

pub use data::Chunk;
pub use hash::ChunkHash;
