//! BLAKE3 hashing of chunk content as it is delivered.

use crate::chunk::ChunkHash;

/// Incremental BLAKE3 state fed with every slice a chunk reader hands out.
#[derive(Debug, Clone, Default)]
pub(crate) struct Blake3Hasher {
    state: blake3::Hasher,
}

impl Blake3Hasher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn update(&mut self, data: &[u8]) {
        self.state.update(data);
    }

    pub(crate) fn finalize(&self) -> ChunkHash {
        ChunkHash::new(self.state.finalize().into())
    }

    /// One-shot hash, used for in-memory chunking.
    pub(crate) fn hash(data: &[u8]) -> ChunkHash {
        ChunkHash::new(blake3::hash(data).into())
    }
}
