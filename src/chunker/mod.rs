//! Chunking engine for delimiter-aligned byte streams.
//!
//! - [`Chunker`] - Entry point holding a validated configuration
//! - [`ChunkSequencer`] - Ordered chunks over one source
//! - [`ChunkReader`] - Bounded reads over the current chunk

mod engine;
mod reader;
mod sequencer;

pub use engine::{Chunker, chunk};
pub use reader::ChunkReader;
pub use sequencer::ChunkSequencer;
