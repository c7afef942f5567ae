//! delimchunk
//!
//! Streaming, delimiter-aligned chunking for Rust.
//!
//! `delimchunk` splits a byte stream into ordered chunks whose boundaries fall
//! right after a delimiter, once a chunk has grown close to a size limit. It is
//! meant for feeding record-oriented data (log lines, CSV rows, NDJSON) into
//! fixed-budget consumers without splitting a record in half:
//!
//! - batched uploads
//! - parallel parsing of large files
//! - bounded-memory record processing
//!
//! The crate intentionally:
//! - does NOT manage files or paths
//! - does NOT manage concurrency
//! - does NOT interpret the bytes it chunks
//!
//! It only does one thing: **Read bytes → yield delimiter-aligned chunks**
//!
//! # Boundary rule
//!
//! A chunk ends immediately after the first delimiter occurrence that starts
//! at or after position `limit - 1` of the chunk. Without such an occurrence
//! the chunk runs to the end of the source (or fails, under
//! [`DelimiterPolicy::Strict`]). Chunks may therefore be longer than `limit`,
//! but never split a delimiter.
//!
//! # Streaming
//!
//! ```no_run
//! use std::fs::File;
//! use std::io;
//! use delimchunk::{Chunker, ChunkConfig, ChunkError};
//!
//! fn main() -> Result<(), ChunkError> {
//!     let file = File::open("events.ndjson")?;
//!     let mut chunks = Chunker::new(ChunkConfig::default()).chunk(file)?;
//!
//!     while let Some(mut chunk) = chunks.next_chunk()? {
//!         let index = chunk.index();
//!         let copied = io::copy(&mut chunk, &mut io::sink())?;
//!         println!("chunk {} is {} bytes", index, copied);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # In memory
//!
//! ```
//! use delimchunk::{Chunker, ChunkConfig};
//!
//! let chunker = Chunker::new(ChunkConfig::default().with_limit(4));
//! let chunks = chunker.chunk_bytes(&b"ab\ncd\nef"[..])?;
//!
//! assert_eq!(chunks.len(), 2);
//! assert_eq!(&chunks[0].data[..], b"ab\ncd\n");
//! assert_eq!(chunks[1].offset, 6);
//! # Ok::<(), delimchunk::ChunkError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod boundary;
mod chunk;
mod chunker;
mod config;
mod error;

mod buffer; // internal source puller
mod hash; // internal blake3 impl

//
// Public surface
//

pub use boundary::Delimiter;
pub use chunk::{Chunk, ChunkHash};
pub use chunker::{ChunkReader, ChunkSequencer, Chunker, chunk};
pub use config::{
    ChunkConfig, DEFAULT_BUFFER_SIZE, DEFAULT_DELIMITER, DEFAULT_LIMIT, DelimiterPolicy,
    EmptySourcePolicy, HashConfig,
};
pub use error::ChunkError;
