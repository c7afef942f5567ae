//! File chunking example.
//!
//! Run with:
//!     RUST_LOG=debug cargo run --example chunk_file -- /path/to/file [limit] [delimiter]

use std::env;
use std::fs::File;
use std::io;

use delimchunk::{ChunkConfig, Chunker, HashConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "Cargo.toml".to_string());
    let limit = match args.next() {
        Some(limit) => limit.parse()?,
        None => 64 * 1024,
    };
    let delimiter = args.next().unwrap_or_else(|| "\n".to_string());

    println!("Chunking file: {}\n", path);

    let file = File::open(&path)?;
    let metadata = file.metadata()?;
    println!("File size: {} bytes\n", metadata.len());

    let config = ChunkConfig::new(limit, delimiter.into_bytes(), 64 * 1024)?
        .with_hash_config(HashConfig::enabled());
    let mut chunks = Chunker::new(config).chunk(file)?;

    let mut total_chunks = 0u64;
    let mut total_bytes = 0u64;

    while let Some(mut reader) = chunks.next_chunk()? {
        let index = reader.index();
        let offset = reader.offset();
        let len = io::copy(&mut reader, &mut io::sink())?;

        total_chunks += 1;
        total_bytes += len;

        match reader.hash() {
            Some(hash) => println!(
                "Chunk {}: offset={:>10}, len={:>8}, hash={}",
                index,
                offset,
                len,
                hash.to_hex()
            ),
            None => println!("Chunk {}: offset={:>10}, len={:>8}", index, offset, len),
        }
    }

    println!("\nTotal: {} chunks, {} bytes", total_chunks, total_bytes);
    if total_chunks > 0 {
        println!("Average chunk size: {} bytes", total_bytes / total_chunks);
    }

    Ok(())
}
