#![no_main]

use libfuzzer_sys::fuzz_target;
use delimchunk::{ChunkConfig, Chunker, HashConfig};

fuzz_target!(|data: Vec<u8>| {
    let delimiters: [&[u8]; 4] = [b"\n", b"\r\n", b"\0", b"abc"];

    for delimiter in delimiters {
        for limit in [1, 2, 16, 255, 4096] {
            let config = ChunkConfig::new(limit, delimiter, 64).unwrap();
            let chunks = Chunker::new(config).chunk_bytes(data.clone()).unwrap();

            // Verify: offsets are contiguous and the chunks cover the input
            let mut expected_offset = 0u64;
            for chunk in &chunks {
                assert_eq!(chunk.offset, expected_offset);
                expected_offset += chunk.len() as u64;
            }
            assert_eq!(expected_offset, data.len() as u64);

            // Verify: every chunk but the last ends at the first delimiter
            // starting at or after limit - 1
            for chunk in chunks.iter().rev().skip(1) {
                assert!(chunk.ends_with(delimiter));
                let body = &chunk.data[..chunk.len() - delimiter.len()];
                let window = &body[body.len().min(limit - 1)..];
                assert!(!window.windows(delimiter.len()).any(|w| w == delimiter));
            }
        }
    }

    // Verify: hashes are deterministic and present on every chunk
    let config = ChunkConfig::default()
        .with_limit(8)
        .with_hash_config(HashConfig::enabled());
    let chunker = Chunker::new(config);
    let first = chunker.chunk_bytes(data.clone()).unwrap();
    let second = chunker.chunk_bytes(data).unwrap();
    assert!(first.iter().all(|c| c.hash.is_some()));
    assert_eq!(first, second);
});
