#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use delimchunk::{ChunkConfig, Chunker};

fuzz_target!(|input: (u8, u8, u8, Vec<u8>)| {
    let (limit, buffer_size, read_size, data) = input;
    let limit = limit as usize + 1;
    let buffer_size = buffer_size as usize % 32 + 1;
    let read_size = read_size as usize % 64 + 1;

    let config = ChunkConfig::new(limit, &b"\n"[..], buffer_size).unwrap();
    let expected = Chunker::new(config.clone()).chunk_bytes(data.clone()).unwrap();

    let mut chunks = Chunker::new(config).chunk(Cursor::new(&data)).unwrap();
    let mut streamed = 0;
    while let Some(mut reader) = chunks.next_chunk().unwrap() {
        let mut body = Vec::new();
        loop {
            let part = reader.read_bytes(read_size).unwrap();
            body.extend_from_slice(&part);
            if part.len() < read_size {
                break;
            }
            // Verify: full reads never end the chunk
            assert!(!reader.is_finished());
        }
        assert!(reader.read_bytes(read_size).unwrap().is_empty());

        // Verify: streaming agrees with in-memory chunking
        let chunk = &expected[streamed];
        assert_eq!(reader.offset(), chunk.offset);
        assert_eq!(&body[..], &chunk.data[..]);
        streamed += 1;
    }
    assert_eq!(streamed, expected.len());
});
