// Property tests for delimiter-aligned chunking
// Properties: lossless reassembly, boundary alignment, short-read monotonicity,
// agreement between streaming and in-memory chunking

use std::io::Cursor;

use delimchunk::{ChunkConfig, Chunker};
use proptest::prelude::*;

/// Length of the chunk prefix ending at the first delimiter that starts at or
/// after `limit - 1`, if the chunk contains one.
fn first_boundary(chunk: &[u8], delimiter: &[u8], limit: usize) -> Option<usize> {
    let start = limit.saturating_sub(1);
    if chunk.len() < delimiter.len() {
        return None;
    }
    (start..=chunk.len() - delimiter.len())
        .find(|&i| &chunk[i..i + delimiter.len()] == delimiter)
        .map(|i| i + delimiter.len())
}

/// Streams `data`, cycling through `read_sizes` for each request.
fn stream(config: ChunkConfig, data: &[u8], read_sizes: &[usize]) -> Vec<(u64, Vec<u8>)> {
    let mut chunks = Chunker::new(config).chunk(Cursor::new(data.to_vec())).unwrap();
    let mut out = Vec::new();

    while let Some(mut reader) = chunks.next_chunk().unwrap() {
        let offset = reader.offset();
        let mut body = Vec::new();
        for &size in read_sizes.iter().cycle() {
            let part = reader.read_bytes(size).unwrap();
            body.extend_from_slice(&part);
            if part.len() < size {
                assert!(reader.is_finished());
                assert!(reader.read_bytes(size.max(1)).unwrap().is_empty());
                break;
            }
            assert_eq!(part.len(), size);
            assert!(!reader.is_finished());
        }
        out.push((offset, body));
    }
    out
}

fn sources() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(vec![b'a', b'b', b'\r', b'\n']), 0..1500)
}

fn delimiters() -> impl Strategy<Value = Vec<u8>> {
    prop::sample::select(vec![b"\n".to_vec(), b"\r\n".to_vec(), b"ab".to_vec(), b"aa".to_vec()])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_chunks_reassemble_source(
        data in sources(),
        delimiter in delimiters(),
        limit in 1usize..64,
        buffer_size in 1usize..32,
        read_sizes in prop::collection::vec(0usize..40, 1..6)
            .prop_filter("needs a non-zero read", |v| v.iter().any(|&n| n > 0)),
    ) {
        let config = ChunkConfig::new(limit, delimiter, buffer_size).unwrap();
        let chunks = stream(config, &data, &read_sizes);

        let mut expected_offset = 0u64;
        let mut joined = Vec::new();
        for (offset, body) in &chunks {
            prop_assert_eq!(*offset, expected_offset);
            expected_offset += body.len() as u64;
            joined.extend_from_slice(body);
        }
        prop_assert_eq!(joined, data.clone());

        if data.is_empty() {
            prop_assert_eq!(chunks.len(), 1);
        } else {
            prop_assert!(chunks.iter().all(|(_, body)| !body.is_empty()));
        }
    }

    #[test]
    fn prop_boundaries_follow_first_delimiter_past_limit(
        data in sources(),
        delimiter in delimiters(),
        limit in 1usize..64,
        buffer_size in 1usize..32,
    ) {
        let config = ChunkConfig::new(limit, delimiter.clone(), buffer_size).unwrap();
        let chunks = stream(config, &data, &[7]);

        let last = chunks.len().saturating_sub(1);
        for (i, (_, body)) in chunks.iter().enumerate() {
            let boundary = first_boundary(body, &delimiter, limit);
            if i < last {
                prop_assert_eq!(boundary, Some(body.len()));
                prop_assert!(body.len() >= limit);
            } else {
                prop_assert!(boundary.is_none() || boundary == Some(body.len()));
            }
        }
    }

    #[test]
    fn prop_streaming_matches_in_memory(
        data in sources(),
        delimiter in delimiters(),
        limit in 1usize..64,
        buffer_size in 1usize..32,
        read_size in 1usize..40,
    ) {
        let config = ChunkConfig::new(limit, delimiter, buffer_size).unwrap();
        let in_memory: Vec<(u64, Vec<u8>)> = Chunker::new(config.clone())
            .chunk_bytes(data.clone())
            .unwrap()
            .into_iter()
            .map(|c| (c.offset, c.data.to_vec()))
            .collect();

        prop_assert_eq!(stream(config, &data, &[read_size]), in_memory);
    }
}
