#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use partstore::PartReader;

fuzz_target!(|input: (u8, Vec<u8>)| {
    let (size, data) = input;
    let part_size = size as usize + 1;

    let parts: Vec<_> = PartReader::new(Cursor::new(&data), part_size)
        .collect::<Result<_, _>>()
        .unwrap();

    // Verify: every part but the last is full, none is empty
    for (i, part) in parts.iter().enumerate() {
        assert!(!part.is_empty());
        if i + 1 < parts.len() {
            assert_eq!(part.len(), part_size);
        }
    }

    // Verify: concatenation equals input
    let joined: Vec<u8> = parts.iter().flat_map(|p| p.iter().copied()).collect();
    assert_eq!(joined, data);

    // Verify: batching yields the same parts
    let mut reader = PartReader::new(Cursor::new(&data), part_size);
    let mut batched = Vec::new();
    loop {
        let batch = reader.next_batch(10).unwrap();
        if batch.is_empty() {
            break;
        }
        batched.extend(batch);
    }
    assert_eq!(batched, parts);
});
