//! Per-part storage format: zlib-compressed bytes, verified by BLAKE3 on read.

use std::fs;
use std::io::{self, ErrorKind, Read, Write};
use std::path::Path;

use bytes::Bytes;
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use tracing::debug;

use crate::buffer::Buffer;
use crate::hash::Blake3Hasher;
use crate::part::PartHash;

const DECODE_STEP: usize = 4096;

/// Compresses `data`, writes it to `path`, and returns the digest of the
/// uncompressed bytes.
pub fn save_part(data: &[u8], path: &Path) -> io::Result<PartHash> {
    let hash = Blake3Hasher::hash(data);

    let mut compressed = Buffer::take();
    let mut encoder = ZlibEncoder::new(&mut *compressed, Compression::default());
    encoder.write_all(data)?;
    encoder.finish()?;

    fs::write(path, &compressed[..])?;
    Ok(hash)
}

/// Reads `path`, decompresses it and checks the digest against `expected`.
///
/// Returns `Ok(None)` when the stored bytes are corrupt: they fail to
/// decompress or decompress to different content. A missing or unreadable
/// file is an `Err`.
pub fn load_part(expected: &PartHash, path: &Path) -> io::Result<Option<Bytes>> {
    let mut compressed = Buffer::take();
    fs::File::open(path)?.read_to_end(&mut compressed)?;

    let mut decoder = ZlibDecoder::new(&compressed[..]);
    let mut hasher = Blake3Hasher::new();
    let mut data = Vec::with_capacity(compressed.len() * 2);
    let mut step = [0u8; DECODE_STEP];
    loop {
        match decoder.read(&mut step) {
            Ok(0) => break,
            Ok(n) => {
                hasher.update(&step[..n]);
                data.extend_from_slice(&step[..n]);
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "part failed to decompress");
                return Ok(None);
            }
        }
    }

    let actual = hasher.finalize();
    if actual != *expected {
        debug!(
            path = %path.display(),
            expected = %expected,
            actual = %actual,
            "part digest mismatch"
        );
        return Ok(None);
    }

    Ok(Some(Bytes::from(data)))
}

/// Deletes the part file at `path`. Never fails; reports `false` instead.
pub fn remove_part(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "part removal failed");
            false
        }
    }
}
