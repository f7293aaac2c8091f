//! Content digests for part integrity.
//!
//! - [`Blake3Hasher`] - BLAKE3 digest of uncompressed part bytes

mod blake3;

pub use self::blake3::Blake3Hasher;
