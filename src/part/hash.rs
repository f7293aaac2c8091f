//! Part digest type.

use std::fmt;

/// A fixed-size digest of a part's uncompressed content.
///
/// This is a thin wrapper around a 32-byte array (BLAKE3 hash).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartHash([u8; 32]);

impl PartHash {
    /// The size of the hash in bytes.
    pub const SIZE: usize = 32;

    /// Creates a part hash from a byte array.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the hash as a byte slice.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns the hash as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        const HEX: &[u8; 16] = b"0123456789abcdef";
        let mut result = String::with_capacity(Self::SIZE * 2);
        for byte in &self.0 {
            result.push(HEX[(byte >> 4) as usize] as char);
            result.push(HEX[(byte & 0xf) as usize] as char);
        }
        result
    }
}

impl AsRef<[u8]> for PartHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for PartHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
