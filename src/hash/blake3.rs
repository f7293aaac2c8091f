//! BLAKE3-based part hashing.

use crate::part::PartHash;

/// A hasher that computes BLAKE3 digests of part content.
#[derive(Debug, Clone)]
pub struct Blake3Hasher {
    state: blake3::Hasher,
}

impl Blake3Hasher {
    /// Creates a new hasher.
    pub fn new() -> Self {
        Self {
            state: blake3::Hasher::new(),
        }
    }

    /// Updates the hasher with more data.
    pub fn update(&mut self, data: &[u8]) {
        self.state.update(data);
    }

    /// Finalizes and returns the digest.
    pub fn finalize(&self) -> PartHash {
        PartHash::new(self.state.finalize().into())
    }

    /// Hashes data in one shot.
    pub fn hash(data: &[u8]) -> PartHash {
        PartHash::new(blake3::hash(data).into())
    }
}

impl Default for Blake3Hasher {
    fn default() -> Self {
        Self::new()
    }
}
