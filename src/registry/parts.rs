//! Part registry.

use std::collections::HashMap;
use std::ops::Range;
use std::time::Duration;

use parking_lot::Mutex;

use super::IdAllocator;
use crate::error::{Result, StoreError};
use crate::part::{FileId, FilePart, PartHash, PartId};

/// Maps file ids to their ordered part sequences.
///
/// A sequence is appended to during put, read during get and truncated from
/// the tail during delete. Position in the sequence equals `FilePart::index`.
#[derive(Debug)]
pub struct PartRegistry {
    ids: IdAllocator,
    parts: Mutex<HashMap<FileId, Vec<FilePart>>>,
}

impl PartRegistry {
    /// Creates an empty registry whose id lock waits at most `lock_timeout`.
    pub fn new(lock_timeout: Duration) -> Self {
        Self {
            ids: IdAllocator::new("part id", lock_timeout),
            parts: Mutex::new(HashMap::new()),
        }
    }

    /// Allocates a fresh part id.
    pub fn allocate_id(&self) -> Result<PartId> {
        self.ids.next_id()
    }

    /// Starts an empty sequence for a file.
    pub fn init(&self, file_id: FileId) {
        self.parts.lock().insert(file_id, Vec::new());
    }

    /// Appends a pending part to its parent's sequence.
    pub fn append(&self, part: FilePart) -> Result<()> {
        let mut parts = self.parts.lock();
        let sequence = parts.get_mut(&part.parent_id).ok_or(StoreError::NotFound {
            file_id: part.parent_id,
        })?;
        debug_assert_eq!(sequence.len(), part.index, "parts must be appended in order");
        sequence.push(part);
        Ok(())
    }

    /// Records digests for consecutive parts starting at `first_index`.
    pub fn mark_written(
        &self,
        file_id: FileId,
        first_index: usize,
        hashes: &[PartHash],
    ) -> Result<()> {
        let mut parts = self.parts.lock();
        let sequence = parts
            .get_mut(&file_id)
            .ok_or(StoreError::NotFound { file_id })?;
        for (offset, hash) in hashes.iter().enumerate() {
            let index = first_index + offset;
            let part = sequence
                .get_mut(index)
                .ok_or(StoreError::PartNotWritten { file_id, index })?;
            part.mark_written(*hash);
        }
        Ok(())
    }

    /// Copies a file's sequence.
    pub fn snapshot(&self, file_id: FileId) -> Vec<FilePart> {
        self.parts
            .lock()
            .get(&file_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Length of a file's sequence.
    pub fn count(&self, file_id: FileId) -> usize {
        self.parts.lock().get(&file_id).map_or(0, Vec::len)
    }

    /// Marks the parts in `range` as no longer written and returns copies of
    /// them in index order. The range is clamped to the sequence length.
    pub fn begin_removal(&self, file_id: FileId, range: Range<usize>) -> Vec<FilePart> {
        let mut parts = self.parts.lock();
        let Some(sequence) = parts.get_mut(&file_id) else {
            return Vec::new();
        };
        let end = range.end.min(sequence.len());
        let start = range.start.min(end);
        sequence[start..end]
            .iter_mut()
            .map(|part| {
                part.written = false;
                part.clone()
            })
            .collect()
    }

    /// Erases the part at `index` from a file's sequence.
    pub fn erase(&self, file_id: FileId, index: usize) -> Option<FilePart> {
        let mut parts = self.parts.lock();
        let sequence = parts.get_mut(&file_id)?;
        (index < sequence.len()).then(|| sequence.remove(index))
    }

    /// Drops a file's sequence entirely, returning whatever was left in it.
    pub fn remove_file(&self, file_id: FileId) -> Option<Vec<FilePart>> {
        self.parts.lock().remove(&file_id)
    }

    /// Returns true if the registry tracks a sequence for this file.
    pub fn contains(&self, file_id: FileId) -> bool {
        self.parts.lock().contains_key(&file_id)
    }

    #[cfg(test)]
    pub(crate) fn hold_ids(&self) -> parking_lot::MutexGuard<'_, u64> {
        self.ids.hold()
    }
}
