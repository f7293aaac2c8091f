//! File registry.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use parking_lot::Mutex;

use super::IdAllocator;
use crate::error::{Result, StoreError};
use crate::part::{File, FileId};

/// Maps file ids to [`File`] records.
///
/// Ordered by id so listings are stable.
#[derive(Debug)]
pub struct FileRegistry {
    ids: IdAllocator,
    files: Mutex<BTreeMap<FileId, File>>,
}

impl FileRegistry {
    /// Creates an empty registry whose id lock waits at most `lock_timeout`.
    pub fn new(lock_timeout: Duration) -> Self {
        Self {
            ids: IdAllocator::new("file id", lock_timeout),
            files: Mutex::new(BTreeMap::new()),
        }
    }

    /// Allocates a fresh file id.
    pub fn allocate_id(&self) -> Result<FileId> {
        self.ids.next_id()
    }

    /// Registers a file, replacing any record with the same id.
    pub fn insert(&self, file: File) {
        self.files.lock().insert(file.id, file);
    }

    /// Returns a copy of the record.
    pub fn get(&self, file_id: FileId) -> Option<File> {
        self.files.lock().get(&file_id).cloned()
    }

    /// Returns the record if it exists and is ready.
    pub fn ready(&self, file_id: FileId) -> Result<File> {
        match self.files.lock().get(&file_id) {
            None => Err(StoreError::NotFound { file_id }),
            Some(file) if !file.ready => Err(StoreError::NotReady { file_id }),
            Some(file) => Ok(file.clone()),
        }
    }

    /// Marks a file complete with its final part count.
    pub fn complete(&self, file_id: FileId, part_count: usize) -> Result<()> {
        let mut files = self.files.lock();
        let file = files
            .get_mut(&file_id)
            .ok_or(StoreError::NotFound { file_id })?;
        file.part_count = part_count;
        file.ready = true;
        Ok(())
    }

    /// Checks that a file is ready and flips it to not-ready in one step,
    /// so no new get or delete can start against it.
    pub fn begin_delete(&self, file_id: FileId) -> Result<File> {
        let mut files = self.files.lock();
        let file = files
            .get_mut(&file_id)
            .ok_or(StoreError::NotFound { file_id })?;
        if !file.ready {
            return Err(StoreError::NotReady { file_id });
        }
        file.ready = false;
        Ok(file.clone())
    }

    /// Removes a file record.
    pub fn remove(&self, file_id: FileId) -> Option<File> {
        self.files.lock().remove(&file_id)
    }

    /// Returns `(id, name)` pairs ordered by id.
    pub fn list(&self) -> Vec<(FileId, PathBuf)> {
        self.files
            .lock()
            .values()
            .map(|file| (file.id, file.name.clone()))
            .collect()
    }

    /// Number of registered files.
    pub fn len(&self) -> usize {
        self.files.lock().len()
    }

    /// Returns true if no files are registered.
    pub fn is_empty(&self) -> bool {
        self.files.lock().is_empty()
    }
}
