//! Delete pipeline: remove a stored file's parts, last batch first.

use tracing::{info, warn};

use super::Store;
use crate::error::Result;
use crate::part::FileId;

/// Outcome of a delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteReport {
    /// Part files removed.
    pub removed: usize,
    /// Part files that could not be removed and stay registered.
    pub failed: usize,
}

impl DeleteReport {
    /// Returns true if every part file was removed.
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

impl Store {
    /// Deletes a ready file and its part files.
    ///
    /// The file is marked not ready first, so no get can start against it.
    /// Batches are processed from the highest index down and, within a
    /// batch, parts are erased tail first, so erasing never shifts a part
    /// that is still waiting to be processed. Parts whose file could not be
    /// removed are left in the part registry; the file record itself is
    /// always dropped once every batch has run. No memory is reserved.
    pub fn delete(&self, file_id: FileId) -> Result<DeleteReport> {
        let file = self.files.begin_delete(file_id)?;
        let batch_size = self.config.batch_size();
        let total = self.parts.count(file_id);
        let mut report = DeleteReport::default();

        for batch_index in (0..total.div_ceil(batch_size)).rev() {
            let start = batch_index * batch_size;
            let batch = self.parts.begin_removal(file_id, start..start + batch_size);
            let paths = batch.iter().map(|part| self.part_path(part)).collect();

            let removed = match self.pool.remove(paths) {
                Ok(removed) => removed,
                Err(e) => {
                    warn!(file_id, error = %e, "delete aborted");
                    return Err(e);
                }
            };

            for (part, ok) in batch.iter().zip(removed).rev() {
                if ok {
                    self.parts.erase(file_id, part.index);
                    report.removed += 1;
                } else {
                    warn!(file_id, index = part.index, "part file could not be removed");
                    report.failed += 1;
                }
            }
        }

        self.files.remove(file_id);
        if report.is_complete() {
            self.parts.remove_file(file_id);
        }

        info!(
            file_id,
            name = %file.name.display(),
            removed = report.removed,
            failed = report.failed,
            "delete completed"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::*;
    use crate::config::StoreConfig;
    use crate::error::StoreError;

    fn store(dir: &Path) -> Store {
        let config = StoreConfig::new(dir.join("parts"), 1, 2)
            .unwrap()
            .with_part_size(8)
            .with_batch_size(4);
        Store::open(config).unwrap()
    }

    #[test]
    fn test_delete_removes_everything() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let source = dir.path().join("src.bin");
        fs::write(&source, vec![3u8; 8 * 10 + 1]).unwrap();
        let id = store.put(&source).unwrap();
        let paths: Vec<_> = store.parts(id).iter().map(|p| store.part_path(p)).collect();
        assert_eq!(paths.len(), 11);

        let report = store.delete(id).unwrap();
        assert_eq!(report, DeleteReport { removed: 11, failed: 0 });
        assert!(store.file(id).is_none());
        assert!(store.parts(id).is_empty());
        assert!(paths.iter().all(|p| !p.exists()));
    }

    #[test]
    fn test_failed_removal_leaves_residue() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let source = dir.path().join("src.bin");
        fs::write(&source, vec![3u8; 8 * 6]).unwrap();
        let id = store.put(&source).unwrap();

        // Part 5 is already gone, so its removal fails
        let parts = store.parts(id);
        fs::remove_file(store.part_path(&parts[5])).unwrap();

        let report = store.delete(id).unwrap();
        assert_eq!(report.removed, 5);
        assert_eq!(report.failed, 1);
        assert!(!report.is_complete());
        assert!(store.file(id).is_none());

        let residue = store.parts(id);
        assert_eq!(residue.len(), 1);
        assert_eq!(residue[0].index, 5);
        assert!(!residue[0].written);
    }

    #[test]
    fn test_delete_requires_ready_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        assert!(matches!(store.delete(0), Err(StoreError::NotFound { .. })));

        let _ = store.put(dir.path().join("missing.bin"));
        assert!(matches!(store.delete(0), Err(StoreError::NotReady { .. })));
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_delete_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let source = dir.path().join("empty.bin");
        fs::write(&source, b"").unwrap();
        let id = store.put(&source).unwrap();

        let report = store.delete(id).unwrap();
        assert_eq!(report, DeleteReport::default());
        assert!(store.list().is_empty());
    }
}
