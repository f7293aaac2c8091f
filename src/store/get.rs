//! Get pipeline: reassemble a stored file from its parts.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use super::Store;
use crate::error::{Result, StoreError};
use crate::part::{File, FileId, FilePart};
use crate::worker::LoadItem;

impl Store {
    /// Restores a ready file to the path it was stored from.
    ///
    /// Returns the number of bytes written.
    pub fn get(&self, file_id: FileId) -> Result<u64> {
        let file = self.files.ready(file_id)?;
        let dest = file.name.clone();
        self.restore(&file, &dest)
    }

    /// Restores a ready file to `dest`.
    ///
    /// Returns the number of bytes written.
    pub fn get_into(&self, file_id: FileId, dest: impl AsRef<Path>) -> Result<u64> {
        let file = self.files.ready(file_id)?;
        self.restore(&file, dest.as_ref())
    }

    /// Parts are loaded one batch at a time under a memory reservation, and
    /// every part of a batch is verified before any of it is written. On an
    /// integrity failure the destination keeps the batches already written.
    fn restore(&self, file: &File, dest: &Path) -> Result<u64> {
        let parts = self.parts.snapshot(file.id);
        let mut writer = BufWriter::new(fs::File::create(dest)?);

        let copied = self.copy_parts(file.id, &parts, &mut writer);
        let flushed = writer.flush();
        match copied {
            Ok(written) => {
                flushed?;
                info!(file_id = file.id, dest = %dest.display(), bytes = written, "get completed");
                Ok(written)
            }
            Err(e) => {
                warn!(file_id = file.id, dest = %dest.display(), error = %e, "get aborted");
                Err(e)
            }
        }
    }

    fn copy_parts(
        &self,
        file_id: FileId,
        parts: &[FilePart],
        writer: &mut impl Write,
    ) -> Result<u64> {
        let mut written = 0u64;

        for batch in parts.chunks(self.config.batch_size()) {
            let reservation = self.budget.reserve(self.config.batch_bytes())?;

            let items = batch
                .iter()
                .map(|part| {
                    let hash = part.hash.ok_or(StoreError::PartNotWritten {
                        file_id,
                        index: part.index,
                    })?;
                    Ok(LoadItem {
                        hash,
                        path: self.part_path(part),
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            let loaded = self.pool.load(items)?;
            let verified = batch
                .iter()
                .zip(loaded)
                .map(|(part, data)| {
                    data.ok_or(StoreError::IntegrityMismatch {
                        file_id,
                        index: part.index,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            for data in &verified {
                writer.write_all(data)?;
                written += data.len() as u64;
            }
            debug!(
                file_id,
                first_index = batch[0].index,
                parts = batch.len(),
                reserved = reservation.amount(),
                "batch restored"
            );
            drop(reservation);
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;

    fn store(dir: &Path) -> Store {
        let config = StoreConfig::new(dir.join("parts"), 1, 2)
            .unwrap()
            .with_part_size(16)
            .with_batch_size(3);
        Store::open(config).unwrap()
    }

    #[test]
    fn test_get_unknown_and_pending() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        assert!(matches!(
            store.get(7),
            Err(StoreError::NotFound { file_id: 7 })
        ));

        // A failed put leaves a pending entry
        let _ = store.put(dir.path().join("missing.bin"));
        assert!(matches!(
            store.get_into(0, dir.path().join("out.bin")),
            Err(StoreError::NotReady { file_id: 0 })
        ));
        assert!(!dir.path().join("out.bin").exists());
    }

    #[test]
    fn test_get_overwrites_recorded_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let source = dir.path().join("src.bin");
        let data: Vec<u8> = (0..100u8).collect();
        fs::write(&source, &data).unwrap();

        let id = store.put(&source).unwrap();
        fs::write(&source, b"clobbered").unwrap();

        assert_eq!(store.get(id).unwrap(), 100);
        assert_eq!(fs::read(&source).unwrap(), data);
    }

    #[cfg(unix)]
    #[test]
    fn test_get_restores_non_utf8_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let source = dir.path().join(OsStr::from_bytes(b"data\xff.bin"));
        fs::write(&source, b"payload").unwrap();

        let id = store.put(&source).unwrap();
        assert_eq!(store.file(id).unwrap().name, source);
        fs::remove_file(&source).unwrap();

        assert_eq!(store.get(id).unwrap(), 7);
        assert_eq!(fs::read(&source).unwrap(), b"payload");
        assert_eq!(store.list(), vec![(id, source)]);
    }

    #[test]
    fn test_missing_part_file_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let source = dir.path().join("src.bin");
        fs::write(&source, vec![5u8; 64]).unwrap();
        let id = store.put(&source).unwrap();

        let last = store.parts(id).pop().unwrap();
        fs::remove_file(store.part_path(&last)).unwrap();

        let err = store.get_into(id, dir.path().join("out.bin")).unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
        assert_eq!(store.budget().usage(), 0);
    }
}
