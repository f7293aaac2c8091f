//! Put pipeline: split a source file into parts and persist them.

use std::fs;
use std::io::BufReader;
use std::path::Path;

use tracing::{debug, info, warn};

use super::Store;
use crate::chunker::PartReader;
use crate::error::Result;
use crate::part::{File, FileId, FilePart};
use crate::worker::SaveItem;

impl Store {
    /// Stores the file at `source` and returns its id.
    ///
    /// The file is registered (not ready) before any data is read. Parts are
    /// read, written and hashed one batch at a time, each batch under its own
    /// memory reservation. On success the file becomes ready with its part
    /// count set.
    ///
    /// On failure the reservation in hand is released and the file stays
    /// registered as not ready; it has to be deleted explicitly.
    pub fn put(&self, source: impl AsRef<Path>) -> Result<FileId> {
        let source = source.as_ref();
        let file_id = self.files.allocate_id()?;
        self.files.insert(File::new(file_id, source));
        self.parts.init(file_id);

        match self.write_parts(file_id, source) {
            Ok(part_count) => {
                self.files.complete(file_id, part_count)?;
                info!(file_id, source = %source.display(), part_count, "put completed");
                Ok(file_id)
            }
            Err(e) => {
                warn!(file_id, source = %source.display(), error = %e, "put aborted");
                Err(e)
            }
        }
    }

    fn write_parts(&self, file_id: FileId, source: &Path) -> Result<usize> {
        let part_size = self.config.part_size();
        let batch_size = self.config.batch_size();
        let mut reader = PartReader::new(BufReader::new(fs::File::open(source)?), part_size);
        let mut next_index = 0;

        loop {
            let reservation = self.budget.reserve(self.config.batch_bytes())?;

            let batch = reader.next_batch(batch_size)?;
            if batch.is_empty() {
                break;
            }

            let first_index = next_index;
            let mut staged = Vec::with_capacity(batch.len());
            for data in batch {
                let part = FilePart::new(self.parts.allocate_id()?, file_id, next_index);
                staged.push(SaveItem {
                    data,
                    path: self.part_path(&part),
                });
                self.parts.append(part)?;
                next_index += 1;
            }

            let hashes = self.pool.save(staged)?;
            self.parts.mark_written(file_id, first_index, &hashes)?;
            debug!(
                file_id,
                first_index,
                parts = hashes.len(),
                reserved = reservation.amount(),
                "batch written"
            );
            drop(reservation);

            if reader.is_finished() {
                break;
            }
        }

        Ok(self.parts.count(file_id))
    }
}
