//! The store: registries, memory budget and worker pool wired together, plus
//! the put, get and delete pipelines.
//!
//! # Example
//!
//! ```no_run
//! use partstore::{Store, StoreConfig};
//!
//! fn main() -> partstore::Result<()> {
//!     let store = Store::open(StoreConfig::new("./parts", 16, 4)?)?;
//!
//!     let id = store.put("data.bin")?;
//!     store.get_into(id, "restored.bin")?;
//!     store.delete(id)?;
//!
//!     store.shutdown();
//!     Ok(())
//! }
//! ```

mod delete;
mod get;
mod put;

use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::budget::MemoryBudget;
use crate::config::StoreConfig;
use crate::error::Result;
use crate::part::{File, FileId, FilePart};
use crate::registry::{FileRegistry, PartRegistry};
use crate::worker::WorkerPool;

pub use delete::DeleteReport;

/// Chunked object store.
///
/// All methods take `&self`; share a `Store` across threads with `Arc`.
#[derive(Debug)]
pub struct Store {
    config: StoreConfig,
    files: FileRegistry,
    parts: PartRegistry,
    budget: MemoryBudget,
    pool: WorkerPool,
}

impl Store {
    /// Validates `config`, creates the parts directory, and starts the workers.
    pub fn open(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        fs::create_dir_all(config.parts_directory())?;

        let lock_timeout = config.lock_timeout();
        let pool = WorkerPool::new(config.io_workers(), lock_timeout)?;
        let budget = MemoryBudget::new(
            config.memory_limit(),
            lock_timeout,
            config.admission_timeout(),
        );

        info!(
            parts_directory = %config.parts_directory().display(),
            memory_limit = config.memory_limit(),
            workers = pool.workers(),
            "store opened"
        );

        Ok(Self {
            files: FileRegistry::new(lock_timeout),
            parts: PartRegistry::new(lock_timeout),
            budget,
            pool,
            config,
        })
    }

    /// Returns `(id, name)` for every registered file, ordered by id.
    ///
    /// Includes files still being written or deleted.
    pub fn list(&self) -> Vec<(FileId, PathBuf)> {
        self.files.list()
    }

    /// Returns a copy of a file record.
    pub fn file(&self, file_id: FileId) -> Option<File> {
        self.files.get(file_id)
    }

    /// Returns a copy of a file's part sequence.
    pub fn parts(&self, file_id: FileId) -> Vec<FilePart> {
        self.parts.snapshot(file_id)
    }

    /// Location of a part file.
    pub fn part_path(&self, part: &FilePart) -> PathBuf {
        self.config.parts_directory().join(part.file_name())
    }

    /// The shared memory budget.
    pub fn budget(&self) -> &MemoryBudget {
        &self.budget
    }

    /// The configuration this store was opened with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Waits for in-flight batches and stops the I/O workers.
    ///
    /// Later put, get and delete calls fail with
    /// [`StoreError::PoolClosed`](crate::StoreError::PoolClosed).
    pub fn shutdown(&self) {
        self.pool.shutdown();
    }
}
