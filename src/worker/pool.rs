//! Worker pool with synchronous batch calls.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use bytes::Bytes;
use parking_lot::RwLock;
use rayon::prelude::*;
use tracing::{debug, info};

use super::codec;
use crate::error::{Result, StoreError};
use crate::part::PartHash;

/// One part to persist.
#[derive(Debug, Clone)]
pub struct SaveItem {
    /// Uncompressed part bytes.
    pub data: Bytes,
    /// Destination file.
    pub path: PathBuf,
}

/// One part to restore.
#[derive(Debug, Clone)]
pub struct LoadItem {
    /// Digest recorded when the part was saved.
    pub hash: PartHash,
    /// Stored file.
    pub path: PathBuf,
}

/// A fixed set of I/O threads executing part batches.
///
/// Every batch call blocks until all of its items finish and returns one
/// result per item in input order. Concurrent callers share the threads;
/// each batch is independent.
///
/// Callers hold a shared guard on the pool for the duration of a batch.
/// [`WorkerPool::shutdown`] takes the exclusive guard, so it waits for
/// in-flight batches before dropping the threads.
#[derive(Debug)]
pub struct WorkerPool {
    pool: RwLock<Option<rayon::ThreadPool>>,
    workers: usize,
    lock_timeout: Duration,
}

impl WorkerPool {
    /// Starts `workers` I/O threads.
    ///
    /// # Arguments
    ///
    /// * `workers` - Thread count (already clamped by the caller)
    /// * `lock_timeout` - Bounded wait for access to the pool
    pub fn new(workers: usize, lock_timeout: Duration) -> Result<Self> {
        let workers = workers.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("partstore-io-{i}"))
            .build()?;
        debug!(workers, "worker pool started");
        Ok(Self {
            pool: RwLock::new(Some(pool)),
            workers,
            lock_timeout,
        })
    }

    fn run<T, F>(&self, job: F) -> Result<T>
    where
        F: FnOnce() -> T + Send,
        T: Send,
    {
        let guard = self
            .pool
            .try_read_for(self.lock_timeout)
            .ok_or(StoreError::LockTimeout {
                resource: "worker pool",
            })?;
        let pool = guard.as_ref().ok_or(StoreError::PoolClosed)?;
        Ok(pool.install(job))
    }

    /// Compresses and writes each item, returning digests in input order.
    ///
    /// Fails if any item fails.
    pub fn save(&self, items: Vec<SaveItem>) -> Result<Vec<PartHash>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }
        let hashes = self.run(|| {
            items
                .par_iter()
                .map(|item| codec::save_part(&item.data, &item.path))
                .collect::<io::Result<Vec<_>>>()
        })??;
        Ok(hashes)
    }

    /// Reads and verifies each item. `None` marks an integrity failure.
    ///
    /// Fails if any part file cannot be read.
    pub fn load(&self, items: Vec<LoadItem>) -> Result<Vec<Option<Bytes>>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }
        let parts = self.run(|| {
            items
                .par_iter()
                .map(|item| codec::load_part(&item.hash, &item.path))
                .collect::<io::Result<Vec<_>>>()
        })??;
        Ok(parts)
    }

    /// Deletes each path; `false` marks a failed removal.
    pub fn remove(&self, paths: Vec<PathBuf>) -> Result<Vec<bool>> {
        if paths.is_empty() {
            return Ok(Vec::new());
        }
        self.run(|| {
            paths
                .par_iter()
                .map(|path| codec::remove_part(path))
                .collect()
        })
    }

    /// Number of I/O threads.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Returns true once [`WorkerPool::shutdown`] has run.
    pub fn is_closed(&self) -> bool {
        self.pool.read().is_none()
    }

    /// Waits for in-flight batches, then stops the threads. Idempotent.
    pub fn shutdown(&self) {
        let pool = self.pool.write().take();
        if pool.is_some() {
            info!(workers = self.workers, "worker pool shut down");
        }
    }
}
