//! Configuration for the store.
//!
//! - [`StoreConfig`] - Parts directory, memory budget, worker count, part and
//!   batch sizes, and the bounded waits used by locks and admission.
//!
//! # Example
//!
//! ```
//! use partstore::StoreConfig;
//!
//! let config = StoreConfig::new("/tmp/parts", 64, 4)?
//!     .with_batch_size(16);
//! assert_eq!(config.batch_bytes(), 16 * 1024);
//! # Ok::<(), partstore::StoreError>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, StoreError};

/// Default part size (1 KiB).
pub const DEFAULT_PART_SIZE: usize = 1024;

/// Default number of parts per batch.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Default bounded wait for id locks and the worker pool (5 s).
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5_000;

/// Default deadline for a memory reservation (60 s).
pub const DEFAULT_ADMISSION_TIMEOUT_MS: u64 = 60_000;

const MIB: u64 = 1024 * 1024;

/// Configuration for a [`Store`](crate::Store).
///
/// Loaded from YAML:
///
/// ```yaml
/// parts_directory: ./parts
/// max_memory: 16      # MiB
/// io_processes: 4
/// ```
///
/// `part_size`, `batch_size`, `lock_timeout_ms` and `admission_timeout_ms`
/// are optional and fall back to the defaults above.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the `.PART` files. Created if absent.
    parts_directory: PathBuf,

    /// Memory budget in MiB.
    max_memory: u64,

    /// Requested number of I/O workers, clamped to available CPUs.
    io_processes: usize,

    #[serde(default = "default_part_size")]
    part_size: usize,

    #[serde(default = "default_batch_size")]
    batch_size: usize,

    #[serde(default = "default_lock_timeout_ms")]
    lock_timeout_ms: u64,

    #[serde(default = "default_admission_timeout_ms")]
    admission_timeout_ms: u64,

    /// Budget override in bytes, only settable programmatically.
    #[serde(skip)]
    memory_limit_bytes: Option<u64>,
}

fn default_part_size() -> usize {
    DEFAULT_PART_SIZE
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

fn default_admission_timeout_ms() -> u64 {
    DEFAULT_ADMISSION_TIMEOUT_MS
}

impl StoreConfig {
    /// Creates a validated configuration with default part and batch sizes.
    ///
    /// # Arguments
    ///
    /// * `parts_directory` - Where part files are written
    /// * `max_memory` - Memory budget in MiB
    /// * `io_processes` - Requested worker count
    pub fn new(
        parts_directory: impl Into<PathBuf>,
        max_memory: u64,
        io_processes: usize,
    ) -> Result<Self> {
        let config = Self {
            parts_directory: parts_directory.into(),
            max_memory,
            io_processes,
            part_size: DEFAULT_PART_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
            admission_timeout_ms: DEFAULT_ADMISSION_TIMEOUT_MS,
            memory_limit_bytes: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a YAML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parses and validates a YAML document.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the part size in bytes.
    ///
    /// Note: This does not validate the configuration.
    pub fn with_part_size(mut self, size: usize) -> Self {
        self.part_size = size;
        self
    }

    /// Sets the number of parts per batch.
    ///
    /// Note: This does not validate the configuration.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Sets the bounded wait for id locks and the worker pool.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the deadline after which a pending reservation fails.
    pub fn with_admission_timeout(mut self, timeout: Duration) -> Self {
        self.admission_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Overrides the memory budget with an exact byte count.
    ///
    /// Note: This does not validate the configuration.
    pub fn with_memory_limit_bytes(mut self, limit: u64) -> Self {
        self.memory_limit_bytes = Some(limit);
        self
    }

    /// Returns the parts directory.
    pub fn parts_directory(&self) -> &Path {
        &self.parts_directory
    }

    /// Returns the memory budget in bytes.
    pub fn memory_limit(&self) -> u64 {
        self.memory_limit_bytes
            .unwrap_or_else(|| self.max_memory.saturating_mul(MIB))
    }

    /// Returns the requested worker count.
    pub fn io_processes(&self) -> usize {
        self.io_processes
    }

    /// Returns the worker count actually used: the request clamped to the
    /// number of available CPUs.
    pub fn io_workers(&self) -> usize {
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        self.io_processes.min(cpus).max(1)
    }

    /// Returns the part size in bytes.
    pub fn part_size(&self) -> usize {
        self.part_size
    }

    /// Returns the number of parts per batch.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Bytes reserved for one batch.
    pub fn batch_bytes(&self) -> u64 {
        (self.part_size as u64).saturating_mul(self.batch_size as u64)
    }

    /// Returns the bounded wait for id locks and the worker pool.
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    /// Returns the admission deadline.
    pub fn admission_timeout(&self) -> Duration {
        Duration::from_millis(self.admission_timeout_ms)
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<()> {
        if self.part_size == 0 || self.batch_size == 0 {
            return Err(StoreError::InvalidConfig {
                message: "part_size and batch_size must be non-zero",
            });
        }

        if self.io_processes == 0 {
            return Err(StoreError::InvalidConfig {
                message: "io_processes must be non-zero",
            });
        }

        // Admission requires usage + batch < limit, so the limit must exceed one batch.
        if self.memory_limit() <= self.batch_bytes() {
            return Err(StoreError::InvalidConfig {
                message: "memory limit must exceed one batch of parts",
            });
        }

        if self.lock_timeout_ms == 0 {
            return Err(StoreError::InvalidConfig {
                message: "lock_timeout_ms must be non-zero",
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::new("parts", 1, 2).unwrap();
        assert_eq!(config.part_size(), DEFAULT_PART_SIZE);
        assert_eq!(config.batch_size(), DEFAULT_BATCH_SIZE);
        assert_eq!(config.memory_limit(), 1024 * 1024);
        assert_eq!(config.batch_bytes(), 10 * 1024);
        assert_eq!(config.lock_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_from_yaml() {
        let config = StoreConfig::from_yaml(
            "parts_directory: ./parts\nmax_memory: 8\nio_processes: 3\n",
        )
        .unwrap();
        assert_eq!(config.parts_directory(), Path::new("./parts"));
        assert_eq!(config.memory_limit(), 8 * 1024 * 1024);
        assert_eq!(config.io_processes(), 3);
        assert_eq!(config.part_size(), DEFAULT_PART_SIZE);
    }

    #[test]
    fn test_from_yaml_overrides() {
        let config = StoreConfig::from_yaml(
            "parts_directory: p\nmax_memory: 1\nio_processes: 1\npart_size: 512\nbatch_size: 4\nlock_timeout_ms: 250\n",
        )
        .unwrap();
        assert_eq!(config.part_size(), 512);
        assert_eq!(config.batch_size(), 4);
        assert_eq!(config.lock_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_from_yaml_missing_key() {
        let result = StoreConfig::from_yaml("parts_directory: p\nmax_memory: 1\n");
        assert!(matches!(result, Err(StoreError::Config(_))));
    }

    #[test]
    fn test_invalid_zero_workers() {
        assert!(StoreConfig::new("parts", 1, 0).is_err());
    }

    #[test]
    fn test_invalid_zero_memory() {
        assert!(StoreConfig::new("parts", 0, 1).is_err());
    }

    #[test]
    fn test_limit_must_exceed_batch() {
        let config = StoreConfig::new("parts", 1, 1)
            .unwrap()
            .with_memory_limit_bytes(10 * 1024);
        assert!(config.validate().is_err());

        let config = config.with_memory_limit_bytes(10 * 1024 + 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_huge_timeouts_saturate() {
        let config = StoreConfig::new("parts", 1, 1)
            .unwrap()
            .with_lock_timeout(Duration::MAX)
            .with_admission_timeout(Duration::MAX);
        assert_eq!(config.lock_timeout(), Duration::from_millis(u64::MAX));
        assert_eq!(config.admission_timeout(), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn test_io_workers_clamped() {
        let config = StoreConfig::new("parts", 1, usize::MAX).unwrap();
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(config.io_workers(), cpus);
    }
}
