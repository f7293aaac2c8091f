//! Error types for partstore.

use std::time::Duration;

use crate::part::FileId;

/// Convenience alias used across the crate.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// Errors that can occur while storing, restoring or deleting files.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An I/O error occurred while reading a source, writing a destination,
    /// or touching a part file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file could not be parsed.
    #[error("config parse error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// A bounded lock acquisition expired.
    #[error("lock timeout acquiring {resource}")]
    LockTimeout {
        /// Which lock could not be acquired.
        resource: &'static str,
    },

    /// The memory budget did not admit a reservation before the deadline.
    #[error("memory admission timed out after {waited:?} waiting for {requested} bytes")]
    AdmissionTimeout {
        /// Bytes requested.
        requested: u64,
        /// Time spent waiting.
        waited: Duration,
    },

    /// A reservation can never fit the configured limit.
    #[error("reservation of {requested} bytes can never fit a limit of {limit} bytes")]
    BudgetTooSmall {
        /// Bytes requested.
        requested: u64,
        /// Configured limit.
        limit: u64,
    },

    /// No file with this id is registered.
    #[error("file {file_id} does not exist")]
    NotFound {
        /// The requested id.
        file_id: FileId,
    },

    /// The file exists but is still being written or is being deleted.
    #[error("file {file_id} is not ready")]
    NotReady {
        /// The requested id.
        file_id: FileId,
    },

    /// A stored part failed to decompress or its digest did not match.
    #[error("integrity check failed for file {file_id} part {index}")]
    IntegrityMismatch {
        /// Owning file.
        file_id: FileId,
        /// Position of the corrupted part.
        index: usize,
    },

    /// A ready file references a part that has no recorded digest.
    #[error("file {file_id} part {index} was never written")]
    PartNotWritten {
        /// Owning file.
        file_id: FileId,
        /// Position of the part.
        index: usize,
    },

    /// The worker pool has been shut down.
    #[error("worker pool is shut down")]
    PoolClosed,

    /// The worker pool could not be started.
    #[error("failed to build worker pool: {0}")]
    PoolBuild(#[from] rayon::ThreadPoolBuildError),
}

/// Rejections produced while parsing an operator command line.
///
/// None of these touch the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// Blank input line.
    #[error("Unknown command.")]
    Empty,

    /// The line is not valid UTF-8.
    #[error("Unknown command: input is not valid UTF-8.")]
    InvalidEncoding,

    /// The first word is not a known command.
    #[error("Unknown command: {0}.")]
    Unknown(String),

    /// Too many or too few arguments.
    #[error("Wrong arguments for {command} command.")]
    WrongArity {
        /// The command name.
        command: &'static str,
    },

    /// The id argument is not a non-negative integer.
    #[error("{command}: invalid file id '{raw}'.")]
    InvalidId {
        /// The command name.
        command: &'static str,
        /// The offending argument.
        raw: String,
    },
}
