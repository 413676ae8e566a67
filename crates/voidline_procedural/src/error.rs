//! # Procedural Error Types
//!
//! Generation itself is infallible. Only loading tables from disk and
//! talking to the background worker can fail.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading configuration tables.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The text is not valid TOML for the target table.
    #[error("malformed table: {0}")]
    Parse(#[from] toml::de::Error),

    /// The table parsed but describes something unusable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised by [`ZoneWorker`](crate::worker::ZoneWorker).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerError {
    /// The worker thread is gone.
    #[error("zone worker disconnected")]
    Disconnected,

    /// The worker was shut down and accepts no more requests.
    #[error("zone worker already shut down")]
    ShutDown,
}

/// Result type for worker operations.
pub type WorkerResult<T> = Result<T, WorkerError>;
