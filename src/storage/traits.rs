//! Storage traits and error types
//!
//! This module defines the write collaborator used by the crawl driver and
//! its error type.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to walk {}: {message}", path.display())]
    Walk { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<walkdir::Error> for StorageError {
    fn from(e: walkdir::Error) -> Self {
        let path = e.path().map(Path::to_path_buf).unwrap_or_default();
        StorageError::Walk {
            path,
            message: e.to_string(),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Byte-level persistence of mirrored resources
///
/// Implementations must create missing parent directories. The crawl driver
/// records a failed write as a not-written page and keeps going.
pub trait Storage: Send + Sync {
    /// Writes `data` to `path`, replacing any existing file
    fn write(&self, path: &Path, data: &[u8]) -> StorageResult<()>;
}
