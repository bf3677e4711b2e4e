//! Filesystem storage backend

use crate::storage::traits::{Storage, StorageError, StorageResult};
use std::fs;
use std::path::Path;

/// Writes mirrored resources to the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

impl FsStorage {
    pub fn new() -> Self {
        Self
    }
}

impl Storage for FsStorage {
    fn write(&self, path: &Path, data: &[u8]) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                fs::create_dir_all(parent).map_err(|source| StorageError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        fs::write(path, data).map_err(|source| StorageError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
