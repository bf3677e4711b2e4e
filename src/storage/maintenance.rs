//! Directory maintenance utilities
//!
//! Neither utility takes part in a crawl; the binary uses them to wipe a
//! destination before mirroring and to lay local files over a finished mirror.

use crate::storage::traits::{StorageError, StorageResult};
use std::fs;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Removes everything inside `dir`, children before parents
///
/// With `delete_self` the directory itself is removed too. Symlinks are
/// removed, never followed.
pub fn empty_dir(dir: &Path, delete_self: bool) -> StorageResult<()> {
    for entry in WalkDir::new(dir).min_depth(1).contents_first(true) {
        let entry = entry?;
        if entry.file_type().is_dir() {
            fs::remove_dir(entry.path())?;
        } else {
            fs::remove_file(entry.path())?;
        }
    }

    if delete_self {
        fs::remove_dir(dir)?;
    }

    Ok(())
}

/// Recursively copies `src` into `dst`
///
/// Files whose extension matches `skip_extension` (case-insensitive) and
/// dotfiles are left out; dot-directories are not descended into.
///
/// # Returns
///
/// The number of files copied
pub fn copy_dir(src: &Path, dst: &Path, skip_extension: &str) -> StorageResult<u64> {
    fs::create_dir_all(dst)?;

    let mut copied = 0;
    let walker = WalkDir::new(src)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry));

    for entry in walker {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| StorageError::Walk {
                path: entry.path().to_path_buf(),
                message: e.to_string(),
            })?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if !has_extension(entry.path(), skip_extension) {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }

    Ok(copied)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}
