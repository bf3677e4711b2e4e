//! Storage module for persisting mirrored resources
//!
//! This module handles everything that touches the destination directory:
//! - The write collaborator used by the crawl driver
//! - Wiping a destination before a crawl
//! - Copying local files over a finished mirror

mod fs;
mod maintenance;
mod traits;

pub use fs::FsStorage;
pub use maintenance::{copy_dir, empty_dir};
pub use traits::{Storage, StorageError, StorageResult};
