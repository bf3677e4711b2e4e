//! Report writer trait and crawl summary types
//!
//! This module defines the trait interface for report writers and the
//! summary they are given once a crawl has finished.

use crate::state::PageState;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Final state of one mirrored URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOutcome {
    /// Canonical URL
    pub url: String,

    /// Path relative to the mirror root
    pub local_path: String,

    pub state: PageState,
}

impl PageOutcome {
    pub fn written(&self) -> bool {
        self.state.is_written()
    }
}

/// Summary of one crawl
#[derive(Debug, Clone, Default)]
pub struct CrawlSummary {
    // Run metadata
    pub site_root: String,
    pub destination: String,
    pub started_at: String,
    pub finished_at: String,
    pub duration_seconds: u64,
    pub config_hash: String,

    // Counts
    pub total_pages: u64,
    pub pages_written: u64,
    pub pages_fetch_failed: u64,
    pub pages_vetoed: u64,
    pub pages_write_failed: u64,

    /// Every URL of the session, sorted by URL
    pub pages: Vec<PageOutcome>,
}

impl CrawlSummary {
    /// Creates a new empty crawl summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Pages that were fetched or written unsuccessfully
    pub fn total_failed(&self) -> u64 {
        self.pages_fetch_failed + self.pages_write_failed
    }

    /// Returns the share of written pages as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_pages == 0 {
            return 0.0;
        }
        (self.pages_written as f64 / self.total_pages as f64) * 100.0
    }

    /// Pages that ended in a failure state
    pub fn failed_pages(&self) -> impl Iterator<Item = &PageOutcome> {
        self.pages.iter().filter(|page| page.state.is_failure())
    }
}

/// Persists a crawl summary somewhere
pub trait ReportWriter {
    fn write_report(&self, summary: &CrawlSummary) -> OutputResult<()>;
}
