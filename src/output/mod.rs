//! Output module for crawl summaries and reports
//!
//! This module handles:
//! - Building a summary from a finished mirror session
//! - Writing a markdown report
//! - Recording the ledger in a SQLite manifest
//! - Printing statistics to stdout

mod markdown;
mod sqlite_output;
pub mod stats;
mod traits;

pub use markdown::{format_markdown_summary, generate_markdown_summary, MarkdownReport};
pub use sqlite_output::{initialize_schema, open_manifest, SqliteManifest};
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{CrawlSummary, OutputError, OutputResult, PageOutcome, ReportWriter};

use crate::crawler::Mirror;
use crate::state::PageState;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Generates a crawl summary from a mirror session
///
/// # Arguments
///
/// * `mirror` - The session whose ledger is summarized
/// * `destination` - Where the mirror was written
/// * `started_at` - When the crawl started
/// * `finished_at` - When the crawl finished
/// * `config_hash` - Hash of the configuration that drove the crawl
pub fn generate_summary(
    mirror: &Mirror,
    destination: &Path,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    config_hash: &str,
) -> CrawlSummary {
    let ledger = mirror.ledger();
    let count = |state| ledger.count(state) as u64;

    let pages = ledger
        .entries()
        .into_iter()
        .map(|(url, state)| PageOutcome {
            url: url.to_string(),
            local_path: mirror.local_path(url),
            state,
        })
        .collect();

    CrawlSummary {
        site_root: mirror.root().as_str().to_string(),
        destination: destination.display().to_string(),
        started_at: started_at.to_rfc3339(),
        finished_at: finished_at.to_rfc3339(),
        duration_seconds: (finished_at - started_at).num_seconds().max(0) as u64,
        config_hash: config_hash.to_string(),
        total_pages: ledger.len() as u64,
        pages_written: count(PageState::Written),
        pages_fetch_failed: count(PageState::FetchFailed),
        pages_vetoed: count(PageState::Vetoed),
        pages_write_failed: count(PageState::WriteFailed),
        pages,
    }
}
