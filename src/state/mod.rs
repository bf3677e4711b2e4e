//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: Where a single URL stands (queued, written, failed, ...)
//! - `CrawlLedger`: FIFO crawl queue plus the per-URL deduplication ledger

mod ledger;
mod page_state;

// Re-export main types
pub use ledger::CrawlLedger;
pub use page_state::PageState;
