//! Statistics over a crawl ledger
//!
//! This module extracts per-state counts from the crawl ledger and prints
//! them to stdout at the end of a run.

use crate::state::{CrawlLedger, PageState};
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// Number of URLs in the ledger
    pub total_pages: u64,

    /// Count of pages by state; states without pages are left out
    pub pages_by_state: BTreeMap<PageState, u64>,

    /// URLs still waiting in the queue
    pub queued: u64,
}

impl CrawlStatistics {
    /// Counts the ledger's entries by state
    pub fn from_ledger(ledger: &CrawlLedger) -> Self {
        let pages_by_state = PageState::all_states()
            .into_iter()
            .map(|state| (state, ledger.count(state) as u64))
            .filter(|(_, count)| *count > 0)
            .collect();

        Self {
            total_pages: ledger.len() as u64,
            pages_by_state,
            queued: ledger.queue_len() as u64,
        }
    }

    pub fn count(&self, state: PageState) -> u64 {
        self.pages_by_state.get(&state).copied().unwrap_or(0)
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Mirror Statistics ===\n");

    println!("Overview:");
    println!("  Total URLs: {}", stats.total_pages);
    if stats.queued > 0 {
        println!("  Still queued: {}", stats.queued);
    }
    println!();

    println!("URLs by State:");
    // Sort states by count (descending)
    let mut state_counts: Vec<_> = stats.pages_by_state.iter().collect();
    state_counts.sort_by(|a, b| b.1.cmp(a.1));

    for (state, count) in state_counts {
        let percentage = if stats.total_pages > 0 {
            (*count as f64 / stats.total_pages as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", state, count, percentage);
    }
    println!();

    let written = stats.count(PageState::Written);
    let success_rate = if stats.total_pages > 0 {
        (written as f64 / stats.total_pages as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} URLs written)",
        success_rate, written, stats.total_pages
    );
}
