//! Crawl queue and deduplication ledger
//!
//! The queue holds canonical URLs awaiting fetch in FIFO order; the ledger
//! maps every URL ever queued to its [`PageState`]. A URL gets its ledger
//! entry at enqueue time and is never queued twice.

use crate::state::PageState;
use std::collections::{BTreeMap, HashMap, VecDeque};

/// Queue plus ledger for one crawl session
#[derive(Debug, Default)]
pub struct CrawlLedger {
    /// Canonical URLs awaiting fetch
    queue: VecDeque<String>,

    /// Outcome per canonical URL
    entries: HashMap<String, PageState>,
}

impl CrawlLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `url` unless the ledger already knows it
    ///
    /// Check and insert happen together, so a URL is queued at most once.
    ///
    /// # Returns
    ///
    /// `true` if the URL was queued, `false` if it was already known
    pub fn enqueue(&mut self, url: String) -> bool {
        if self.entries.contains_key(&url) {
            return false;
        }

        self.entries.insert(url.clone(), PageState::Queued);
        self.queue.push_back(url);
        true
    }

    /// Takes the oldest queued URL
    pub fn dequeue(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    /// Records the current state of a known URL
    ///
    /// Unknown URLs are ignored: every entry originates at enqueue time.
    pub fn mark(&mut self, url: &str, state: PageState) {
        if let Some(entry) = self.entries.get_mut(url) {
            *entry = state;
        } else {
            tracing::warn!("Ignoring state {} for unknown URL {}", state, url);
        }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    pub fn state(&self, url: &str) -> Option<PageState> {
        self.entries.get(url).copied()
    }

    /// Number of URLs waiting in the queue
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn queue_is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of URLs the ledger knows about
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All ledger entries, ordered by URL
    pub fn entries(&self) -> BTreeMap<&str, PageState> {
        self.entries
            .iter()
            .map(|(url, state)| (url.as_str(), *state))
            .collect()
    }

    /// URL to "was written" mapping, ordered by URL
    pub fn outcomes(&self) -> BTreeMap<String, bool> {
        self.entries
            .iter()
            .map(|(url, state)| (url.clone(), state.is_written()))
            .collect()
    }

    /// Number of entries currently in `state`
    pub fn count(&self, state: PageState) -> usize {
        self.entries.values().filter(|s| **s == state).count()
    }
}
