//! Page state definitions for the crawl ledger
//!
//! Every URL that was ever queued carries exactly one of these states.

use std::fmt;

/// Represents where a URL stands in the mirror process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageState {
    // ===== Active States =====
    /// Queued and waiting to be fetched
    Queued,

    /// Fetched and processed; the write has not happened yet
    Fetched,

    // ===== Terminal Success States =====
    /// Persisted under the destination root
    Written,

    // ===== Terminal Not-Written States =====
    /// The fetch collaborator reported a failure
    FetchFailed,

    /// The item hook rejected the page, so it was never written
    Vetoed,

    /// The write collaborator reported a failure
    WriteFailed,
}

impl PageState {
    /// Returns true if no further processing will happen for this URL
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Queued | Self::Fetched)
    }

    /// Returns true if the page ended up on disk
    ///
    /// This is the boolean outcome reported by a crawl.
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written)
    }

    /// Returns true if the page was given up on
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::FetchFailed | Self::WriteFailed)
    }

    /// Converts the page state to its manifest representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Fetched => "fetched",
            Self::Written => "written",
            Self::FetchFailed => "fetch_failed",
            Self::Vetoed => "vetoed",
            Self::WriteFailed => "write_failed",
        }
    }

    /// Parses a page state from its manifest representation
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "queued" => Some(Self::Queued),
            "fetched" => Some(Self::Fetched),
            "written" => Some(Self::Written),
            "fetch_failed" => Some(Self::FetchFailed),
            "vetoed" => Some(Self::Vetoed),
            "write_failed" => Some(Self::WriteFailed),
            _ => None,
        }
    }

    /// Returns all possible page states
    pub fn all_states() -> [Self; 6] {
        [
            Self::Queued,
            Self::Fetched,
            Self::Written,
            Self::FetchFailed,
            Self::Vetoed,
            Self::WriteFailed,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}
