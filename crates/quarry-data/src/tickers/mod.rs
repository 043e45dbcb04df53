//! SEC ticker directory and fuzzy company search.
//!
//! The directory is the universe of `(CIK, ticker, name)` triples published
//! by the SEC. It is loaded once per snapshot store: a file-backed JSON
//! snapshot is consulted first and the SEC bulk endpoint is only hit on a
//! cache miss. Search ranks directory entries against a free-text query
//! using a tiered match policy (see [`search`]).

pub mod directory;
pub mod search;

use serde::{Deserialize, Serialize};

pub use directory::{JsonSnapshotStore, SecTickerFeed, SnapshotStore, TickerDirectory, TickerFeed};
pub use search::rank;

/// One company in the SEC ticker directory.
///
/// Immutable once loaded; the full set forms a directory snapshot that is
/// replaced wholesale on refresh, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Central Index Key, the SEC's stable company identifier.
    pub cik: String,
    /// Ticker symbol, uppercase.
    pub ticker: String,
    /// Registered company name.
    pub name: String,
}

impl Company {
    /// Create a company record, normalizing the ticker to uppercase.
    pub fn new(cik: impl Into<String>, ticker: &str, name: impl Into<String>) -> Self {
        Self {
            cik: cik.into(),
            ticker: ticker.to_uppercase(),
            name: name.into(),
        }
    }
}
