//! Watchlist persistence.
//!
//! The watchlist is the only mutable named collection in the system: an
//! ordered, deduplicated set of uppercase ticker symbols in a plain text
//! file. Blank lines and `#` comments are ignored on load; entries may be
//! comma- or whitespace-separated on one line. Saving always writes one
//! symbol per line under a fixed header.

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Header written at the top of every saved watchlist.
const HEADER: &str = "# Stock watchlist\n# One ticker per line, or comma-separated\n\n";

/// File-backed watchlist of ticker symbols.
#[derive(Debug, Clone)]
pub struct Watchlist {
    path: PathBuf,
}

impl Watchlist {
    /// Create a watchlist backed by the given file.
    ///
    /// The file is created on first add, not here.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the ticker list; a missing file is an empty watchlist.
    pub fn load(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.path)?;
        Ok(parse(&text))
    }

    /// Replace the watchlist contents wholesale.
    pub fn save(&self, tickers: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut content = String::from(HEADER);
        for ticker in tickers {
            content.push_str(&ticker.to_uppercase());
            content.push('\n');
        }
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Add a ticker. Returns `false` (without writing) when the symbol is
    /// empty or already present.
    pub fn add(&self, ticker: &str) -> Result<bool> {
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Ok(false);
        }

        let mut tickers = self.load()?;
        if tickers.contains(&ticker) {
            return Ok(false);
        }

        tickers.push(ticker);
        self.save(&tickers)?;
        Ok(true)
    }

    /// Remove a ticker. Returns `false` when the symbol was not present.
    pub fn remove(&self, ticker: &str) -> Result<bool> {
        let ticker = ticker.trim().to_uppercase();
        let mut tickers = self.load()?;

        let before = tickers.len();
        tickers.retain(|t| *t != ticker);
        if tickers.len() == before {
            return Ok(false);
        }

        self.save(&tickers)?;
        Ok(true)
    }
}

/// Parse watchlist text: skip blanks and comments, split commas and
/// whitespace, uppercase, dedup preserving first-seen order.
fn parse(text: &str) -> Vec<String> {
    let mut tickers: Vec<String> = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        for entry in line.replace(',', " ").split_whitespace() {
            let ticker = entry.trim().to_uppercase();
            if !ticker.is_empty() && !tickers.contains(&ticker) {
                tickers.push(ticker);
            }
        }
    }
    tickers
}
