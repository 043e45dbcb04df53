//! Ticker directory loading and snapshot persistence.

use crate::error::{DataError, Result};
use crate::tickers::{Company, search};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// SEC bulk company tickers endpoint.
const COMPANY_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";

/// Raw entry in the SEC company tickers JSON.
///
/// The SEC returns `{"0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."}, ...}`.
#[derive(Debug, Deserialize)]
struct CompanyTicker {
    /// CIK as a number (SEC returns an integer despite the name)
    cik_str: u64,
    ticker: String,
    title: String,
}

/// Source of the full company universe.
#[async_trait]
pub trait TickerFeed: Send + Sync {
    /// Fetch the complete list of companies.
    async fn fetch(&self) -> Result<Vec<Company>>;
}

/// Persistence for a directory snapshot.
///
/// A snapshot is valid indefinitely; there is no TTL. Invalidation is
/// deleting the backing store.
pub trait SnapshotStore: Send + Sync {
    /// Read the persisted snapshot, if present and readable.
    ///
    /// Absent, corrupt, or empty snapshots all read as `None` (cache miss).
    fn read(&self) -> Option<Vec<Company>>;

    /// Replace the persisted snapshot wholesale.
    fn write(&self, companies: &[Company]) -> Result<()>;
}

/// [`TickerFeed`] backed by the SEC bulk endpoint.
pub struct SecTickerFeed {
    client: reqwest::Client,
}

impl std::fmt::Debug for SecTickerFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecTickerFeed").finish_non_exhaustive()
    }
}

impl SecTickerFeed {
    /// Create a feed using the given HTTP client.
    ///
    /// The client should carry the SEC-required identifying `User-Agent`;
    /// see [`crate::edgar::sec_user_agent`].
    pub const fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TickerFeed for SecTickerFeed {
    async fn fetch(&self) -> Result<Vec<Company>> {
        let response = self.client.get(COMPANY_TICKERS_URL).send().await?;

        if !response.status().is_success() {
            return Err(DataError::Http(format!(
                "Failed to fetch company tickers: HTTP {}",
                response.status()
            )));
        }

        // The document is a map from a meaningless index to company data.
        let data: HashMap<String, CompanyTicker> = response.json().await?;

        let companies = data
            .into_values()
            .map(|raw| Company::new(raw.cik_str.to_string(), &raw.ticker, raw.title))
            .collect();

        Ok(companies)
    }
}

/// [`SnapshotStore`] persisting the snapshot as a single JSON array.
#[derive(Debug, Clone)]
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    /// Create a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonSnapshotStore {
    fn read(&self) -> Option<Vec<Company>> {
        let text = fs::read_to_string(&self.path).ok()?;
        let companies: Vec<Company> = serde_json::from_str(&text).ok()?;
        if companies.is_empty() {
            return None;
        }
        Some(companies)
    }

    fn write(&self, companies: &[Company]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string(companies)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

/// The ticker directory: a cached universe of [`Company`] records.
#[derive(Debug)]
pub struct TickerDirectory<F = SecTickerFeed, S = JsonSnapshotStore> {
    feed: F,
    store: S,
}

impl TickerDirectory {
    /// Create a directory with the SEC feed and a JSON file snapshot.
    pub const fn new(client: reqwest::Client, cache_path: PathBuf) -> Self {
        Self {
            feed: SecTickerFeed::new(client),
            store: JsonSnapshotStore { path: cache_path },
        }
    }
}

impl<F: TickerFeed, S: SnapshotStore> TickerDirectory<F, S> {
    /// Create a directory from explicit feed and store implementations.
    pub const fn with_parts(feed: F, store: S) -> Self {
        Self { feed, store }
    }

    /// Load the directory snapshot.
    ///
    /// Reads the persisted snapshot first; on a cache miss (absent, corrupt,
    /// or empty) the feed is fetched and the result written back before
    /// returning. A second call with the snapshot in place issues no fetch.
    pub async fn load(&self) -> Result<Vec<Company>> {
        if let Some(companies) = self.store.read() {
            return Ok(companies);
        }

        let companies = self.feed.fetch().await?;
        self.store.write(&companies)?;
        Ok(companies)
    }

    /// Fuzzy-search the directory for a company.
    ///
    /// An empty (or all-whitespace) query returns no results without
    /// touching the directory. See [`search::rank`] for the match policy.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<Company>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let companies = self.load().await?;
        Ok(search::rank(&companies, query, limit))
    }

    /// Resolve a free-text query to its best-matching ticker.
    pub async fn best_ticker(&self, query: &str) -> Result<Option<String>> {
        let results = self.search(query, 1).await?;
        Ok(results.into_iter().next().map(|c| c.ticker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingFeed {
        calls: AtomicUsize,
        companies: Vec<Company>,
    }

    impl CountingFeed {
        fn new(companies: Vec<Company>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                companies,
            }
        }
    }

    #[async_trait]
    impl TickerFeed for CountingFeed {
        async fn fetch(&self) -> Result<Vec<Company>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.companies.clone())
        }
    }

    fn sample() -> Vec<Company> {
        vec![
            Company::new("320193", "AAPL", "Apple Inc."),
            Company::new("789019", "MSFT", "Microsoft Corp"),
        ]
    }

    #[tokio::test]
    async fn test_load_fetches_once_with_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("tickers.json"));
        let feed = CountingFeed::new(sample());
        let directory = TickerDirectory::with_parts(feed, store);

        let first = directory.load().await.unwrap();
        let second = directory.load().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(directory.feed.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_a_cache_miss() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tickers.json");
        fs::write(&path, "{not json").unwrap();

        let store = JsonSnapshotStore::new(&path);
        let feed = CountingFeed::new(sample());
        let directory = TickerDirectory::with_parts(feed, store);

        let companies = directory.load().await.unwrap();
        assert_eq!(companies.len(), 2);
        assert_eq!(directory.feed.calls.load(Ordering::SeqCst), 1);

        // The re-fetch repaired the snapshot.
        let repaired: Vec<Company> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(repaired.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_snapshot_is_a_cache_miss() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tickers.json");
        fs::write(&path, "[]").unwrap();

        let store = JsonSnapshotStore::new(&path);
        let feed = CountingFeed::new(sample());
        let directory = TickerDirectory::with_parts(feed, store);

        directory.load().await.unwrap();
        assert_eq!(directory.feed.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_query_skips_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("tickers.json"));
        let feed = CountingFeed::new(sample());
        let directory = TickerDirectory::with_parts(feed, store);

        let results = directory.search("   ", 10).await.unwrap();
        assert!(results.is_empty());
        assert_eq!(directory.feed.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_best_ticker() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("tickers.json"));
        let directory = TickerDirectory::with_parts(CountingFeed::new(sample()), store);

        assert_eq!(
            directory.best_ticker("apple").await.unwrap(),
            Some("AAPL".to_string())
        );
        assert_eq!(directory.best_ticker("zzzz").await.unwrap(), None);
    }
}
