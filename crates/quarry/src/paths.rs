//! Default filesystem locations.

use std::path::PathBuf;

/// Application data directory (`…/quarry` under the platform data dir).
///
/// Falls back to the current directory when the platform reports no data
/// directory.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quarry")
}

/// Default path of the persisted ticker-directory snapshot.
pub fn ticker_cache_path() -> PathBuf {
    data_dir().join("ticker_cache.json")
}

/// Default path of the watchlist file.
pub fn watchlist_path() -> PathBuf {
    data_dir().join("watchlist.txt")
}
