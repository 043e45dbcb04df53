#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factorline/quarry/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod calendar;
pub mod download;
pub mod error;
pub mod paths;
pub mod watchlist;

// Re-export the sub-crates
pub use quarry_data as data;
pub use quarry_output as output;

pub use error::{QuarryError, Result};
pub use watchlist::Watchlist;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
