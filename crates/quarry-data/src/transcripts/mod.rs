//! Earnings-call transcript discovery and extraction (Motley Fool).
//!
//! Discovery is two-phase: the company's nasdaq/nyse quote pages are probed
//! first, and only if neither yields a transcript link is the global
//! transcript index scanned. At most one transcript URL survives
//! disambiguation per ticker.

pub mod locator;
pub mod page;

use chrono::NaiveDate;

pub use locator::TranscriptLocator;
pub use page::TranscriptPage;

/// Metadata for one located transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptRef {
    /// Absolute transcript URL.
    pub url: String,
    /// Page title (first top-level heading), may be empty.
    pub title: String,
    /// Call date extracted from the URL path, if present.
    pub date: Option<NaiveDate>,
}
