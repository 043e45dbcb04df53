//! Transcript URL discovery.

use crate::error::{DataError, Result};
use crate::providers::first_some;
use chrono::NaiveDate;
use futures::FutureExt;
use futures::future::BoxFuture;
use regex::Regex;
use scraper::{Html, Selector};
use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

/// Site root used to absolutize relative hrefs.
const FOOL_BASE: &str = "https://www.fool.com";

/// Path marker identifying transcript links.
const TRANSCRIPT_PATH: &str = "/earnings/call-transcripts/";

/// Global transcript index page.
const INDEX_URL: &str = "https://www.fool.com/earnings-call-transcripts/";

/// Exchange listing pages probed in fixed order; first hit wins.
const EXCHANGES: [&str; 2] = ["nasdaq", "nyse"];

/// Per-probe timeout for the quote-page phase.
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

static ANCHOR_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));

/// `/YYYY/MM/DD/` path segment inside a transcript URL.
static URL_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(\d{4})/(\d{2})/(\d{2})/").expect("valid regex"));

/// Locates earnings-call transcripts.
pub struct TranscriptLocator {
    client: reqwest::Client,
}

impl fmt::Debug for TranscriptLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranscriptLocator").finish_non_exhaustive()
    }
}

impl TranscriptLocator {
    /// Create a locator with a browser-like user agent.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36")
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(DataError::Network)?;
        Ok(Self { client })
    }

    /// Find the single best transcript URL for a ticker.
    ///
    /// Phase A probes the nasdaq and nyse quote pages; phase B scans the
    /// global index. `Ok(None)` means no transcript exists anywhere, which
    /// callers report as "not found" rather than an error.
    pub async fn find_transcript_url(&self, ticker: &str) -> Result<Option<String>> {
        let ticker = ticker.to_lowercase();
        let phases: [BoxFuture<'_, Result<Option<String>>>; 2] = [
            self.probe_quote_pages(&ticker).boxed(),
            self.probe_index(&ticker).boxed(),
        ];
        first_some(phases).await
    }

    /// Most recent call date visible on the quote pages, without fetching
    /// any transcript body.
    ///
    /// Calendar aggregation uses this; it deliberately skips the index
    /// fallback.
    pub async fn latest_call_date(&self, ticker: &str) -> Result<Option<NaiveDate>> {
        let ticker = ticker.to_lowercase();
        for exchange in EXCHANGES {
            let Some(html) = self.fetch_quote_page(exchange, &ticker).await else {
                continue;
            };
            if let Some(date) = scan_quote_page_for_date(&html) {
                return Ok(Some(date));
            }
        }
        Ok(None)
    }

    /// Phase A: scan each exchange quote page for a transcript link.
    ///
    /// Non-200 responses and transport errors fail silently per candidate.
    async fn probe_quote_pages(&self, ticker: &str) -> Result<Option<String>> {
        for exchange in EXCHANGES {
            let Some(html) = self.fetch_quote_page(exchange, ticker).await else {
                continue;
            };
            if let Some(url) = scan_quote_page(&html) {
                return Ok(Some(url));
            }
        }
        Ok(None)
    }

    /// Phase B: scan the global transcript index, matching on ticker.
    async fn probe_index(&self, ticker: &str) -> Result<Option<String>> {
        let response = self.client.get(INDEX_URL).send().await?;
        if !response.status().is_success() {
            return Err(DataError::Http(format!(
                "Failed to fetch transcript index: HTTP {}",
                response.status()
            )));
        }
        let html = response.text().await?;
        Ok(scan_index_page(&html, ticker))
    }

    async fn fetch_quote_page(&self, exchange: &str, ticker: &str) -> Option<String> {
        let url = format!("{FOOL_BASE}/quote/{exchange}/{ticker}/");
        let response = self
            .client
            .get(&url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        response.text().await.ok()
    }

    /// Borrow the underlying HTTP client (shared with page fetching).
    pub(crate) const fn http(&self) -> &reqwest::Client {
        &self.client
    }
}

/// First transcript link on a quote page, absolutized.
fn scan_quote_page(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    doc.select(&ANCHOR_SEL).find_map(|link| {
        let href = link.value().attr("href")?;
        href.contains(TRANSCRIPT_PATH).then(|| absolutize(href))
    })
}

/// First transcript link on a quote page that carries a URL date.
fn scan_quote_page_for_date(html: &str) -> Option<NaiveDate> {
    let doc = Html::parse_document(html);
    doc.select(&ANCHOR_SEL).find_map(|link| {
        let href = link.value().attr("href")?;
        if !href.contains(TRANSCRIPT_PATH) {
            return None;
        }
        date_from_url(href)
    })
}

/// First transcript link on the index page attributable to `ticker`.
///
/// A link counts when its text contains `(ticker)` or its href contains
/// `-ticker-`, case-insensitively.
fn scan_index_page(html: &str, ticker: &str) -> Option<String> {
    let ticker = ticker.to_lowercase();
    let text_marker = format!("({ticker})");
    let href_marker = format!("-{ticker}-");

    let doc = Html::parse_document(html);
    doc.select(&ANCHOR_SEL).find_map(|link| {
        let href = link.value().attr("href")?;
        if !href.contains(TRANSCRIPT_PATH) {
            return None;
        }
        let text = link.text().collect::<String>().to_lowercase();
        (text.contains(&text_marker) || href.to_lowercase().contains(&href_marker))
            .then(|| absolutize(href))
    })
}

/// Absolutize a site-relative href against the Fool root.
fn absolutize(href: &str) -> String {
    if href.starts_with('/') {
        format!("{FOOL_BASE}{href}")
    } else {
        href.to_string()
    }
}

/// Extract a `/YYYY/MM/DD/` date from a transcript URL.
pub(crate) fn date_from_url(url: &str) -> Option<NaiveDate> {
    let caps = URL_DATE_RE.captures(url)?;
    let year = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let day = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const QUOTE_PAGE: &str = r#"
        <html><body>
          <a href="/about/">About</a>
          <a href="/earnings/call-transcripts/2025/01/31/apple-aapl-q1-2025-earnings-call-transcript/">
            Q1 2025 Earnings Call
          </a>
          <a href="/earnings/call-transcripts/2024/11/01/apple-aapl-q4-2024-earnings-call-transcript/">
            Q4 2024 Earnings Call
          </a>
        </body></html>"#;

    const INDEX_PAGE: &str = r#"
        <html><body>
          <a href="/earnings/call-transcripts/2025/02/20/walmart-wmt-q4-2025-earnings-call-transcript/">
            Walmart (WMT) Q4 2025 Earnings Call Transcript
          </a>
          <a href="https://www.fool.com/earnings/call-transcripts/2025/02/26/nvidia-nvda-q4-2025-earnings-call-transcript/">
            NVIDIA (NVDA) Q4 2025 Earnings Call Transcript
          </a>
          <a href="/investing/2025/02/26/some-article/">Unrelated</a>
        </body></html>"#;

    #[test]
    fn test_scan_quote_page_first_match_wins() {
        let url = scan_quote_page(QUOTE_PAGE).unwrap();
        assert_eq!(
            url,
            "https://www.fool.com/earnings/call-transcripts/2025/01/31/apple-aapl-q1-2025-earnings-call-transcript/"
        );
    }

    #[test]
    fn test_scan_quote_page_no_match() {
        assert!(scan_quote_page("<html><body><a href='/x/'>x</a></body></html>").is_none());
    }

    #[test]
    fn test_scan_index_matches_link_text() {
        let url = scan_index_page(INDEX_PAGE, "WMT").unwrap();
        assert!(url.starts_with("https://www.fool.com/earnings/call-transcripts/2025/02/20/"));
    }

    #[test]
    fn test_scan_index_matches_href_slug() {
        let url = scan_index_page(INDEX_PAGE, "nvda").unwrap();
        assert!(url.contains("nvidia-nvda-q4-2025"));
    }

    #[test]
    fn test_scan_index_requires_ticker_evidence() {
        assert!(scan_index_page(INDEX_PAGE, "AAPL").is_none());
    }

    #[test]
    fn test_scan_quote_page_for_date() {
        let date = scan_quote_page_for_date(QUOTE_PAGE).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
    }

    #[rstest]
    #[case(
        "https://www.fool.com/earnings/call-transcripts/2024/11/01/x/",
        Some((2024, 11, 1))
    )]
    #[case("https://www.fool.com/earnings/call-transcripts/apple/", None)]
    #[case("/earnings/call-transcripts/2024/13/01/x/", None)]
    fn test_date_from_url(#[case] url: &str, #[case] expected: Option<(i32, u32, u32)>) {
        let expected = expected.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
        assert_eq!(date_from_url(url), expected);
    }

    #[rstest]
    #[case("/earnings/call-transcripts/x/", "https://www.fool.com/earnings/call-transcripts/x/")]
    #[case("https://example.com/t/", "https://example.com/t/")]
    fn test_absolutize(#[case] href: &str, #[case] expected: &str) {
        assert_eq!(absolutize(href), expected);
    }
}
