//! Transcript page fetching and extraction.

use crate::error::{DataError, Result};
use crate::html::filtered_fragment;
use crate::transcripts::{TranscriptLocator, TranscriptRef, locator};
use scraper::{Html, Selector};
use std::sync::LazyLock;

/// Elements stripped from the article before text conversion.
const DROP_TAGS: [&str; 5] = ["script", "style", "nav", "aside", "footer"];

static H1_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1").expect("valid selector"));

/// Article container candidates, most specific markup first.
static CONTAINER_SELS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    ["article", "div.article-body", "div.content"]
        .iter()
        .map(|s| Selector::parse(s).expect("valid selector"))
        .collect()
});

/// One fetched transcript page: metadata plus the cleaned article markup.
#[derive(Debug, Clone)]
pub struct TranscriptPage {
    /// Title, date, and URL of the transcript.
    pub meta: TranscriptRef,
    /// Article container HTML with scripts, navigation, and footers removed.
    pub content_html: String,
}

impl TranscriptLocator {
    /// Fetch a transcript page and extract its article content.
    pub async fn fetch_page(&self, url: &str) -> Result<TranscriptPage> {
        let response = self.http().get(url).send().await?;
        if !response.status().is_success() {
            return Err(DataError::Http(format!(
                "Failed to fetch transcript {}: HTTP {}",
                url,
                response.status()
            )));
        }
        let html = response.text().await?;
        parse_page(&html, url)
    }
}

/// Extract title, URL date, and cleaned article markup from a page.
///
/// The container is the first match among `article`, `div.article-body`,
/// and `div.content`. A page with none of these has no extractable body.
pub fn parse_page(html: &str, url: &str) -> Result<TranscriptPage> {
    let doc = Html::parse_document(html);

    let title = doc
        .select(&H1_SEL)
        .next()
        .map(|h1| h1.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let date = locator::date_from_url(url);

    let container = CONTAINER_SELS
        .iter()
        .find_map(|sel| doc.select(sel).next())
        .ok_or_else(|| DataError::Parse(format!("no article container at {url}")))?;

    let content_html = filtered_fragment(container, &DROP_TAGS, false);

    Ok(TranscriptPage {
        meta: TranscriptRef {
            url: url.to_string(),
            title,
            date,
        },
        content_html,
    })
}
