//! Download orchestration: locate, fetch, convert, export.

use crate::error::{QuarryError, Result};
use chrono::NaiveDate;
use quarry_data::edgar::{EdgarClient, Filing, FormType};
use quarry_data::transcripts::{TranscriptLocator, TranscriptRef};
use quarry_output::{convert, export};
use std::fmt;
use std::path::{Path, PathBuf};

/// One filing written to disk.
#[derive(Debug, Clone)]
pub struct SavedFiling {
    /// Form type of the filing.
    pub form: FormType,
    /// Filing date.
    pub date: NaiveDate,
    /// Path of the written Markdown file.
    pub path: PathBuf,
}

/// One transcript written to disk.
#[derive(Debug, Clone)]
pub struct SavedTranscript {
    /// Transcript metadata (title, date, source URL).
    pub meta: TranscriptRef,
    /// Path of the written Markdown file.
    pub path: PathBuf,
}

/// Downloads disclosures for a ticker into an output directory tree.
pub struct Downloader {
    edgar: EdgarClient,
    transcripts: TranscriptLocator,
    out_root: PathBuf,
}

impl fmt::Debug for Downloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Downloader")
            .field("out_root", &self.out_root)
            .finish_non_exhaustive()
    }
}

impl Downloader {
    /// Create a downloader writing under `out_root`.
    pub fn new(out_root: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            edgar: EdgarClient::new()?,
            transcripts: TranscriptLocator::new()?,
            out_root: out_root.into(),
        })
    }

    /// Root of the output directory tree.
    pub fn out_root(&self) -> &Path {
        &self.out_root
    }

    /// Directory that holds one ticker's artifacts.
    pub fn ticker_dir(&self, ticker: &str) -> PathBuf {
        self.out_root.join(ticker)
    }

    /// Download the latest 10-K and 10-Q for a ticker as Markdown.
    ///
    /// A form type with no filing on record is skipped, not an error.
    pub async fn download_filings(&self, ticker: &str) -> Result<Vec<SavedFiling>> {
        let ticker = ticker.to_uppercase();
        let cik = self.edgar.lookup_cik(&ticker).await?;

        let mut saved = Vec::new();
        for form in FormType::ALL {
            let Some(filing) = self.edgar.latest_filing(&cik, form).await? else {
                continue;
            };
            saved.push(self.export_filing(&ticker, &cik, &filing).await?);
        }
        Ok(saved)
    }

    async fn export_filing(&self, ticker: &str, cik: &str, filing: &Filing) -> Result<SavedFiling> {
        let html = self.edgar.fetch_document(cik, filing).await?;
        let markdown = convert::filing_markdown(&html);
        let path = export::write_filing(&self.out_root, ticker, filing, &markdown)?;
        Ok(SavedFiling {
            form: filing.form,
            date: filing.filing_date,
            path,
        })
    }

    /// Download the latest earnings-call transcript for a ticker.
    ///
    /// # Errors
    /// [`QuarryError::TranscriptNotFound`] when neither discovery phase
    /// yields a URL; [`QuarryError::EmptyTranscript`] when the page cannot
    /// be reduced to text.
    pub async fn download_transcript(&self, ticker: &str) -> Result<SavedTranscript> {
        let ticker = ticker.to_uppercase();

        let url = self
            .transcripts
            .find_transcript_url(&ticker)
            .await?
            .ok_or_else(|| QuarryError::TranscriptNotFound(ticker.clone()))?;

        let (body, meta) = self.fetch_transcript(&url).await?;
        let path = export::write_transcript(&self.out_root, &ticker, &meta, &body)?;
        Ok(SavedTranscript { meta, path })
    }

    /// Fetch a transcript page and convert it to Markdown.
    ///
    /// Returns the body text plus metadata (title, date, URL).
    pub async fn fetch_transcript(&self, url: &str) -> Result<(String, TranscriptRef)> {
        let page = self.transcripts.fetch_page(url).await?;
        let body = convert::to_markdown(&page.content_html);
        if body.is_empty() {
            return Err(QuarryError::EmptyTranscript(url.to_string()));
        }
        Ok((body, page.meta))
    }
}
