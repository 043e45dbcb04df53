//! On-disk export of downloaded disclosures.
//!
//! Artifacts are written under `{root}/{ticker}/` with a fixed naming
//! scheme so repeated downloads of the same filing overwrite in place.

use chrono::NaiveDate;
use quarry_data::edgar::{Filing, FormType};
use quarry_data::transcripts::TranscriptRef;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Filename for a filing artifact: `{ticker}_{form}_{date}.md`.
pub fn filing_filename(ticker: &str, form: FormType, filing_date: NaiveDate) -> String {
    format!("{}_{}_{}.md", ticker, form, filing_date.format("%Y-%m-%d"))
}

/// Filename for a transcript artifact: `{ticker}_earnings_{yyyymmdd}.md`.
///
/// An unknown date renders as `unknown`.
pub fn transcript_filename(ticker: &str, date: Option<NaiveDate>) -> String {
    let date_part = date.map_or_else(
        || "unknown".to_string(),
        |d| d.format("%Y%m%d").to_string(),
    );
    format!("{ticker}_earnings_{date_part}.md")
}

/// Write a converted filing under the per-ticker directory.
pub fn write_filing(
    root: &Path,
    ticker: &str,
    filing: &Filing,
    markdown: &str,
) -> Result<PathBuf, ExportError> {
    let dir = root.join(ticker);
    fs::create_dir_all(&dir)?;
    let path = dir.join(filing_filename(ticker, filing.form, filing.filing_date));
    fs::write(&path, markdown)?;
    Ok(path)
}

/// Write a converted transcript under the per-ticker directory.
///
/// The body is prefixed with a title/date/source block.
pub fn write_transcript(
    root: &Path,
    ticker: &str,
    meta: &TranscriptRef,
    body: &str,
) -> Result<PathBuf, ExportError> {
    let dir = root.join(ticker);
    fs::create_dir_all(&dir)?;

    let title = if meta.title.is_empty() {
        format!("{ticker} Earnings Call")
    } else {
        meta.title.clone()
    };
    let date_line = meta.date.map_or_else(
        || "unknown".to_string(),
        |d| d.format("%Y-%m-%d").to_string(),
    );

    let document = format!(
        "# {title}\n\n**Date**: {date}\n**Source**: [Motley Fool]({url})\n\n---\n\n{body}\n",
        title = title,
        date = date_line,
        url = meta.url,
        body = body,
    );

    let path = dir.join(transcript_filename(ticker, meta.date));
    fs::write(&path, document)?;
    Ok(path)
}
