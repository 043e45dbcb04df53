//! SEC EDGAR API client.

use crate::error::{DataError, Result};
use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

/// SEC EDGAR data API base URL.
const EDGAR_DATA_URL: &str = "https://data.sec.gov";

/// SEC EDGAR archive base URL for filed documents.
const EDGAR_ARCHIVE_URL: &str = "https://www.sec.gov/Archives/edgar/data";

/// Browse endpoint used for ticker-to-CIK resolution.
const EDGAR_BROWSE_URL: &str = "https://www.sec.gov/cgi-bin/browse-edgar";

/// Fallback user agent when `SEC_USER_AGENT` is unset.
///
/// SEC requires identifying contact information on every request.
const DEFAULT_USER_AGENT: &str = "Quarry/0.1 (contact@example.com)";

/// CIK token inside a browse-edgar Atom response.
static CIK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"CIK=(\d+)").expect("valid regex"));

/// The user agent sent to SEC endpoints.
///
/// Reads the `SEC_USER_AGENT` environment variable, falling back to a
/// built-in default.
pub fn sec_user_agent() -> String {
    std::env::var("SEC_USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string())
}

/// Pad a CIK to the 10 digits EDGAR URLs require.
///
/// # Example
/// ```
/// # use quarry_data::edgar::pad_cik;
/// assert_eq!(pad_cik("320193"), "0000320193");
/// ```
pub fn pad_cik(cik: &str) -> String {
    format!("{:0>10}", cik)
}

/// Filing form types this tool understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormType {
    /// 10-K annual report.
    TenK,
    /// 10-Q quarterly report.
    TenQ,
}

impl FormType {
    /// All supported form types, in download order.
    pub const ALL: [Self; 2] = [Self::TenK, Self::TenQ];

    /// The form code as it appears in EDGAR documents.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TenK => "10-K",
            Self::TenQ => "10-Q",
        }
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One located filing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filing {
    /// Form type of the filing.
    pub form: FormType,
    /// Date the filing was submitted.
    pub filing_date: NaiveDate,
    /// Accession number (unique filing identifier, with dashes).
    pub accession_number: String,
    /// Primary document filename (e.g. `aapl-20230930.htm`).
    pub primary_document: String,
}

impl Filing {
    /// URL of the primary document on the EDGAR archive.
    pub fn document_url(&self, cik: &str) -> String {
        let accession_no_dashes = self.accession_number.replace('-', "");
        format!(
            "{}/{}/{}/{}",
            EDGAR_ARCHIVE_URL, cik, accession_no_dashes, self.primary_document
        )
    }
}

/// Company submissions metadata from the EDGAR submissions API.
#[derive(Debug, Clone, Deserialize)]
pub struct Submissions {
    /// Filing history container.
    pub filings: FilingHistory,
}

/// Container for filing history data.
#[derive(Debug, Clone, Deserialize)]
pub struct FilingHistory {
    /// Recent filings.
    pub recent: RecentFilings,
}

/// Recent filings as parallel arrays keyed by filing position.
///
/// The registry returns entries in reverse-chronological order; index `i`
/// across all arrays describes one filing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentFilings {
    /// Form types (e.g. "10-K", "10-Q", "8-K").
    pub form: Vec<String>,
    /// Accession numbers.
    pub accession_number: Vec<String>,
    /// Filing dates, `YYYY-MM-DD`.
    pub filing_date: Vec<String>,
    /// Primary document filenames.
    pub primary_document: Vec<String>,
}

impl RecentFilings {
    /// First filing of the requested form type, by registry position.
    ///
    /// "Latest" relies entirely on the registry's reverse-chronological
    /// ordering; no independent date sort is performed. The first
    /// positional match wins. A match whose position is missing from one
    /// of the sibling arrays is a malformed document, not a panic.
    pub fn first_of(&self, form: FormType) -> Result<Option<Filing>> {
        for (i, entry) in self.form.iter().enumerate() {
            if entry == form.as_str() {
                let (date, accession, document) = match (
                    self.filing_date.get(i),
                    self.accession_number.get(i),
                    self.primary_document.get(i),
                ) {
                    (Some(date), Some(accession), Some(document)) => (date, accession, document),
                    _ => {
                        return Err(DataError::Parse(
                            "submissions arrays out of sync".to_string(),
                        ));
                    }
                };
                let filing_date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                    .map_err(|e| DataError::Parse(format!("Invalid filing date: {e}")))?;
                return Ok(Some(Filing {
                    form,
                    filing_date,
                    accession_number: accession.clone(),
                    primary_document: document.clone(),
                }));
            }
        }
        Ok(None)
    }
}

/// SEC EDGAR API client.
pub struct EdgarClient {
    client: reqwest::Client,
    data_url: String,
}

impl fmt::Debug for EdgarClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgarClient")
            .field("data_url", &self.data_url)
            .finish_non_exhaustive()
    }
}

impl EdgarClient {
    /// Create a new EDGAR client.
    ///
    /// The user agent honors the `SEC_USER_AGENT` environment variable.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(sec_user_agent())
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(DataError::Network)?;

        Ok(Self {
            client,
            data_url: EDGAR_DATA_URL.to_string(),
        })
    }

    /// Resolve a ticker to its CIK via the browse-edgar endpoint.
    ///
    /// The response is an Atom feed; the CIK is extracted by pattern match
    /// rather than feed parsing.
    ///
    /// # Errors
    /// Returns [`DataError::CikNotFound`] when no CIK token appears in the
    /// response.
    pub async fn lookup_cik(&self, ticker: &str) -> Result<String> {
        if ticker.is_empty() {
            return Err(DataError::InvalidSymbol("Empty ticker".to_string()));
        }

        let response = self
            .client
            .get(EDGAR_BROWSE_URL)
            .query(&[
                ("action", "getcompany"),
                ("CIK", ticker),
                ("type", "10-K"),
                ("dateb", ""),
                ("owner", "include"),
                ("count", "1"),
                ("output", "atom"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DataError::Http(format!(
                "Failed to browse EDGAR for {}: HTTP {}",
                ticker,
                response.status()
            )));
        }

        let body = response.text().await?;
        extract_cik(&body).ok_or_else(|| DataError::CikNotFound(ticker.to_string()))
    }

    /// Latest filing of the requested form type for a company, if any.
    pub async fn latest_filing(&self, cik: &str, form: FormType) -> Result<Option<Filing>> {
        let submissions = self.fetch_submissions(cik).await?;
        submissions.filings.recent.first_of(form)
    }

    /// Fetch the structured submissions index for a company.
    pub async fn fetch_submissions(&self, cik: &str) -> Result<Submissions> {
        if cik.is_empty() {
            return Err(DataError::InvalidSymbol("Empty CIK".to_string()));
        }

        let url = format!("{}/submissions/CIK{}.json", self.data_url, pad_cik(cik));
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(DataError::Http(format!(
                "Failed to fetch submissions for CIK {}: HTTP {}",
                cik,
                response.status()
            )));
        }

        let submissions: Submissions = response.json().await?;
        Ok(submissions)
    }

    /// Fetch the raw primary document of a filing.
    pub async fn fetch_document(&self, cik: &str, filing: &Filing) -> Result<String> {
        let url = filing.document_url(cik);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(DataError::Http(format!(
                "Failed to fetch filing document: HTTP {}",
                response.status()
            )));
        }

        let content = response.text().await?;
        Ok(content)
    }
}

/// Extract the first CIK token from a browse-edgar response body.
fn extract_cik(body: &str) -> Option<String> {
    CIK_RE
        .captures(body)
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("320193", "0000320193")]
    #[case("1234", "0000001234")]
    #[case("1234567890", "1234567890")]
    fn test_pad_cik(#[case] cik: &str, #[case] padded: &str) {
        assert_eq!(pad_cik(cik), padded);
    }

    #[test]
    fn test_extract_cik() {
        let atom = r#"<entry><link href="https://www.sec.gov/cgi-bin/browse-edgar?action=getcompany&CIK=0000320193&type=10-K"/></entry>"#;
        assert_eq!(extract_cik(atom), Some("0000320193".to_string()));
        assert_eq!(extract_cik("<feed>nothing here</feed>"), None);
    }

    fn sample_recent() -> RecentFilings {
        RecentFilings {
            form: vec!["10-Q".into(), "10-K".into(), "10-Q".into()],
            accession_number: vec![
                "0000320193-24-000081".into(),
                "0000320193-23-000106".into(),
                "0000320193-23-000077".into(),
            ],
            filing_date: vec!["2024-08-02".into(), "2023-11-03".into(), "2023-08-04".into()],
            primary_document: vec![
                "aapl-20240629.htm".into(),
                "aapl-20230930.htm".into(),
                "aapl-20230701.htm".into(),
            ],
        }
    }

    #[test]
    fn test_first_positional_match_wins() {
        let recent = sample_recent();
        let filing = recent.first_of(FormType::TenK).unwrap().unwrap();
        // Index 1 holds the 10-K regardless of the dates involved.
        assert_eq!(filing.accession_number, "0000320193-23-000106");
        assert_eq!(filing.primary_document, "aapl-20230930.htm");
        assert_eq!(
            filing.filing_date,
            NaiveDate::from_ymd_opt(2023, 11, 3).unwrap()
        );
    }

    #[test]
    fn test_first_of_prefers_registry_order_for_repeats() {
        let recent = sample_recent();
        let filing = recent.first_of(FormType::TenQ).unwrap().unwrap();
        assert_eq!(filing.accession_number, "0000320193-24-000081");
    }

    #[test]
    fn test_mismatched_array_lengths_are_parse_errors() {
        let recent = RecentFilings {
            form: vec!["10-Q".into(), "10-K".into()],
            accession_number: vec!["0000320193-24-000081".into()],
            filing_date: vec!["2024-08-02".into()],
            primary_document: vec!["aapl-20240629.htm".into()],
        };

        // The 10-Q at index 0 is intact.
        assert!(recent.first_of(FormType::TenQ).unwrap().is_some());

        // The 10-K at index 1 has no siblings in the other arrays.
        let err = recent.first_of(FormType::TenK).unwrap_err();
        assert!(matches!(err, DataError::Parse(_)));
    }

    #[test]
    fn test_first_of_absent_form() {
        let recent = RecentFilings {
            form: vec!["8-K".into(), "4".into()],
            accession_number: vec!["a".into(), "b".into()],
            filing_date: vec!["2024-01-01".into(), "2024-01-02".into()],
            primary_document: vec!["a.htm".into(), "b.htm".into()],
        };
        assert!(recent.first_of(FormType::TenK).unwrap().is_none());
    }

    #[test]
    fn test_document_url() {
        let filing = Filing {
            form: FormType::TenK,
            filing_date: NaiveDate::from_ymd_opt(2023, 11, 3).unwrap(),
            accession_number: "0000320193-23-000077".to_string(),
            primary_document: "aapl-20230930.htm".to_string(),
        };
        assert_eq!(
            filing.document_url("320193"),
            "https://www.sec.gov/Archives/edgar/data/320193/000032019323000077/aapl-20230930.htm"
        );
    }
}
