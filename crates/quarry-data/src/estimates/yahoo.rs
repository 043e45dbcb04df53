//! Yahoo Finance estimate sources.
//!
//! Two providers backed by the public quote endpoints: the quote-info
//! source carries a precise timestamp (and an estimate flag), the calendar
//! source only a date. The aggregator tries them in that order.

use crate::error::{DataError, Result};
use crate::estimates::{EarningsEstimate, EarningsEstimateSource, SessionTiming};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

const QUOTE_URL: &str = "https://query1.finance.yahoo.com/v7/finance/quote";
const SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";

fn yahoo_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)")
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(DataError::Network)
}

/// Interpret a Unix timestamp as a local-time earnings estimate.
fn estimate_from_timestamp(ts: i64, is_estimate: bool, with_time: bool) -> Option<EarningsEstimate> {
    let local: DateTime<Local> = DateTime::from_timestamp(ts, 0)?.with_timezone(&Local);
    let (time, timing) = if with_time {
        (
            Some(format!("{} ET", local.format("%H:%M"))),
            SessionTiming::classify(local.time()),
        )
    } else {
        (None, SessionTiming::Unscheduled)
    };
    Some(EarningsEstimate {
        date: local.date_naive(),
        time,
        timing,
        is_estimate,
    })
}

// --- quote-info source -----------------------------------------------------

#[derive(Debug, Deserialize)]
struct QuoteEnvelope {
    #[serde(rename = "quoteResponse")]
    quote_response: QuoteResponse,
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(default)]
    result: Vec<QuoteResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResult {
    earnings_timestamp: Option<i64>,
    is_earnings_date_estimate: Option<bool>,
}

/// Primary estimate source: the quote-info endpoint.
///
/// Yields a timestamped estimate with session timing and an estimate flag.
pub struct YahooQuoteInfoSource {
    client: reqwest::Client,
}

impl fmt::Debug for YahooQuoteInfoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YahooQuoteInfoSource").finish_non_exhaustive()
    }
}

impl YahooQuoteInfoSource {
    /// Create the source with its own HTTP client.
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: yahoo_client()?,
        })
    }
}

#[async_trait]
impl EarningsEstimateSource for YahooQuoteInfoSource {
    async fn next_earnings(&self, ticker: &str) -> Result<Option<EarningsEstimate>> {
        if ticker.is_empty() {
            return Err(DataError::InvalidSymbol("Empty ticker".to_string()));
        }

        let response = self
            .client
            .get(QUOTE_URL)
            .query(&[("symbols", ticker)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DataError::YahooApi(format!(
                "quote endpoint returned HTTP {}",
                response.status()
            )));
        }

        let envelope: QuoteEnvelope = response
            .json()
            .await
            .map_err(|e| DataError::YahooApi(format!("quote response: {e}")))?;

        let Some(result) = envelope.quote_response.result.into_iter().next() else {
            return Ok(None);
        };
        let Some(ts) = result.earnings_timestamp else {
            return Ok(None);
        };

        // Absent flag means the date is unconfirmed.
        let is_estimate = result.is_earnings_date_estimate.unwrap_or(true);
        Ok(estimate_from_timestamp(ts, is_estimate, true))
    }
}

// --- calendar source -------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SummaryEnvelope {
    #[serde(rename = "quoteSummary")]
    quote_summary: SummaryResponse,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    result: Vec<SummaryResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResult {
    calendar_events: Option<CalendarEvents>,
}

#[derive(Debug, Deserialize)]
struct CalendarEvents {
    earnings: Option<EarningsBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EarningsBlock {
    #[serde(default)]
    earnings_date: Vec<RawTimestamp>,
}

#[derive(Debug, Deserialize)]
struct RawTimestamp {
    raw: Option<i64>,
}

/// Fallback estimate source: the calendar-events summary module.
///
/// Only a date is available; timing stays [`SessionTiming::Unscheduled`]
/// and the date is always treated as an estimate.
pub struct YahooCalendarSource {
    client: reqwest::Client,
}

impl fmt::Debug for YahooCalendarSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YahooCalendarSource").finish_non_exhaustive()
    }
}

impl YahooCalendarSource {
    /// Create the source with its own HTTP client.
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: yahoo_client()?,
        })
    }
}

#[async_trait]
impl EarningsEstimateSource for YahooCalendarSource {
    async fn next_earnings(&self, ticker: &str) -> Result<Option<EarningsEstimate>> {
        if ticker.is_empty() {
            return Err(DataError::InvalidSymbol("Empty ticker".to_string()));
        }

        let url = format!("{SUMMARY_URL}/{ticker}");
        let response = self
            .client
            .get(&url)
            .query(&[("modules", "calendarEvents")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DataError::YahooApi(format!(
                "quoteSummary endpoint returned HTTP {}",
                response.status()
            )));
        }

        let envelope: SummaryEnvelope = response
            .json()
            .await
            .map_err(|e| DataError::YahooApi(format!("quoteSummary response: {e}")))?;

        let ts = envelope
            .quote_summary
            .result
            .into_iter()
            .next()
            .and_then(|r| r.calendar_events)
            .and_then(|c| c.earnings)
            .and_then(|e| e.earnings_date.into_iter().next())
            .and_then(|d| d.raw);

        let Some(ts) = ts else {
            return Ok(None);
        };
        Ok(estimate_from_timestamp(ts, true, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_envelope_parsing() {
        let json = r#"{
            "quoteResponse": {
                "result": [{
                    "symbol": "AAPL",
                    "earningsTimestamp": 1738272600,
                    "isEarningsDateEstimate": false
                }],
                "error": null
            }
        }"#;
        let envelope: QuoteEnvelope = serde_json::from_str(json).unwrap();
        let result = &envelope.quote_response.result[0];
        assert_eq!(result.earnings_timestamp, Some(1738272600));
        assert_eq!(result.is_earnings_date_estimate, Some(false));
    }

    #[test]
    fn test_summary_envelope_parsing() {
        let json = r#"{
            "quoteSummary": {
                "result": [{
                    "calendarEvents": {
                        "earnings": {
                            "earningsDate": [{"raw": 1746106200, "fmt": "2025-05-01"}]
                        }
                    }
                }],
                "error": null
            }
        }"#;
        let envelope: SummaryEnvelope = serde_json::from_str(json).unwrap();
        let ts = envelope.quote_summary.result[0]
            .calendar_events
            .as_ref()
            .and_then(|c| c.earnings.as_ref())
            .and_then(|e| e.earnings_date.first())
            .and_then(|d| d.raw);
        assert_eq!(ts, Some(1746106200));
    }

    #[test]
    fn test_estimate_without_time_is_unscheduled() {
        let estimate = estimate_from_timestamp(1746106200, true, false).unwrap();
        assert_eq!(estimate.timing, SessionTiming::Unscheduled);
        assert!(estimate.time.is_none());
        assert!(estimate.is_estimate);
    }

    #[test]
    fn test_estimate_with_time_carries_clock() {
        let estimate = estimate_from_timestamp(1746106200, false, true).unwrap();
        assert!(estimate.time.as_deref().unwrap().ends_with(" ET"));
        assert!(!estimate.is_estimate);
    }
}
