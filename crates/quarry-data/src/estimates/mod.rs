//! Forward-looking earnings-date estimates.
//!
//! Estimate sources are polymorphic providers tried in a fixed priority
//! order; the caller only cares about that ordering, not provider identity.

pub mod yahoo;

use crate::error::Result;
use crate::providers::first_some;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Timelike};
use futures::FutureExt;
use futures::future::BoxFuture;

pub use yahoo::{YahooCalendarSource, YahooQuoteInfoSource};

/// Session-timing classification of an earnings event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTiming {
    /// Before market open (before 9:30 local).
    BeforeOpen,
    /// During the trading session.
    DuringSession,
    /// After market close (16:00 or later, local).
    AfterClose,
    /// No intra-day time is known.
    Unscheduled,
}

impl SessionTiming {
    /// Classify a local event time against the 9:30–16:00 session.
    pub fn classify(time: NaiveTime) -> Self {
        if time.hour() < 9 || (time.hour() == 9 && time.minute() < 30) {
            Self::BeforeOpen
        } else if time.hour() >= 16 {
            Self::AfterClose
        } else {
            Self::DuringSession
        }
    }

    /// Short label used in event descriptions.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::BeforeOpen => "BMO",
            Self::DuringSession => "intraday",
            Self::AfterClose => "AMC",
            Self::Unscheduled => "TBD",
        }
    }
}

/// One forward-looking earnings-date estimate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EarningsEstimate {
    /// Local date of the (expected) earnings event.
    pub date: NaiveDate,
    /// Local wall-clock time, formatted, when known.
    pub time: Option<String>,
    /// Session-timing classification.
    pub timing: SessionTiming,
    /// Whether the date is an estimate rather than a confirmed schedule.
    pub is_estimate: bool,
}

/// A provider of forward earnings-date estimates.
#[async_trait]
pub trait EarningsEstimateSource: Send + Sync {
    /// The next (expected) earnings date for a ticker, if the provider
    /// knows one.
    async fn next_earnings(&self, ticker: &str) -> Result<Option<EarningsEstimate>>;
}

/// Query sources in priority order, returning the first estimate found.
///
/// Failures of non-final sources fall through to the next source.
pub async fn first_estimate(
    sources: &[Box<dyn EarningsEstimateSource>],
    ticker: &str,
) -> Result<Option<EarningsEstimate>> {
    let attempts: Vec<BoxFuture<'_, Result<Option<EarningsEstimate>>>> = sources
        .iter()
        .map(|source| source.next_earnings(ticker).boxed())
        .collect();
    first_some(attempts).await
}
