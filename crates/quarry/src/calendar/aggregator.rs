//! Calendar aggregation across data sources.

use crate::calendar::{CalendarEvent, EventCategory, EventStatus, order_events};
use chrono::{Local, NaiveDate};
use quarry_data::edgar::{EdgarClient, FormType};
use quarry_data::estimates::{
    EarningsEstimate, EarningsEstimateSource, SessionTiming, YahooCalendarSource,
    YahooQuoteInfoSource, first_estimate,
};
use quarry_data::transcripts::TranscriptLocator;
use std::fmt;

/// Merges filing dates, forward earnings estimates, and historical call
/// dates into one ordered timeline.
pub struct CalendarAggregator {
    edgar: EdgarClient,
    transcripts: TranscriptLocator,
    estimate_sources: Vec<Box<dyn EarningsEstimateSource>>,
}

impl fmt::Debug for CalendarAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarAggregator")
            .field("estimate_sources", &self.estimate_sources.len())
            .finish_non_exhaustive()
    }
}

impl CalendarAggregator {
    /// Create an aggregator with the default source stack: quote-info
    /// estimates first, calendar estimates as fallback.
    pub fn new() -> quarry_data::Result<Self> {
        Ok(Self {
            edgar: EdgarClient::new()?,
            transcripts: TranscriptLocator::new()?,
            estimate_sources: vec![
                Box::new(YahooQuoteInfoSource::new()?),
                Box::new(YahooCalendarSource::new()?),
            ],
        })
    }

    /// Collect and order events for a list of tickers.
    ///
    /// Tickers are processed one at a time; a ticker whose sources all
    /// fail simply contributes no events.
    pub async fn aggregate(&self, tickers: &[String]) -> Vec<CalendarEvent> {
        let today = Local::now().date_naive();
        let mut events = Vec::new();

        for ticker in tickers {
            events.extend(self.events_for(ticker, today).await);
        }

        order_events(events)
    }

    /// Events for one ticker, dated relative to the current local day.
    ///
    /// Unordered; callers batching several tickers should pass the
    /// combined list through [`order_events`].
    pub async fn ticker_events(&self, ticker: &str) -> Vec<CalendarEvent> {
        self.events_for(ticker, Local::now().date_naive()).await
    }

    /// All events for one ticker: forward estimate, filing history, and
    /// the most recent call date. Each source failing is non-fatal.
    async fn events_for(&self, ticker: &str, today: NaiveDate) -> Vec<CalendarEvent> {
        let ticker = ticker.to_uppercase();
        let mut events = Vec::new();

        if let Ok(Some(estimate)) = first_estimate(&self.estimate_sources, &ticker).await {
            events.push(estimate_event(&ticker, &estimate, today));
        }

        events.extend(self.filing_events(&ticker).await);

        if let Ok(Some(date)) = self.transcripts.latest_call_date(&ticker).await {
            events.push(CalendarEvent {
                ticker: ticker.clone(),
                event_type: "Earnings Call".to_string(),
                date,
                time: None,
                status: EventStatus::Past,
                category: EventCategory::EarningsCall,
            });
        }

        events
    }

    /// Latest 10-K and 10-Q filing dates, one event per form type found.
    async fn filing_events(&self, ticker: &str) -> Vec<CalendarEvent> {
        let mut events = Vec::new();

        let Ok(cik) = self.edgar.lookup_cik(ticker).await else {
            return events;
        };

        for form in FormType::ALL {
            if let Ok(Some(filing)) = self.edgar.latest_filing(&cik, form).await {
                events.push(CalendarEvent {
                    ticker: ticker.to_string(),
                    event_type: form.as_str().to_string(),
                    date: filing.filing_date,
                    time: None,
                    status: EventStatus::Past,
                    category: EventCategory::SecFiling,
                });
            }
        }

        events
    }
}

/// Build the calendar event for a forward earnings estimate.
pub(crate) fn estimate_event(
    ticker: &str,
    estimate: &EarningsEstimate,
    today: NaiveDate,
) -> CalendarEvent {
    let mut event_type = "Earnings".to_string();
    if estimate.timing != SessionTiming::Unscheduled {
        event_type.push(' ');
        event_type.push_str(estimate.timing.label());
    }
    if estimate.is_estimate {
        event_type.push_str(" (est)");
    }

    let status = if estimate.date >= today {
        EventStatus::Upcoming
    } else {
        EventStatus::Past
    };

    CalendarEvent {
        ticker: ticker.to_string(),
        event_type,
        date: estimate.date,
        time: estimate.time.clone(),
        status,
        category: EventCategory::Earnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn estimate(event_date: NaiveDate, timing: SessionTiming, is_estimate: bool) -> EarningsEstimate {
        EarningsEstimate {
            date: event_date,
            time: Some("16:30 ET".to_string()),
            timing,
            is_estimate,
        }
    }

    #[test]
    fn test_estimate_event_labels() {
        let today = date(2025, 1, 1);

        let e = estimate_event(
            "AAPL",
            &estimate(date(2025, 1, 30), SessionTiming::AfterClose, true),
            today,
        );
        assert_eq!(e.event_type, "Earnings AMC (est)");
        assert_eq!(e.status, EventStatus::Upcoming);
        assert_eq!(e.category, EventCategory::Earnings);

        let e = estimate_event(
            "AAPL",
            &estimate(date(2025, 1, 30), SessionTiming::BeforeOpen, false),
            today,
        );
        assert_eq!(e.event_type, "Earnings BMO");
    }

    #[test]
    fn test_estimate_event_unscheduled_has_no_timing_label() {
        let e = estimate_event(
            "MSFT",
            &estimate(date(2025, 2, 1), SessionTiming::Unscheduled, true),
            date(2025, 1, 1),
        );
        assert_eq!(e.event_type, "Earnings (est)");
    }

    #[test]
    fn test_estimate_event_status_boundary() {
        let today = date(2025, 1, 30);
        let on_today = estimate_event(
            "AAPL",
            &estimate(today, SessionTiming::AfterClose, true),
            today,
        );
        assert_eq!(on_today.status, EventStatus::Upcoming);

        let yesterday = estimate_event(
            "AAPL",
            &estimate(date(2025, 1, 29), SessionTiming::AfterClose, true),
            today,
        );
        assert_eq!(yesterday.status, EventStatus::Past);
    }
}
