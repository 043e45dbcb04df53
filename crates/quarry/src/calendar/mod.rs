//! Calendar events and ordering.
//!
//! Events from all sources are merged into one timeline with a two-pass
//! ordering: upcoming events ascending by date (soonest first), followed
//! by past events descending by date (most recent first). "Soonest-first"
//! and "most-recent-first" are opposite orderings, so this cannot be a
//! single comparator over the whole sequence.

pub mod aggregator;

use chrono::NaiveDate;

pub use aggregator::CalendarAggregator;

/// Whether an event lies ahead of or behind "now" at aggregation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    /// Event date is today or later.
    Upcoming,
    /// Event date has passed.
    Past,
}

/// Source category of a calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    /// Historical SEC filing date.
    SecFiling,
    /// Forward-looking earnings date.
    Earnings,
    /// Historical earnings-call date.
    EarningsCall,
}

impl EventCategory {
    /// Human-readable category name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SecFiling => "SEC Filing",
            Self::Earnings => "Earnings",
            Self::EarningsCall => "Earnings Call",
        }
    }
}

/// One dated disclosure event for a ticker.
///
/// Events are value objects produced fresh per aggregation; nothing here
/// is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    /// Ticker symbol, uppercase.
    pub ticker: String,
    /// Event description (e.g. `10-K`, `Earnings AMC (est)`).
    pub event_type: String,
    /// Event date.
    pub date: NaiveDate,
    /// Wall-clock time, when known.
    pub time: Option<String>,
    /// Upcoming or past, relative to aggregation time.
    pub status: EventStatus,
    /// Source category.
    pub category: EventCategory,
}

/// Order events: upcoming ascending, then past descending.
///
/// Sorts are stable, so events sharing a date keep their per-ticker
/// insertion order.
pub fn order_events(events: Vec<CalendarEvent>) -> Vec<CalendarEvent> {
    let (mut upcoming, mut past): (Vec<_>, Vec<_>) = events
        .into_iter()
        .partition(|e| e.status == EventStatus::Upcoming);

    upcoming.sort_by_key(|e| e.date);
    past.sort_by_key(|e| std::cmp::Reverse(e.date));

    upcoming.extend(past);
    upcoming
}

/// Split an ordered event list into its upcoming and past halves.
pub fn split_upcoming_past(
    events: &[CalendarEvent],
) -> (Vec<&CalendarEvent>, Vec<&CalendarEvent>) {
    events
        .iter()
        .partition(|e| e.status == EventStatus::Upcoming)
}

/// Group events by `YYYY-MM` month key, months in first-seen event order.
///
/// The input's ordering carries through: over an [`order_events`] output,
/// the upcoming half groups into ascending months and the past half into
/// most-recent-first months.
pub fn group_by_month(events: &[CalendarEvent]) -> Vec<(String, Vec<&CalendarEvent>)> {
    let mut grouped: Vec<(String, Vec<&CalendarEvent>)> = Vec::new();
    for event in events {
        let key = event.date.format("%Y-%m").to_string();
        match grouped.iter_mut().find(|(month, _)| *month == key) {
            Some((_, bucket)) => bucket.push(event),
            None => grouped.push((key, vec![event])),
        }
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(date: (i32, u32, u32), status: EventStatus) -> CalendarEvent {
        CalendarEvent {
            ticker: "AAPL".to_string(),
            event_type: "10-K".to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            time: None,
            status,
            category: EventCategory::SecFiling,
        }
    }

    #[test]
    fn test_upcoming_ascending_then_past_descending() {
        let events = vec![
            event((2025, 3, 1), EventStatus::Upcoming),
            event((2024, 1, 1), EventStatus::Past),
            event((2025, 1, 15), EventStatus::Upcoming),
            event((2023, 6, 1), EventStatus::Past),
        ];

        let ordered = order_events(events);
        let dates: Vec<String> = ordered.iter().map(|e| e.date.to_string()).collect();
        assert_eq!(
            dates,
            vec!["2025-01-15", "2025-03-01", "2024-01-01", "2023-06-01"]
        );
    }

    #[test]
    fn test_order_is_stable_within_a_date() {
        let mut first = event((2024, 1, 1), EventStatus::Past);
        first.ticker = "AAPL".to_string();
        let mut second = event((2024, 1, 1), EventStatus::Past);
        second.ticker = "MSFT".to_string();

        let ordered = order_events(vec![first, second]);
        assert_eq!(ordered[0].ticker, "AAPL");
        assert_eq!(ordered[1].ticker, "MSFT");
    }

    #[test]
    fn test_split_upcoming_past() {
        let events = vec![
            event((2025, 3, 1), EventStatus::Upcoming),
            event((2024, 1, 1), EventStatus::Past),
        ];
        let (upcoming, past) = split_upcoming_past(&events);
        assert_eq!(upcoming.len(), 1);
        assert_eq!(past.len(), 1);
    }

    #[test]
    fn test_group_by_month() {
        let events = vec![
            event((2025, 3, 1), EventStatus::Upcoming),
            event((2025, 3, 15), EventStatus::Upcoming),
            event((2024, 11, 1), EventStatus::Past),
        ];
        let grouped = group_by_month(&events);
        assert_eq!(grouped[0].0, "2025-03");
        assert_eq!(grouped[0].1.len(), 2);
        assert_eq!(grouped[1].0, "2024-11");
        assert_eq!(grouped[1].1.len(), 1);
    }

    #[test]
    fn test_group_by_month_keeps_past_months_most_recent_first() {
        let ordered = order_events(vec![
            event((2023, 6, 1), EventStatus::Past),
            event((2024, 1, 1), EventStatus::Past),
            event((2024, 1, 15), EventStatus::Past),
        ]);
        let months: Vec<String> = group_by_month(&ordered)
            .into_iter()
            .map(|(month, _)| month)
            .collect();
        assert_eq!(months, vec!["2024-01", "2023-06"]);
    }
}
