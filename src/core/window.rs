//! Classification of an activity's time window relative to "now".

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeStatus {
    NotStarted,
    Ongoing,
    Ended,
}

impl TimeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeStatus::NotStarted => "not_started",
            TimeStatus::Ongoing => "ongoing",
            TimeStatus::Ended => "ended",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeStatus::NotStarted => "Not started",
            TimeStatus::Ongoing => "Ongoing",
            TimeStatus::Ended => "Ended",
        }
    }
}

/// Classify `now` against `[start, end]`. Both bounds are inclusive; a
/// window with a missing bound is treated as not started.
pub fn classify(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> TimeStatus {
    let (Some(start), Some(end)) = (start, end) else {
        return TimeStatus::NotStarted;
    };

    if now < start {
        TimeStatus::NotStarted
    } else if now > end {
        TimeStatus::Ended
    } else {
        TimeStatus::Ongoing
    }
}

pub fn is_ongoing(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    classify(start, end, now) == TimeStatus::Ongoing
}

/// False when no end is known.
pub fn is_ended(end: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    end.is_some_and(|e| now > e)
}

/// True when no start is known.
pub fn is_not_started(start: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    start.is_none_or(|s| now < s)
}

/// Day-granularity check used to open organizer check-in for the whole day:
/// `now`, `start` and `end` are truncated to their UTC calendar date first.
pub fn is_within_date_range(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    let (Some(start), Some(end)) = (start, end) else {
        return false;
    };

    let today = utc_day(now);
    utc_day(start) <= today && today <= utc_day(end)
}

pub fn is_multi_day(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> bool {
    match (start, end) {
        (Some(s), Some(e)) => utc_day(s) != utc_day(e),
        _ => false,
    }
}

/// `2025-01-01 at 09:00 - 12:00` for single-day windows,
/// `2025-01-01 09:00 - 2025-01-03 17:00` otherwise.
pub fn format_window(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> String {
    match (start, end) {
        (Some(s), Some(e)) if !is_multi_day(start, end) => format!(
            "{} at {} - {}",
            s.format("%Y-%m-%d"),
            s.format("%H:%M"),
            e.format("%H:%M")
        ),
        (Some(s), Some(e)) => format!(
            "{} - {}",
            s.format("%Y-%m-%d %H:%M"),
            e.format("%Y-%m-%d %H:%M")
        ),
        (Some(s), None) => format!("from {}", s.format("%Y-%m-%d %H:%M")),
        (None, Some(e)) => format!("until {}", e.format("%Y-%m-%d %H:%M")),
        (None, None) => "date to be announced".to_string(),
    }
}

fn utc_day(t: DateTime<Utc>) -> NaiveDate {
    t.date_naive()
}
