//! Time utilities: the wall clock used by every status computation, and
//! RFC 3339 parsing/formatting.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};

/// Source of "now". Commands read the clock once and pass the instant down,
/// so a whole computation sees one consistent time.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    pub fn from_override(value: Option<&str>) -> AppResult<Self> {
        match value {
            Some(v) => Ok(Clock::Fixed(parse_timestamp(v)?)),
            None => Ok(Clock::System),
        }
    }
}

pub fn parse_timestamp(s: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::InvalidTimestamp(s.to_string()))
}

/// `2025-01-01 09:00` (UTC) or `-` when missing.
pub fn format_optional(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn format_rfc3339(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.to_rfc3339()).unwrap_or_default()
}
