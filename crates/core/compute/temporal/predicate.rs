//! Calendar-field predicates over ingestion timestamps.
//!
//! All calendar fields are taken in UTC, for the requested instant and for
//! stored timestamps alike. Station and weather lookups share this single
//! definition of "the same hour".

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};

/// Matches timestamps that share year, month, day-of-month and hour with the
/// instant it was built from. Minutes, seconds and sub-seconds are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HourPredicate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
}

impl HourPredicate {
    pub fn of(instant: DateTime<Utc>) -> Self {
        Self {
            year: instant.year(),
            month: instant.month(),
            day: instant.day(),
            hour: instant.hour(),
        }
    }

    pub fn matches(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp.year() == self.year
            && timestamp.month() == self.month
            && timestamp.day() == self.day
            && timestamp.hour() == self.hour
    }
}

/// Calendar day a timestamp belongs to; the grouping key of daily sampling.
pub fn calendar_day(timestamp: DateTime<Utc>) -> NaiveDate {
    timestamp.date_naive()
}

/// Inclusive interval membership.
pub fn within(timestamp: DateTime<Utc>, from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
    from <= timestamp && timestamp <= to
}
