//! Date and time utility functions
//!
//! This module provides the date conventions shared by the store and the
//! sync engine: `%Y-%m-%d` date strings for payload fields and
//! epoch-millisecond integers for modification timestamps.

use chrono::{DateTime, Duration, Local, Months, NaiveDate, Utc};

/// Standard date format used throughout the application
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a date string in YYYY-MM-DD format to NaiveDate
pub fn parse_date(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date_str, DATE_FORMAT)
}

/// Format a NaiveDate to YYYY-MM-DD string
pub fn format_ymd(d: NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

/// Format current local date to YYYY-MM-DD string
pub fn format_today() -> String {
    format_ymd(Local::now().date_naive())
}

/// Current time as epoch milliseconds.
///
/// Every write path stamps this onto `last_modified`, including
/// tombstone sets.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Epoch milliseconds for a point `days` days in the past.
pub fn ms_days_ago(days: i64) -> i64 {
    (Utc::now() - Duration::days(days)).timestamp_millis()
}

/// Convert an epoch-millisecond timestamp to the remote store's
/// temporal type.
pub fn ms_to_datetime(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(ms)
}

/// Advance a date by one recurrence step.
///
/// `step_months` of 0 means the step is expressed in days instead.
pub fn advance_date(date: NaiveDate, step_days: i64, step_months: u32) -> NaiveDate {
    if step_months > 0 {
        date + Months::new(step_months)
    } else {
        date + Duration::days(step_days)
    }
}
