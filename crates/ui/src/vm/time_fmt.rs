use chrono::{DateTime, NaiveDate, Utc};

/// Calendar date the way the roster shows it.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Timestamp for step completion labels.
#[must_use]
pub fn format_datetime(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}
