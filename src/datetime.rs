//! Date helpers over `chrono`.
//!
//! Formats use strftime syntax (`%Y-%m-%d`), not the `yyyy-MM-dd` style.

use chrono::{DateTime, Duration, Local, TimeZone};

pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, fmt: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format(fmt).to_string()
}

/// Add `days` (may be negative)
pub fn add_days<Tz: TimeZone>(date: DateTime<Tz>, days: i64) -> DateTime<Tz> {
    date + Duration::days(days)
}

/// Subtract `days` (may be negative)
pub fn subtract_days<Tz: TimeZone>(date: DateTime<Tz>, days: i64) -> DateTime<Tz> {
    date - Duration::days(days)
}

/// Whole days from `later` back to `earlier`, truncated toward zero
pub fn difference_in_days<Tz: TimeZone>(later: &DateTime<Tz>, earlier: &DateTime<Tz>) -> i64 {
    later.clone().signed_duration_since(earlier.clone()).num_days()
}

pub fn current_date() -> DateTime<Local> {
    Local::now()
}
