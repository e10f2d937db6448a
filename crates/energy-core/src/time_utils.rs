use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Weekday};
use tracing::warn;

use crate::error::{ReportError, Result};

/// Format used for dates entered by the user and printed in reports.
pub const USER_DATE_FORMAT: &str = "%d.%m.%Y";

// ── Timestamp parsing ─────────────────────────────────────────────────────────

/// Parse an ISO 8601 timestamp from a data file into wall-clock time.
///
/// Accepts `T` or space separators, optional fractional seconds, an optional
/// `Z`/UTC offset (the offset is dropped, the local reading is kept) and a bare
/// date, which is read as midnight. Returns `None` for anything else.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    const FMTS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in FMTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    warn!("could not parse timestamp \"{}\"", s);
    None
}

// ── User dates ────────────────────────────────────────────────────────────────

/// Parse a `dd.mm.yyyy` date entered on the command line.
pub fn parse_user_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), USER_DATE_FORMAT)
        .map_err(|_| ReportError::InvalidDate(s.to_string()))
}

/// Render a date as `dd.mm.yyyy`.
pub fn format_user_date(date: NaiveDate) -> String {
    date.format(USER_DATE_FORMAT).to_string()
}

// ── Calendar helpers ──────────────────────────────────────────────────────────

/// English name of the weekday, as printed in the weekly table.
pub fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Validate a month number.
pub fn check_month(month: u32) -> Result<u32> {
    if (1..=12).contains(&month) {
        Ok(month)
    } else {
        Err(ReportError::InvalidMonth(month))
    }
}

/// Monday and Sunday of ISO week `week` in ISO year `year`.
pub fn iso_week_bounds(year: i32, week: u32) -> Result<(NaiveDate, NaiveDate)> {
    let monday = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon);
    let sunday = NaiveDate::from_isoywd_opt(year, week, Weekday::Sun);
    match (monday, sunday) {
        (Some(m), Some(s)) => Ok((m, s)),
        _ => Err(ReportError::InvalidWeek { year, week }),
    }
}

/// Every calendar date of the inclusive range, in order.
///
/// Empty when `end < start`.
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
