//! Flexible date parsing module
//!
//! Supports the import file contract's date formats:
//! - Date only: "25-01-2026", "01/25/2026", "2026-01-25"
//! - Date and time: "2026-01-25 14:30", "25/01/2026 14:30:00"
//! - ISO instants as a fallback: "2026-01-25T14:30:00Z"

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Why a raw string failed to parse as a date
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateError {
    #[error("Due date is required")]
    Missing,

    #[error("Invalid date format")]
    Unrecognized,
}

/// The supported explicit patterns, tried strictly in this order.
///
/// Day-first, month-first, and year-first families with `-` and `/`
/// separators, at day, then minute, then second precision. Several patterns
/// are ambiguous with each other ("03-04-2026" matches both the day-first
/// and month-first family); the first match in list order wins. This order
/// is a compatibility contract - do not reorder.
const FORMATS: [(&str, bool); 18] = [
    ("%d-%m-%Y", false),
    ("%m-%d-%Y", false),
    ("%Y-%m-%d", false),
    ("%d/%m/%Y", false),
    ("%m/%d/%Y", false),
    ("%Y/%m/%d", false),
    ("%d-%m-%Y %H:%M", true),
    ("%m-%d-%Y %H:%M", true),
    ("%Y-%m-%d %H:%M", true),
    ("%d/%m/%Y %H:%M", true),
    ("%m/%d/%Y %H:%M", true),
    ("%Y/%m/%d %H:%M", true),
    ("%d-%m-%Y %H:%M:%S", true),
    ("%m-%d-%Y %H:%M:%S", true),
    ("%Y-%m-%d %H:%M:%S", true),
    ("%d/%m/%Y %H:%M:%S", true),
    ("%m/%d/%Y %H:%M:%S", true),
    ("%Y/%m/%d %H:%M:%S", true),
];

/// Parse a raw string into a point in time.
///
/// Tries every explicit pattern in order, then falls back to locale-free
/// native forms (RFC 3339, zoneless ISO `T` datetimes, RFC 2822). Date-only
/// patterns yield midnight. Empty or whitespace-only input is reported as
/// [`DateError::Missing`], distinct from [`DateError::Unrecognized`].
pub fn parse_flexible(raw: &str) -> Result<NaiveDateTime, DateError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DateError::Missing);
    }

    for (pattern, has_time) in FORMATS {
        let parsed = if has_time {
            NaiveDateTime::parse_from_str(trimmed, pattern).ok()
        } else {
            NaiveDate::parse_from_str(trimmed, pattern)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        };
        if let Some(dt) = parsed {
            return Ok(dt);
        }
    }

    parse_native(trimmed).ok_or(DateError::Unrecognized)
}

/// Native fallback parse: the forms the app itself produces.
///
/// RFC 3339 covers re-imported CSV exports (completedAt instants); the
/// zoneless `T` forms cover spreadsheet serial conversions; RFC 2822 rounds
/// out the common machine-written formats. Offset-carrying inputs are
/// normalized to UTC.
fn parse_native(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.naive_utc());
    }
    None
}

/// Format a NaiveDate for human-readable display
///
/// Returns strings like: "Today", "Tomorrow", "Mon Jan 27", "Overdue (3 days ago)"
pub fn format_date_human(date: NaiveDate, relative_to_today: bool) -> String {
    if !relative_to_today {
        return date.format("%Y-%m-%d").to_string();
    }

    let today = Local::now().date_naive();
    let diff = date.signed_duration_since(today).num_days();

    match diff {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        2..=6 => date.format("%a %b %d").to_string(),
        7..=365 => date.format("%b %d").to_string(),
        _ if diff < 0 => format!("Overdue ({} days ago)", -diff),
        _ => date.format("%Y-%m-%d").to_string(),
    }
}
