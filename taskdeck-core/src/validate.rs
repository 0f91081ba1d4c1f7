//! Field validation and the bulk-import validation pipeline
//!
//! Each field validator is a pure function: raw value (plus optional
//! context) in, `None` or an error message out. The pipeline runs every
//! validator over every row without short-circuiting, reports one combined
//! message per failed row, and accepts rows atomically - a row with any
//! invalid field contributes nothing to the valid set.

use std::collections::HashSet;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::date::{DateError, parse_flexible};
use crate::task::TodoStatus;

/// One raw record from an imported file, keyed by the header contract
/// `title, description, category, dueDate, status, completedAt`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParsedRecord {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub due_date: String,
    pub status: String,
    pub completed_at: Option<String>,
}

/// A record that passed every validator, with normalized fields attached
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRecord {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub due_date: NaiveDate,
    pub status: TodoStatus,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Result of validating a batch of parsed records
#[derive(Debug, Default)]
pub struct ValidationOutcome {
    /// Accepted rows, in input order
    pub valid: Vec<ValidatedRecord>,
    /// One combined `"Row {n}: ..."` message per rejected row, in row order
    pub errors: Vec<String>,
}

/// Validate a todo title. Returns `None` when valid.
pub fn validate_title(title: &str) -> Option<&'static str> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Some("Title is required");
    }
    if trimmed.chars().count() < 3 {
        return Some("Title must be at least 3 characters");
    }
    if trimmed.chars().count() > 100 {
        return Some("Title must not exceed 100 characters");
    }
    None
}

/// Validate an optional description. Returns `None` when valid.
pub fn validate_description(description: Option<&str>) -> Option<&'static str> {
    match description {
        Some(text) if text.chars().count() > 500 => {
            Some("Description must not exceed 500 characters")
        }
        _ => None,
    }
}

/// Validate category membership against the current title set.
///
/// Membership is exact and case-sensitive, even though category uniqueness
/// is case-insensitive. Returns `None` when valid.
pub fn validate_category(category: &str, titles: &HashSet<String>) -> Option<String> {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        return Some("Category is required".to_string());
    }
    if !titles.contains(trimmed) {
        return Some(format!("Category \"{trimmed}\" does not exist"));
    }
    None
}

/// Parse and validate a due date: must parse and be today or later
pub fn validate_due_date(raw: &str) -> Result<NaiveDateTime, String> {
    let parsed = parse_flexible(raw).map_err(|e| e.to_string())?;
    if parsed.date() < Local::now().date_naive() {
        return Err("Due date must be today or later".to_string());
    }
    Ok(parsed)
}

/// Parse an optional completed-at timestamp.
///
/// Only consulted when the row's status resolves to completed; absent or
/// empty values normalize to `None`. Zoneless inputs are interpreted as UTC.
pub fn validate_completed_at(
    raw: Option<&str>,
    status: TodoStatus,
) -> Result<Option<DateTime<Utc>>, &'static str> {
    if status != TodoStatus::Completed {
        return Ok(None);
    }
    let Some(raw) = raw else {
        return Ok(None);
    };
    match parse_flexible(raw) {
        Ok(dt) => Ok(Some(Utc.from_utc_datetime(&dt))),
        Err(DateError::Missing) => Ok(None),
        Err(DateError::Unrecognized) => Err("Invalid completedAt date format"),
    }
}

/// Run every field validator over every record.
///
/// Rows are numbered from 1 for error reporting. All validators run for each
/// row so a single row reports every failing field at once.
pub fn validate_records(
    records: &[ParsedRecord],
    category_titles: &HashSet<String>,
) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();

    for (index, record) in records.iter().enumerate() {
        let mut row_errors: Vec<String> = Vec::new();
        let mut due_date: Option<NaiveDateTime> = None;

        if let Some(message) = validate_title(&record.title) {
            row_errors.push(message.to_string());
        }
        if let Some(message) = validate_description(record.description.as_deref()) {
            row_errors.push(message.to_string());
        }
        if let Some(message) = validate_category(&record.category, category_titles) {
            row_errors.push(message);
        }
        match validate_due_date(&record.due_date) {
            Ok(parsed) => due_date = Some(parsed),
            Err(message) => row_errors.push(message),
        }

        let status = TodoStatus::parse_lenient(&record.status);
        let completed_at = match validate_completed_at(record.completed_at.as_deref(), status) {
            Ok(completed_at) => completed_at,
            Err(message) => {
                row_errors.push(message.to_string());
                None
            }
        };

        if !row_errors.is_empty() {
            outcome
                .errors
                .push(format!("Row {}: {}", index + 1, row_errors.join(", ")));
        } else if let Some(due_date) = due_date {
            outcome.valid.push(ValidatedRecord {
                title: record.title.trim().to_string(),
                description: record
                    .description
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from),
                category: record.category.trim().to_string(),
                due_date: due_date.date(),
                status,
                completed_at,
            });
        }
    }

    outcome
}
