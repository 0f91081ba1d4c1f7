//! Bulk import: source parsers and the import orchestrator
//!
//! Files are dispatched once on a [`FileKind`] resolved from the extension,
//! parsed into raw records, run through the core validation pipeline, and
//! merged into storage only when every row is valid - a single bad row
//! aborts the whole import.

use std::ffi::OsStr;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use chrono::{DateTime, Utc};
use tracing::debug;

use taskdeck_core::validate::validate_records;
use taskdeck_core::{ParsedRecord, Todo};

use crate::error::{CliError, Result};
use crate::storage::JsonStore;

/// How many validation errors are shown before the rest are summarized
const MAX_REPORTED_ERRORS: usize = 3;

/// Days between the spreadsheet serial epoch (1899-12-30) and the Unix epoch
const SERIAL_EPOCH_OFFSET_DAYS: f64 = 25569.0;
const SECONDS_PER_DAY: f64 = 86400.0;

/// The kind of file selected for import, resolved once at the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Spreadsheet,
    Unsupported,
}

impl FileKind {
    pub fn detect(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => FileKind::Csv,
            Some("xlsx") | Some("xls") => FileKind::Spreadsheet,
            _ => FileKind::Unsupported,
        }
    }
}

/// Import tasks from a file into the store.
///
/// On success every validated row has been appended to the persisted todo
/// collection and the number of imported tasks is returned. On any failure
/// nothing is merged.
pub fn run_import(path: &Path, store: &JsonStore) -> Result<usize> {
    let records = match FileKind::detect(path) {
        FileKind::Csv => read_csv(path)?,
        FileKind::Spreadsheet => read_spreadsheet(path)?,
        FileKind::Unsupported => return Err(CliError::UnsupportedFileType),
    };
    debug!(records = records.len(), file = %path.display(), "parsed import file");

    if records.is_empty() {
        return Err(CliError::NoTasksFound);
    }

    let mut todos = store.load_todos();
    let categories = store.load_categories();

    let outcome = validate_records(&records, &categories.title_set());
    if !outcome.errors.is_empty() {
        return Err(CliError::ImportValidation(summarize_errors(&outcome.errors)));
    }

    let base_order = todos.max_order();
    let imported = outcome.valid.len();
    for (index, record) in outcome.valid.into_iter().enumerate() {
        let todo = Todo::new(record.title, record.category, record.due_date)
            .with_description(record.description)
            .with_status(record.status)
            .with_completed_at(record.completed_at)
            .with_order(Some(base_order + 1 + index as u32));
        todos.push(todo);
    }

    store.save_todos(&todos);
    Ok(imported)
}

/// First few error messages plus a count of the rest
fn summarize_errors(errors: &[String]) -> String {
    let mut message = errors
        .iter()
        .take(MAX_REPORTED_ERRORS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n");
    if errors.len() > MAX_REPORTED_ERRORS {
        message.push_str(&format!(
            "\n...and {} more errors",
            errors.len() - MAX_REPORTED_ERRORS
        ));
    }
    message
}

/// Parse a CSV file into raw records, keyed by the header row
fn read_csv(path: &Path) -> Result<Vec<ParsedRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize::<ParsedRecord>() {
        records.push(row?);
    }
    Ok(records)
}

/// Parse the first sheet of a spreadsheet file into raw records.
///
/// Date cells often arrive as numeric day serials rather than strings; any
/// numeric dueDate/completedAt cell is converted to its ISO form here so the
/// validation pipeline only ever sees strings.
fn read_spreadsheet(path: &Path) -> Result<Vec<ParsedRecord>> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| CliError::excel_with_source(e.to_string(), e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| CliError::excel("workbook has no sheets"))?
        .map_err(|e| CliError::excel_with_source(e.to_string(), e))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_row.iter().map(cell_to_string).collect();

    let mut records = Vec::new();
    for row in rows {
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }

        let mut record = ParsedRecord::default();
        for (index, cell) in row.iter().enumerate() {
            match headers.get(index).map(String::as_str) {
                Some("title") => record.title = cell_to_string(cell),
                Some("description") => {
                    let value = cell_to_string(cell);
                    if !value.is_empty() {
                        record.description = Some(value);
                    }
                }
                Some("category") => record.category = cell_to_string(cell),
                Some("dueDate") => record.due_date = date_cell_to_string(cell, false),
                Some("status") => record.status = cell_to_string(cell),
                Some("completedAt") => {
                    let value = date_cell_to_string(cell, true);
                    if !value.is_empty() {
                        record.completed_at = Some(value);
                    }
                }
                _ => {}
            }
        }
        records.push(record);
    }

    Ok(records)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Float(f) => format_float(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => format_float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(_) | Data::Empty => String::new(),
    }
}

fn format_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Convert a date cell to an ISO string, translating numeric day serials
fn date_cell_to_string(cell: &Data, include_time: bool) -> String {
    let serial = match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::DateTime(dt) => Some(dt.as_f64()),
        _ => None,
    };
    match serial.and_then(|s| serial_to_iso(s, include_time)) {
        Some(iso) => iso,
        None => cell_to_string(cell),
    }
}

/// Convert a spreadsheet day serial to an ISO date (day precision) or an
/// ISO datetime (second precision).
///
/// Serial day 25569 is the Unix epoch; the fractional part is the time of
/// day at 86400 seconds per day.
fn serial_to_iso(serial: f64, include_time: bool) -> Option<String> {
    let seconds = ((serial - SERIAL_EPOCH_OFFSET_DAYS) * SECONDS_PER_DAY).round() as i64;
    let instant: DateTime<Utc> = DateTime::from_timestamp(seconds, 0)?;
    let rendered = if include_time {
        instant.format("%Y-%m-%dT%H:%M:%S")
    } else {
        instant.format("%Y-%m-%d")
    };
    Some(rendered.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use taskdeck_core::TodoStatus;

    #[test]
    fn test_file_kind_detection() {
        assert_eq!(FileKind::detect(Path::new("tasks.csv")), FileKind::Csv);
        assert_eq!(FileKind::detect(Path::new("TASKS.CSV")), FileKind::Csv);
        assert_eq!(FileKind::detect(Path::new("tasks.xlsx")), FileKind::Spreadsheet);
        assert_eq!(FileKind::detect(Path::new("tasks.xls")), FileKind::Spreadsheet);
        assert_eq!(FileKind::detect(Path::new("tasks.txt")), FileKind::Unsupported);
        assert_eq!(FileKind::detect(Path::new("tasks")), FileKind::Unsupported);
    }

    #[test]
    fn test_serial_to_iso_day_precision() {
        assert_eq!(serial_to_iso(44927.0, false).unwrap(), "2023-01-01");
        assert_eq!(serial_to_iso(25569.0, false).unwrap(), "1970-01-01");
    }

    #[test]
    fn test_serial_to_iso_fractional_day() {
        assert_eq!(serial_to_iso(44927.5, true).unwrap(), "2023-01-01T12:00:00");
        assert_eq!(serial_to_iso(44927.25, true).unwrap(), "2023-01-01T06:00:00");
    }

    #[test]
    fn test_summarize_errors_caps_at_three() {
        let errors: Vec<String> = (1..=5).map(|n| format!("Row {n}: bad")).collect();
        let summary = summarize_errors(&errors);
        assert!(summary.contains("Row 1: bad"));
        assert!(summary.contains("Row 3: bad"));
        assert!(!summary.contains("Row 4: bad"));
        assert!(summary.ends_with("...and 2 more errors"));

        let short: Vec<String> = vec!["Row 1: bad".to_string()];
        assert_eq!(summarize_errors(&short), "Row 1: bad");
    }

    fn store_with_csv(csv: &str) -> (tempfile::TempDir, JsonStore, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path(), "todos.json", "categories.json");
        let file_path = dir.path().join("import.csv");
        let mut file = std::fs::File::create(&file_path).unwrap();
        file.write_all(csv.as_bytes()).unwrap();
        (dir, store, file_path)
    }

    #[test]
    fn test_import_csv_end_to_end() {
        let (_dir, store, file) = store_with_csv(
            "title,description,category,dueDate,status,completedAt\n\
             Buy milk,two liters,Personal,2030-01-01,pending,\n\
             Ship release,,Work,2030-02-01,Completed,2023-01-01 10:00:00\n",
        );

        let imported = run_import(&file, &store).unwrap();
        assert_eq!(imported, 2);

        let todos = store.load_todos();
        assert_eq!(todos.len(), 2);
        assert_eq!(todos.todos[0].title, "Buy milk");
        assert_eq!(todos.todos[0].description.as_deref(), Some("two liters"));
        assert_eq!(todos.todos[0].order, Some(1));
        assert_eq!(todos.todos[1].status, TodoStatus::Completed);
        assert!(todos.todos[1].completed_at.is_some());
        assert_eq!(todos.todos[1].order, Some(2));
    }

    #[test]
    fn test_import_aborts_on_any_invalid_row() {
        let (_dir, store, file) = store_with_csv(
            "title,description,category,dueDate,status,completedAt\n\
             Buy milk,,Personal,2030-01-01,pending,\n\
             x,,Nowhere,2030-01-01,pending,\n",
        );

        let err = run_import(&file, &store).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Row 2:"));
        assert!(message.contains("Title must be at least 3 characters"));
        assert!(message.contains("Category \"Nowhere\" does not exist"));

        // No partial merge
        assert!(store.load_todos().is_empty());
    }

    #[test]
    fn test_import_continues_order_from_current_maximum() {
        let (_dir, store, file) = store_with_csv(
            "title,category,dueDate\n\
             Imported one,Work,2030-01-01\n",
        );

        let mut todos = taskdeck_core::TodoList::new();
        todos.add(Todo::new(
            "Existing",
            "Work",
            chrono::NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
        ));
        store.save_todos(&todos);

        run_import(&file, &store).unwrap();
        let todos = store.load_todos();
        assert_eq!(todos.todos[1].order, Some(2));
    }

    #[test]
    fn test_import_empty_file_reports_no_tasks() {
        let (_dir, store, file) =
            store_with_csv("title,description,category,dueDate,status,completedAt\n");
        assert!(matches!(
            run_import(&file, &store),
            Err(CliError::NoTasksFound)
        ));
    }

    #[test]
    fn test_import_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path(), "todos.json", "categories.json");
        assert!(matches!(
            run_import(Path::new("notes.txt"), &store),
            Err(CliError::UnsupportedFileType)
        ));
    }
}
