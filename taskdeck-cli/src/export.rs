//! Bulk export of the todo collection to CSV or spreadsheet files

use std::path::Path;

use chrono::{Local, SecondsFormat};
use rust_xlsxwriter::Workbook;
use serde::Serialize;

use taskdeck_core::Todo;

use crate::error::Result;

/// Human-labeled headers for the spreadsheet export
const SHEET_HEADERS: [&str; 6] = [
    "Title",
    "Description",
    "Category",
    "Due Date",
    "Status",
    "Completed At",
];

/// One CSV row; field names are the import header contract
#[derive(Serialize)]
struct CsvRow<'a> {
    title: &'a str,
    description: &'a str,
    category: &'a str,
    #[serde(rename = "dueDate")]
    due_date: String,
    status: String,
    #[serde(rename = "completedAt")]
    completed_at: String,
}

impl<'a> From<&'a Todo> for CsvRow<'a> {
    fn from(todo: &'a Todo) -> Self {
        Self {
            title: &todo.title,
            description: todo.description.as_deref().unwrap_or(""),
            category: &todo.category,
            due_date: todo.due_date.format("%Y-%m-%d").to_string(),
            status: todo.status.to_string(),
            completed_at: todo
                .completed_at
                .map(|at| at.to_rfc3339_opts(SecondsFormat::Millis, true))
                .unwrap_or_default(),
        }
    }
}

/// Default export filename: `tasks-{ISO-date}.{extension}`
pub fn default_filename(extension: &str) -> String {
    format!("tasks-{}.{extension}", Local::now().format("%Y-%m-%d"))
}

/// Write the todos as CSV with the `title,description,category,dueDate,
/// status,completedAt` header; embedded quotes are doubled by the writer.
pub fn export_csv(todos: &[Todo], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for todo in todos {
        writer.serialize(CsvRow::from(todo))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the todos as a single-sheet workbook named "Tasks" with
/// human-labeled headers.
pub fn export_xlsx(todos: &[Todo], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Tasks")?;

    for (col, header) in SHEET_HEADERS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (index, todo) in todos.iter().enumerate() {
        let row = CsvRow::from(todo);
        let line = index as u32 + 1;
        worksheet.write_string(line, 0, row.title)?;
        worksheet.write_string(line, 1, row.description)?;
        worksheet.write_string(line, 2, row.category)?;
        worksheet.write_string(line, 3, &row.due_date)?;
        worksheet.write_string(line, 4, &row.status)?;
        worksheet.write_string(line, 5, &row.completed_at)?;
    }

    workbook.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::import::run_import;
    use crate::storage::JsonStore;
    use taskdeck_core::{TodoList, TodoStatus};

    fn sample_todos() -> TodoList {
        let mut todos = TodoList::new();
        todos.add(
            Todo::new(
                "Buy \"fancy\" milk",
                "Personal",
                NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            )
            .with_description(Some("two liters, maybe three".to_string())),
        );
        todos.add(Todo::new(
            "Ship release",
            "Work",
            NaiveDate::from_ymd_opt(2030, 2, 1).unwrap(),
        ));
        todos.toggle(&todos.todos[1].id.clone()).unwrap();
        todos
    }

    #[test]
    fn test_default_filename_shape() {
        let name = default_filename("csv");
        assert!(name.starts_with("tasks-"));
        assert!(name.ends_with(".csv"));
    }

    #[test]
    fn test_csv_header_contract_and_quoting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let todos = sample_todos();
        export_csv(&todos.todos, &path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let mut lines = raw.lines();
        assert_eq!(
            lines.next().unwrap(),
            "title,description,category,dueDate,status,completedAt"
        );
        // Embedded quotes are doubled
        assert!(raw.contains("\"Buy \"\"fancy\"\" milk\""));
        // The description with a comma is quoted
        assert!(raw.contains("\"two liters, maybe three\""));
    }

    #[test]
    fn test_export_then_reimport_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path(), "todos.json", "categories.json");
        let path = dir.path().join("out.csv");

        let todos = sample_todos();
        export_csv(&todos.todos, &path).unwrap();

        let imported = run_import(&path, &store).unwrap();
        assert_eq!(imported, 2);

        let reloaded = store.load_todos();
        for (original, round_tripped) in todos.iter().zip(reloaded.iter()) {
            assert_eq!(original.title, round_tripped.title);
            assert_eq!(original.description, round_tripped.description);
            assert_eq!(original.category, round_tripped.category);
            assert_eq!(original.due_date, round_tripped.due_date);
            assert_eq!(original.status, round_tripped.status);
            // Identifiers are freshly assigned
            assert_ne!(original.id, round_tripped.id);
        }
        // The completed task's instant survives at second precision
        let original_at = todos.todos[1].completed_at.unwrap();
        let round_tripped_at = reloaded.todos[1].completed_at.unwrap();
        assert_eq!(original_at.timestamp(), round_tripped_at.timestamp());
    }

    #[test]
    fn test_xlsx_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let todos = sample_todos();
        export_xlsx(&todos.todos, &path).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }
}
