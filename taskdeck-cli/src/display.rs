//! Task display formatting module
//!
//! Handles colored output and different view modes for tasks

use chrono::Local;
use colored::*;

use taskdeck_core::date::format_date_human;
use taskdeck_core::page::Page;
use taskdeck_core::{CategoryList, Todo};

/// Display mode for the task list
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayMode {
    /// Full info with description and timestamps
    Detailed,
    /// Balanced view with clear status indicators (default)
    Default,
}

/// Check if terminal supports colors
pub fn supports_color() -> bool {
    atty::is(atty::Stream::Stdout)
}

/// Parse a 6-digit hex color into RGB components
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Render a category title in its configured color
pub fn category_label(title: &str, categories: &CategoryList, use_color: bool) -> String {
    if use_color {
        if let Some((r, g, b)) = categories
            .find_by_title(title)
            .and_then(|c| hex_to_rgb(&c.color))
        {
            return title.truecolor(r, g, b).to_string();
        }
    }
    title.to_string()
}

/// Format a task for display
pub fn format_todo(
    todo: &Todo,
    categories: &CategoryList,
    mode: DisplayMode,
    use_color: bool,
) -> String {
    let today = Local::now().date_naive();
    let checkbox = if todo.status.is_completed() { "[✓]" } else { "[ ]" };
    let short_id = &todo.id[..todo.id.len().min(8)];

    let diff_days = todo.due_date.signed_duration_since(today).num_days();
    let date_str = format!("(due {})", format_date_human(todo.due_date, true));
    let due_info = if use_color {
        if todo.status.is_completed() {
            date_str.green().to_string()
        } else if diff_days < 0 {
            date_str.red().bold().to_string()
        } else if diff_days <= 1 {
            date_str.yellow().to_string()
        } else {
            date_str.normal().to_string()
        }
    } else {
        date_str
    };

    let title = if use_color && todo.status.is_completed() {
        todo.title.green().to_string()
    } else {
        todo.title.clone()
    };

    let category = category_label(&todo.category, categories, use_color);

    match mode {
        DisplayMode::Default => {
            let id_str = if use_color {
                format!("[{short_id}]").cyan().to_string()
            } else {
                format!("[{short_id}]")
            };
            format!("{checkbox} {id_str} {title} @{category} {due_info}")
        }
        DisplayMode::Detailed => {
            let mut parts = vec![
                format!("{checkbox} [ID: {}]", todo.id),
                format!("Title: {title}"),
                format!("Category: {category}"),
                format!("Due: {} {due_info}", todo.due_date.format("%Y-%m-%d")),
                format!("Status: {}", todo.status),
            ];
            if let Some(description) = &todo.description {
                parts.insert(2, format!("Description: {description}"));
            }
            parts.push(format!(
                "Created: {}",
                todo.created_at.format("%Y-%m-%d %H:%M")
            ));
            if let Some(completed_at) = &todo.completed_at {
                parts.push(format!(
                    "Completed: {}",
                    completed_at.format("%Y-%m-%d %H:%M")
                ));
            }
            parts.join("\n  ")
        }
    }
}

/// Format the summary line under a task list page
pub fn format_summary(
    page: &Page<'_, &Todo>,
    overdue: usize,
    completed_view: bool,
    use_color: bool,
) -> String {
    let mut parts = vec![format!(
        "{} {}",
        page.total_items,
        if completed_view { "completed" } else { "pending" }
    )];

    if overdue > 0 {
        let overdue_str = format!("{overdue} overdue");
        parts.push(if use_color {
            overdue_str.red().to_string()
        } else {
            overdue_str
        });
    }

    if page.total_pages > 1 {
        parts.push(format!("page {}/{}", page.number, page.total_pages));
    }

    format!("[{}]", parts.join(" | "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use taskdeck_core::paginate;

    fn sample() -> (Todo, CategoryList) {
        let todo = Todo::new(
            "Test task",
            "Work",
            NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
        );
        (todo, CategoryList::with_defaults())
    }

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#3b82f6"), Some((0x3b, 0x82, 0xf6)));
        assert_eq!(hex_to_rgb("#FFFFFF"), Some((255, 255, 255)));
        assert_eq!(hex_to_rgb("3b82f6"), None);
        assert_eq!(hex_to_rgb("#xyzxyz"), None);
    }

    #[test]
    fn test_format_todo_default() {
        let (todo, categories) = sample();
        let output = format_todo(&todo, &categories, DisplayMode::Default, false);
        assert!(output.contains("[ ]"));
        assert!(output.contains("Test task"));
        assert!(output.contains("@Work"));
    }

    #[test]
    fn test_format_todo_completed() {
        let (mut todo, categories) = sample();
        todo.toggle();
        let output = format_todo(&todo, &categories, DisplayMode::Default, false);
        assert!(output.contains("[✓]"));
    }

    #[test]
    fn test_format_todo_detailed_includes_description() {
        let (todo, categories) = sample();
        let todo = todo.with_description(Some("the fine print".to_string()));
        let output = format_todo(&todo, &categories, DisplayMode::Detailed, false);
        assert!(output.contains("Description: the fine print"));
        assert!(output.contains("Status: pending"));
    }

    #[test]
    fn test_format_summary() {
        let (todo, _) = sample();
        let todos = vec![&todo];
        let page = paginate(&todos, 1, 10);
        let summary = format_summary(&page, 0, false, false);
        assert!(summary.contains("1 pending"));
        assert!(!summary.contains("page"));
    }
}
