//! Month calendar rendering
//!
//! Lays out one month as a Monday-first grid, marking days that have due
//! tasks (colored by their category), followed by a day-by-day listing.

use chrono::{Datelike, Months, NaiveDate};
use colored::*;

use taskdeck_core::{CategoryList, Todo};

use crate::display::hex_to_rgb;

const CELL_WIDTH: usize = 5;

/// Render the month containing `first_of_month` with the given todos.
///
/// The caller filters the todos (category/status) beforehand; todos due in
/// other months are ignored here.
pub fn render_month(
    first_of_month: NaiveDate,
    todos: &[&Todo],
    categories: &CategoryList,
    use_color: bool,
) -> String {
    let mut out = String::new();

    let month_days = days_in_month(first_of_month);
    let mut by_day: Vec<Vec<&Todo>> = vec![Vec::new(); month_days as usize + 1];
    for &todo in todos {
        if todo.due_date.year() == first_of_month.year()
            && todo.due_date.month() == first_of_month.month()
        {
            by_day[todo.due_date.day() as usize].push(todo);
        }
    }

    let heading = first_of_month.format("%B %Y").to_string();
    out.push_str(&format!("{heading:^width$}\n", width = CELL_WIDTH * 7));
    for name in ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"] {
        out.push_str(&format!("{name:>CELL_WIDTH$}"));
    }
    out.push('\n');

    let leading = first_of_month.weekday().num_days_from_monday() as usize;
    out.push_str(&" ".repeat(leading * CELL_WIDTH));

    let mut weekday_cursor = leading;
    for day in 1..=month_days {
        let tasks = &by_day[day as usize];
        let cell = if tasks.is_empty() {
            format!("{day:>3}  ")
        } else {
            format!("{day:>3}{:<2}", marker(tasks.len()))
        };

        let cell = if use_color && !tasks.is_empty() {
            match category_rgb(tasks[0], categories) {
                Some((r, g, b)) => cell.truecolor(r, g, b).to_string(),
                None => cell.bold().to_string(),
            }
        } else {
            cell
        };
        out.push_str(&cell);

        weekday_cursor += 1;
        if weekday_cursor == 7 {
            out.push('\n');
            weekday_cursor = 0;
        }
    }
    if weekday_cursor != 0 {
        out.push('\n');
    }

    // Day-by-day listing under the grid
    let mut any = false;
    for day in 1..=month_days {
        let tasks = &by_day[day as usize];
        if tasks.is_empty() {
            continue;
        }
        any = true;
        if let Some(date) = first_of_month.with_day(day) {
            out.push_str(&format!("\n{}\n", date.format("%a %Y-%m-%d")));
        }
        for &todo in tasks {
            let checkbox = if todo.status.is_completed() { "[✓]" } else { "[ ]" };
            let label = match (use_color, category_rgb(todo, categories)) {
                (true, Some((r, g, b))) => todo.category.truecolor(r, g, b).to_string(),
                _ => todo.category.clone(),
            };
            out.push_str(&format!("  {checkbox} {} @{label}\n", todo.title));
        }
    }
    if !any {
        out.push_str("\nNo tasks due this month.\n");
    }

    out
}

fn category_rgb(todo: &Todo, categories: &CategoryList) -> Option<(u8, u8, u8)> {
    categories
        .find_by_title(&todo.category)
        .and_then(|c| hex_to_rgb(&c.color))
}

fn marker(count: usize) -> String {
    if count > 1 {
        format!("*{count}")
    } else {
        "*".to_string()
    }
}

fn days_in_month(first_of_month: NaiveDate) -> u32 {
    let next = first_of_month + Months::new(1);
    next.signed_duration_since(first_of_month).num_days() as u32
}
