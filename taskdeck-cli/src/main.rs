use std::collections::HashSet;

use chrono::{Datelike, Local, NaiveDate, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use taskdeck_core::validate::{validate_category, validate_description, validate_due_date, validate_title};
use taskdeck_core::{Todo, TodoFilter, TodoStatus, paginate};

use crate::calendar::render_month;
use crate::cli::{CategoryAction, Cli, Commands, DueOrder, ExportFormat, StatusArg};
use crate::config::Config;
use crate::display::{DisplayMode, category_label, format_summary, format_todo, supports_color};
use crate::error::{CliError, Result};
use crate::storage::JsonStore;

mod calendar;
mod cli;
mod config;
mod display;
mod error;
mod export;
mod import;
mod storage;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cfg: Config = confy::load("taskdeck", None)?;
    let store = JsonStore::from_config(&cfg);

    match cli.command {
        Commands::Add {
            title,
            due,
            category,
            description,
            status,
        } => {
            let mut todos = store.load_todos();
            let categories = store.load_categories();
            let title = title.join(" ");

            check_form_title(&title)?;
            check_form_description(description.as_deref())?;
            check_form_category(&category, &categories.title_set())?;
            let due_date = check_form_due(&due)?;

            let status = status.map(TodoStatus::from).unwrap_or_default();
            let completed_at = status.is_completed().then(Utc::now);

            let todo = Todo::new(title.trim(), category.trim(), due_date)
                .with_description(normalize_description(description))
                .with_status(status)
                .with_completed_at(completed_at);
            let added = todos.add(todo);
            println!(
                "Task added: {} (due: {})",
                added.title,
                added.due_date.format("%Y-%m-%d")
            );
            store.save_todos(&todos);
        }

        Commands::List {
            completed,
            category,
            search,
            sort,
            page,
            per_page,
            detailed,
            no_color,
        } => {
            let todos = store.load_todos();
            let categories = store.load_categories();

            let filter = TodoFilter::new()
                .with_status(if completed {
                    TodoStatus::Completed
                } else {
                    TodoStatus::Pending
                })
                .with_categories(category.into_iter().collect())
                .with_search(search)
                .sort_by(sort.map(|order| match order {
                    DueOrder::Asc => taskdeck_core::DueSort::Asc,
                    DueOrder::Desc => taskdeck_core::DueSort::Desc,
                }));

            let filtered = filter.apply(todos.iter());
            if filtered.is_empty() {
                println!("No tasks found.");
                return Ok(());
            }

            let per_page = per_page.unwrap_or(cfg.items_per_page);
            let paged = paginate(&filtered, page, per_page);
            let overdue = filtered.iter().filter(|t| t.is_overdue()).count();

            let mode = if detailed {
                DisplayMode::Detailed
            } else {
                DisplayMode::Default
            };
            let use_color = !no_color && supports_color();

            for &todo in paged.items {
                println!("{}", format_todo(todo, &categories, mode, use_color));
            }
            println!();
            println!("{}", format_summary(&paged, overdue, completed, use_color));
        }

        Commands::Show { id } => {
            let todos = store.load_todos();
            let categories = store.load_categories();
            let todo = todos.resolve(&id)?;
            println!(
                "{}",
                format_todo(todo, &categories, DisplayMode::Detailed, supports_color())
            );
        }

        Commands::Edit {
            id,
            title,
            description,
            category,
            due,
        } => {
            if title.is_none() && description.is_none() && category.is_none() && due.is_none() {
                return Err(CliError::validation(
                    "edit",
                    "At least one of --title, --description, --category or --due must be provided",
                ));
            }

            let mut todos = store.load_todos();
            let categories = store.load_categories();

            if let Some(title) = &title {
                check_form_title(title)?;
            }
            check_form_description(description.as_deref())?;
            if let Some(category) = &category {
                check_form_category(category, &categories.title_set())?;
            }
            let due_date = due.as_deref().map(check_form_due).transpose()?;

            let todo = todos.resolve_mut(&id)?;
            if let Some(title) = title {
                todo.title = title.trim().to_string();
            }
            if description.is_some() {
                todo.description = normalize_description(description);
            }
            if let Some(category) = category {
                todo.category = category.trim().to_string();
            }
            if let Some(due_date) = due_date {
                todo.due_date = due_date;
            }

            println!("Updated task #{}: {}", short_id(&todo.id), todo.title);
            store.save_todos(&todos);
        }

        Commands::Check { id } => {
            let mut todos = store.load_todos();
            let todo = todos.toggle(&id)?;
            let state = if todo.status.is_completed() { "done" } else { "open" };
            println!("Marked task #{} as {}: {}", short_id(&todo.id), state, todo.title);
            store.save_todos(&todos);
        }

        Commands::Remove { id } => {
            let mut todos = store.load_todos();
            let removed = todos.remove(&id)?;
            println!("Removed: {}", removed.title);
            store.save_todos(&todos);
        }

        Commands::Move { id, before, after } => {
            let (target, place_before) = match (before, after) {
                (Some(target), None) => (target, true),
                (None, Some(target)) => (target, false),
                _ => {
                    return Err(CliError::validation(
                        "move",
                        "Exactly one of --before or --after must be provided",
                    ));
                }
            };

            let mut todos = store.load_todos();
            todos.move_relative(&id, &target, place_before)?;
            let moved = todos.resolve(&id)?;
            println!(
                "Moved task #{} to position {}",
                short_id(&moved.id),
                moved.order.unwrap_or(0)
            );
            store.save_todos(&todos);
        }

        Commands::Category { action } => run_category(action, &store)?,

        Commands::Calendar {
            month,
            category,
            status,
            no_color,
        } => {
            let todos = store.load_todos();
            let categories = store.load_categories();

            let first_of_month = match month {
                Some(raw) => NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
                    .map_err(|e| {
                        CliError::parse_with_source(
                            format!("Invalid month \"{raw}\", expected YYYY-MM"),
                            e,
                        )
                    })?,
                None => Local::now()
                    .date_naive()
                    .with_day(1)
                    .expect("first of month exists"),
            };

            // The calendar shows pending tasks unless told otherwise
            let statuses: Vec<TodoStatus> = if status.is_empty() {
                vec![TodoStatus::Pending]
            } else {
                status.into_iter().map(TodoStatus::from).collect()
            };
            let selected: HashSet<String> = category.into_iter().collect();

            let filtered: Vec<&Todo> = todos
                .iter()
                .filter(|t| selected.is_empty() || selected.contains(&t.category))
                .filter(|t| statuses.contains(&t.status))
                .collect();

            let use_color = !no_color && supports_color();
            print!(
                "{}",
                render_month(first_of_month, &filtered, &categories, use_color)
            );
        }

        Commands::Import { file } => {
            let imported = import::run_import(&file, &store)?;
            println!("Successfully imported {imported} tasks!");
        }

        Commands::Export { format, output } => {
            let todos = store.load_todos();
            if todos.is_empty() {
                println!("No tasks to export.");
                return Ok(());
            }

            let path = output.unwrap_or_else(|| match format {
                ExportFormat::Csv => export::default_filename("csv").into(),
                ExportFormat::Xlsx => export::default_filename("xlsx").into(),
            });
            match format {
                ExportFormat::Csv => export::export_csv(&todos.todos, &path)?,
                ExportFormat::Xlsx => export::export_xlsx(&todos.todos, &path)?,
            }
            println!("Exported {} tasks to {}", todos.len(), path.display());
        }
    }

    Ok(())
}

fn run_category(action: CategoryAction, store: &JsonStore) -> Result<()> {
    match action {
        CategoryAction::List { no_color } => {
            let categories = store.load_categories();
            let todos = store.load_todos();
            let use_color = !no_color && supports_color();

            if categories.is_empty() {
                println!("No categories yet.");
                return Ok(());
            }
            for category in categories.iter() {
                let count = todos.count_in_category(&category.title);
                println!(
                    "[{}] {} {} - {} task(s)",
                    category.id,
                    category_label(&category.title, &categories, use_color),
                    category.color,
                    count
                );
            }
        }

        CategoryAction::Add { title, color } => {
            let mut categories = store.load_categories();
            let added = categories.add(&title, &color)?;
            println!("Category added: {} ({})", added.title, added.color);
            store.save_categories(&categories);
        }

        CategoryAction::Edit { id, title, color } => {
            if title.is_none() && color.is_none() {
                return Err(CliError::validation(
                    "category edit",
                    "At least one of --title or --color must be provided",
                ));
            }
            let mut categories = store.load_categories();
            categories.update(&id, title.as_deref(), color.as_deref())?;
            let updated = categories
                .get(&id)
                .expect("category exists after update");
            println!("Category updated: {} ({})", updated.title, updated.color);
            store.save_categories(&categories);
        }

        CategoryAction::Remove { id } => {
            let mut categories = store.load_categories();
            let todos = store.load_todos();

            let removed = categories.remove_if_unused(&id, &todos)?;
            println!("Category removed: {}", removed.title);
            store.save_categories(&categories);
        }
    }
    Ok(())
}

impl From<StatusArg> for TodoStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Pending => TodoStatus::Pending,
            StatusArg::Completed => TodoStatus::Completed,
        }
    }
}

fn short_id(id: &str) -> &str {
    &id[..id.len().min(8)]
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

fn check_form_title(title: &str) -> Result<()> {
    match validate_title(title) {
        Some(message) => Err(CliError::validation("title", message)),
        None => Ok(()),
    }
}

fn check_form_description(description: Option<&str>) -> Result<()> {
    match validate_description(description) {
        Some(message) => Err(CliError::validation("description", message)),
        None => Ok(()),
    }
}

fn check_form_category(category: &str, titles: &HashSet<String>) -> Result<()> {
    match validate_category(category, titles) {
        Some(message) => Err(CliError::validation("category", message)),
        None => Ok(()),
    }
}

fn check_form_due(due: &str) -> Result<NaiveDate> {
    validate_due_date(due)
        .map(|dt| dt.date())
        .map_err(|message| CliError::validation("dueDate", message))
}
