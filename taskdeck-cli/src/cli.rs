use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "taskdeck")]
#[command(about = "A local-first task manager with categories, a month calendar, and CSV/Excel import/export")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Due-date sort order for the list view
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DueOrder {
    /// Earliest first
    Asc,
    /// Latest first
    Desc,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Pending,
    Completed,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task
    Add {
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
        /// Due date (e.g. 2026-03-14, 14/03/2026)
        #[arg(long, short = 'd', value_name = "DATE")]
        due: String,
        /// Category the task belongs to (must exist)
        #[arg(long, short = 'c', value_name = "CATEGORY")]
        category: String,
        /// Optional description
        #[arg(long, value_name = "TEXT")]
        description: Option<String>,
        /// Initial status
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },

    /// List tasks with filtering, sorting, and pagination
    List {
        /// Show the completed view instead of pending tasks
        #[arg(long)]
        completed: bool,
        /// Filter by category (can be specified multiple times)
        #[arg(long, short = 'c', value_name = "CATEGORY")]
        category: Vec<String>,
        /// Filter tasks whose title or description contains text
        #[arg(long, short = 's', value_name = "TERM")]
        search: Option<String>,
        /// Sort by due date instead of the default ordering
        #[arg(long, value_enum)]
        sort: Option<DueOrder>,
        /// Page to show
        #[arg(long, short = 'p', default_value_t = 1)]
        page: usize,
        /// Tasks per page (defaults to the configured page size)
        #[arg(long, value_name = "N")]
        per_page: Option<usize>,
        /// Use detailed format with full info
        #[arg(long)]
        detailed: bool,
        /// Disable colors
        #[arg(long)]
        no_color: bool,
    },

    /// Show full details of one task
    Show {
        /// Task id (or unique id prefix)
        id: String,
    },

    /// Edit a task's fields
    Edit {
        /// Task id (or unique id prefix)
        id: String,
        /// New title
        #[arg(long, value_name = "TITLE")]
        title: Option<String>,
        /// New description (use an empty string to clear)
        #[arg(long, value_name = "TEXT")]
        description: Option<String>,
        /// New category (must exist)
        #[arg(long, short = 'c', value_name = "CATEGORY")]
        category: Option<String>,
        /// New due date
        #[arg(long, short = 'd', value_name = "DATE")]
        due: Option<String>,
    },

    /// Toggle a task between pending and completed
    Check {
        /// Task id (or unique id prefix)
        id: String,
    },

    /// Remove a task
    Remove {
        /// Task id (or unique id prefix)
        id: String,
    },

    /// Move a task relative to another (manual ordering)
    Move {
        /// Task id (or unique id prefix)
        id: String,
        /// Place the task before this one
        #[arg(long, value_name = "ID", conflicts_with = "after")]
        before: Option<String>,
        /// Place the task after this one
        #[arg(long, value_name = "ID")]
        after: Option<String>,
    },

    /// Manage categories
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Show a month calendar of due tasks
    Calendar {
        /// Month to show, as YYYY-MM (defaults to the current month)
        #[arg(long, short = 'm', value_name = "YYYY-MM")]
        month: Option<String>,
        /// Filter by category (can be specified multiple times)
        #[arg(long, short = 'c', value_name = "CATEGORY")]
        category: Vec<String>,
        /// Filter by status (can be specified multiple times; defaults to pending)
        #[arg(long, short = 's', value_enum)]
        status: Vec<StatusArg>,
        /// Disable colors
        #[arg(long)]
        no_color: bool,
    },

    /// Bulk-import tasks from a CSV or Excel file
    Import {
        /// File to import (.csv, .xlsx, or .xls)
        file: PathBuf,
    },

    /// Export all tasks to a CSV or Excel file
    Export {
        /// Output format
        #[arg(long, short = 'f', value_enum, default_value = "csv")]
        format: ExportFormat,
        /// Output path (defaults to tasks-{date}.{ext} in the current directory)
        #[arg(long, short = 'o', value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryAction {
    /// List all categories with task counts
    List {
        /// Disable colors
        #[arg(long)]
        no_color: bool,
    },
    /// Add a category
    Add {
        /// Category name (2-50 characters, unique)
        title: String,
        /// Display color as 6-digit hex (e.g. '#3b82f6')
        #[arg(long, value_name = "HEX")]
        color: String,
    },
    /// Edit a category's name and/or color
    Edit {
        /// Category id
        id: String,
        /// New name
        #[arg(long, value_name = "TITLE")]
        title: Option<String>,
        /// New color as 6-digit hex
        #[arg(long, value_name = "HEX")]
        color: Option<String>,
    },
    /// Remove a category (refused while tasks still use it)
    Remove {
        /// Category id
        id: String,
    },
}
