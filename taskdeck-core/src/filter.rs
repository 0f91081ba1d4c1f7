//! Todo filtering and sorting logic
//!
//! Provides a builder-style API mirroring the list view: one status view at
//! a time, a category multi-select, a text search, and a due-date sort with
//! view-specific default ordering.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::task::{Todo, TodoStatus};

/// Explicit due-date sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueSort {
    Asc,
    Desc,
}

/// Builder for filtering and sorting todos
#[derive(Debug, Clone, Default)]
pub struct TodoFilter {
    /// Which view to show: the pending list (default) or the completed list
    pub status: TodoStatus,
    /// Selected category titles (empty = all)
    pub categories: HashSet<String>,
    /// Search term matched case-insensitively against title and description
    pub search: Option<String>,
    /// Explicit due-date sort; `None` falls back to the view's default order
    pub sort: Option<DueSort>,
}

impl TodoFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the completed view instead of the pending view
    pub fn completed(mut self) -> Self {
        self.status = TodoStatus::Completed;
        self
    }

    /// Set the status view
    pub fn with_status(mut self, status: TodoStatus) -> Self {
        self.status = status;
        self
    }

    /// Restrict to the given category titles
    pub fn with_categories(mut self, categories: HashSet<String>) -> Self {
        self.categories = categories;
        self
    }

    /// Add one category title to the selection
    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.categories.insert(category.into());
        self
    }

    /// Filter by search term
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Set the search term
    pub fn with_search(mut self, term: Option<String>) -> Self {
        self.search = term;
        self
    }

    /// Sort by due date
    pub fn sort_by(mut self, sort: Option<DueSort>) -> Self {
        self.sort = sort;
        self
    }

    /// Check if a todo matches this filter
    pub fn matches(&self, todo: &Todo) -> bool {
        if todo.status != self.status {
            return false;
        }

        if !self.categories.is_empty() && !self.categories.contains(&todo.category) {
            return false;
        }

        if let Some(term) = &self.search {
            let term = term.to_lowercase();
            let in_title = todo.title.to_lowercase().contains(&term);
            let in_description = todo
                .description
                .as_ref()
                .is_some_and(|d| d.to_lowercase().contains(&term));
            if !in_title && !in_description {
                return false;
            }
        }

        true
    }

    /// Apply filter and sort to a collection of todos
    pub fn apply<'a>(&self, todos: impl Iterator<Item = &'a Todo>) -> Vec<&'a Todo> {
        let mut filtered: Vec<&Todo> = todos.filter(|t| self.matches(t)).collect();

        match self.sort {
            Some(DueSort::Asc) => {
                filtered.sort_by_key(|t| self.sort_instant(t));
            }
            Some(DueSort::Desc) => {
                // Ties keep array position.
                filtered.sort_by(|a, b| self.sort_instant(b).cmp(&self.sort_instant(a)));
            }
            None if self.status == TodoStatus::Completed => {
                // Most recently completed first; never-stamped todos sink.
                filtered.sort_by(|a, b| {
                    let a_at = a.completed_at.map(|d| d.timestamp()).unwrap_or(0);
                    let b_at = b.completed_at.map(|d| d.timestamp()).unwrap_or(0);
                    b_at.cmp(&a_at)
                });
            }
            None => {
                // Manual order; unordered todos sink, ties keep array position.
                filtered.sort_by_key(|t| t.order.unwrap_or(u32::MAX));
            }
        }

        filtered
    }

    /// The instant a todo sorts by under an explicit due-date sort.
    ///
    /// The completed view prefers the completion instant, falling back to
    /// the due date at midnight; the pending view always uses the due date.
    fn sort_instant(&self, todo: &Todo) -> DateTime<Utc> {
        let due_midnight = todo.due_date.and_hms_opt(0, 0, 0).expect("midnight exists").and_utc();
        if self.status == TodoStatus::Completed {
            todo.completed_at.unwrap_or(due_midnight)
        } else {
            due_midnight
        }
    }
}
