//! Todo domain model
//!
//! Pure domain logic for task management with no I/O operations.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result};

/// Completion state of a todo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TodoStatus {
    #[default]
    Pending,
    Completed,
}

impl TodoStatus {
    /// Lenient status parse: any case-insensitive spelling of "completed"
    /// maps to `Completed`, everything else to `Pending`. Never fails.
    pub fn parse_lenient(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("completed") {
            TodoStatus::Completed
        } else {
            TodoStatus::Pending
        }
    }

    pub fn is_completed(self) -> bool {
        self == TodoStatus::Completed
    }
}

impl std::fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TodoStatus::Pending => write!(f, "pending"),
            TodoStatus::Completed => write!(f, "completed"),
        }
    }
}

/// A single todo
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Title of the category this todo belongs to. A soft reference: the
    /// storage layer never enforces that the category exists.
    pub category: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub status: TodoStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Manual position among pending todos. Ties break by array position.
    #[serde(default)]
    pub order: Option<u32>,
}

impl Todo {
    /// Create a new pending todo with a fresh id and creation timestamp
    pub fn new(title: impl Into<String>, category: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: None,
            category: category.into(),
            due_date,
            status: TodoStatus::Pending,
            created_at: Utc::now(),
            completed_at: None,
            order: None,
        }
    }

    /// Builder method to set the description
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Builder method to set the status
    pub fn with_status(mut self, status: TodoStatus) -> Self {
        self.status = status;
        self
    }

    /// Builder method to set the completion timestamp
    pub fn with_completed_at(mut self, completed_at: Option<DateTime<Utc>>) -> Self {
        self.completed_at = completed_at;
        self
    }

    /// Builder method to set the manual order
    pub fn with_order(mut self, order: Option<u32>) -> Self {
        self.order = order;
        self
    }

    /// Toggle completion status, stamping or clearing the completion time
    pub fn toggle(&mut self) {
        match self.status {
            TodoStatus::Pending => {
                self.status = TodoStatus::Completed;
                self.completed_at = Some(Utc::now());
            }
            TodoStatus::Completed => {
                self.status = TodoStatus::Pending;
                self.completed_at = None;
            }
        }
    }

    /// Check if the todo is overdue
    pub fn is_overdue(&self) -> bool {
        self.status == TodoStatus::Pending && self.due_date < Local::now().date_naive()
    }
}

/// In-memory collection of todos
///
/// A plain ordered list, mirroring the persisted JSON array. Every lookup is
/// a linear scan; persistence is handled by storage adapters in consuming
/// crates.
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(transparent)]
pub struct TodoList {
    pub todos: Vec<Todo>,
}

impl TodoList {
    /// Create a new empty list
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Todo> {
        self.todos.iter()
    }

    /// Highest manual order currently assigned
    pub fn max_order(&self) -> u32 {
        self.todos.iter().filter_map(|t| t.order).max().unwrap_or(0)
    }

    /// Append a todo, assigning it the next manual order
    pub fn add(&mut self, mut todo: Todo) -> &Todo {
        todo.order = Some(self.max_order() + 1);
        self.todos.push(todo);
        self.todos.last().expect("push succeeded")
    }

    /// Append a todo as-is, without touching its order
    pub fn push(&mut self, todo: Todo) {
        self.todos.push(todo);
    }

    /// Get a todo by exact id
    pub fn get(&self, id: &str) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Resolve an id or unique id prefix to an index
    fn resolve_index(&self, id: &str) -> Result<usize> {
        if let Some(pos) = self.todos.iter().position(|t| t.id == id) {
            return Ok(pos);
        }
        let mut matches = self.todos.iter().enumerate().filter(|(_, t)| t.id.starts_with(id));
        match (matches.next(), matches.next()) {
            (Some((pos, _)), None) => Ok(pos),
            (Some(_), Some(_)) => Err(CoreError::AmbiguousTask(id.to_string())),
            _ => Err(CoreError::TaskNotFound(id.to_string())),
        }
    }

    /// Resolve an id or unique id prefix to a todo
    pub fn resolve(&self, id: &str) -> Result<&Todo> {
        self.resolve_index(id).map(|pos| &self.todos[pos])
    }

    /// Resolve an id or unique id prefix to a mutable todo
    pub fn resolve_mut(&mut self, id: &str) -> Result<&mut Todo> {
        self.resolve_index(id).map(|pos| &mut self.todos[pos])
    }

    /// Remove a todo by id or unique id prefix
    pub fn remove(&mut self, id: &str) -> Result<Todo> {
        let pos = self.resolve_index(id)?;
        Ok(self.todos.remove(pos))
    }

    /// Toggle a todo's completion status
    pub fn toggle(&mut self, id: &str) -> Result<&Todo> {
        let pos = self.resolve_index(id)?;
        self.todos[pos].toggle();
        Ok(&self.todos[pos])
    }

    /// Move a todo next to another todo, then renumber manual order.
    ///
    /// Splice semantics: the moved todo is removed from the list and
    /// reinserted before or after the target, and every todo's order is
    /// reassigned sequentially from 1 in array position.
    pub fn move_relative(&mut self, id: &str, target_id: &str, before: bool) -> Result<()> {
        let from = self.resolve_index(id)?;
        let moved = self.todos.remove(from);
        let target = match self.resolve_index(target_id) {
            Ok(pos) => pos,
            Err(err) => {
                // Target missing: put the moved todo back untouched.
                self.todos.insert(from, moved);
                return Err(err);
            }
        };
        let to = if before { target } else { target + 1 };
        self.todos.insert(to, moved);
        self.renumber();
        Ok(())
    }

    /// Reassign manual order sequentially from 1 in array position
    pub fn renumber(&mut self) {
        for (index, todo) in self.todos.iter_mut().enumerate() {
            todo.order = Some(index as u32 + 1);
        }
    }

    /// Count todos referencing a category title
    pub fn count_in_category(&self, category: &str) -> usize {
        self.todos.iter().filter(|t| t.category == category).count()
    }

    /// Count completed todos
    pub fn count_completed(&self) -> usize {
        self.todos.iter().filter(|t| t.status.is_completed()).count()
    }

    /// Count overdue todos
    pub fn count_overdue(&self) -> usize {
        self.todos.iter().filter(|t| t.is_overdue()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn due(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_todo_defaults() {
        let todo = Todo::new("Buy milk", "Personal", due(2030, 1, 1));
        assert_eq!(todo.title, "Buy milk");
        assert_eq!(todo.status, TodoStatus::Pending);
        assert!(todo.completed_at.is_none());
        assert!(!todo.id.is_empty());
    }

    #[test]
    fn test_toggle_stamps_completed_at() {
        let mut todo = Todo::new("Test", "Work", due(2030, 1, 1));
        todo.toggle();
        assert_eq!(todo.status, TodoStatus::Completed);
        assert!(todo.completed_at.is_some());

        todo.toggle();
        assert_eq!(todo.status, TodoStatus::Pending);
        assert!(todo.completed_at.is_none());
    }

    #[test]
    fn test_status_parse_lenient() {
        assert_eq!(TodoStatus::parse_lenient("completed"), TodoStatus::Completed);
        assert_eq!(TodoStatus::parse_lenient("  COMPLETED "), TodoStatus::Completed);
        assert_eq!(TodoStatus::parse_lenient("pending"), TodoStatus::Pending);
        assert_eq!(TodoStatus::parse_lenient(""), TodoStatus::Pending);
        assert_eq!(TodoStatus::parse_lenient("garbage"), TodoStatus::Pending);
    }

    #[test]
    fn test_add_assigns_increasing_order() {
        let mut list = TodoList::new();
        list.add(Todo::new("One", "Work", due(2030, 1, 1)));
        list.add(Todo::new("Two", "Work", due(2030, 1, 2)));

        assert_eq!(list.todos[0].order, Some(1));
        assert_eq!(list.todos[1].order, Some(2));
        assert_eq!(list.max_order(), 2);
    }

    #[test]
    fn test_resolve_by_prefix() {
        let mut list = TodoList::new();
        let id = list.add(Todo::new("One", "Work", due(2030, 1, 1))).id.clone();

        let found = list.resolve(&id[..8]).unwrap();
        assert_eq!(found.id, id);
        assert!(matches!(
            list.resolve("no-such-id"),
            Err(CoreError::TaskNotFound(_))
        ));
    }

    #[test]
    fn test_remove() {
        let mut list = TodoList::new();
        let id = list.add(Todo::new("One", "Work", due(2030, 1, 1))).id.clone();
        let removed = list.remove(&id).unwrap();
        assert_eq!(removed.id, id);
        assert!(list.is_empty());
    }

    #[test]
    fn test_move_relative_renumbers() {
        let mut list = TodoList::new();
        let a = list.add(Todo::new("A", "Work", due(2030, 1, 1))).id.clone();
        let _b = list.add(Todo::new("B", "Work", due(2030, 1, 2))).id.clone();
        let c = list.add(Todo::new("C", "Work", due(2030, 1, 3))).id.clone();

        list.move_relative(&c, &a, true).unwrap();

        let titles: Vec<&str> = list.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "A", "B"]);
        let orders: Vec<Option<u32>> = list.iter().map(|t| t.order).collect();
        assert_eq!(orders, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn test_move_relative_missing_target_restores() {
        let mut list = TodoList::new();
        let a = list.add(Todo::new("A", "Work", due(2030, 1, 1))).id.clone();
        list.add(Todo::new("B", "Work", due(2030, 1, 2)));

        assert!(list.move_relative(&a, "missing", true).is_err());
        assert_eq!(list.todos[0].id, a);
    }

    #[test]
    fn test_count_in_category() {
        let mut list = TodoList::new();
        list.add(Todo::new("A", "Work", due(2030, 1, 1)));
        list.add(Todo::new("B", "Personal", due(2030, 1, 2)));
        list.add(Todo::new("C", "Work", due(2030, 1, 3)));

        assert_eq!(list.count_in_category("Work"), 2);
        assert_eq!(list.count_in_category("Urgent"), 0);
    }
}
