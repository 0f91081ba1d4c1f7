//! Category domain model
//!
//! Named, colored grouping labels assignable to todos. Titles are unique by
//! case-insensitive comparison; colors are 6-digit hex strings.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result};

// Regex pattern is validated at compile time - invalid patterns are programming errors
static COLOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid color regex pattern"));

/// Validate a category title. Returns `None` when valid.
pub fn validate_title(title: &str) -> Option<&'static str> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Some("Category name is required");
    }
    if trimmed.chars().count() < 2 {
        return Some("Category name must be at least 2 characters");
    }
    if trimmed.chars().count() > 50 {
        return Some("Category name must not exceed 50 characters");
    }
    None
}

/// Validate a category color. Returns `None` when valid.
pub fn validate_color(color: &str) -> Option<&'static str> {
    if COLOR_REGEX.is_match(color) {
        None
    } else {
        Some("Invalid color format")
    }
}

/// A named, colored grouping label
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Category {
    pub id: String,
    pub title: String,
    pub color: String,
}

impl Category {
    /// Create a new category with a fresh id
    pub fn new(title: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            color: color.into(),
        }
    }
}

/// The three categories seeded when no category data exists yet
pub fn default_categories() -> Vec<Category> {
    vec![
        Category {
            id: "1".to_string(),
            title: "Work".to_string(),
            color: "#3b82f6".to_string(),
        },
        Category {
            id: "2".to_string(),
            title: "Personal".to_string(),
            color: "#8b5cf6".to_string(),
        },
        Category {
            id: "3".to_string(),
            title: "Urgent".to_string(),
            color: "#ef4444".to_string(),
        },
    ]
}

/// In-memory collection of categories
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(transparent)]
pub struct CategoryList {
    pub categories: Vec<Category>,
}

impl CategoryList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a list seeded with the default categories
    pub fn with_defaults() -> Self {
        Self {
            categories: default_categories(),
        }
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Category> {
        self.categories.iter()
    }

    /// Get a category by exact id
    pub fn get(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Find a category by exact title
    pub fn find_by_title(&self, title: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.title == title)
    }

    /// Snapshot of all titles, for exact-match membership checks
    pub fn title_set(&self) -> HashSet<String> {
        self.categories.iter().map(|c| c.title.clone()).collect()
    }

    fn has_title_ci(&self, title: &str, exclude_id: Option<&str>) -> bool {
        self.categories
            .iter()
            .filter(|c| exclude_id != Some(c.id.as_str()))
            .any(|c| c.title.eq_ignore_ascii_case(title))
    }

    /// Add a new category, validating title, color, and uniqueness
    pub fn add(&mut self, title: &str, color: &str) -> Result<&Category> {
        let title = title.trim();
        if let Some(message) = validate_title(title) {
            return Err(CoreError::validation("title", message));
        }
        if let Some(message) = validate_color(color) {
            return Err(CoreError::validation("color", message));
        }
        if self.has_title_ci(title, None) {
            return Err(CoreError::DuplicateCategory(title.to_string()));
        }
        self.categories.push(Category::new(title, color));
        Ok(self.categories.last().expect("push succeeded"))
    }

    /// Update a category's title and/or color in place
    pub fn update(&mut self, id: &str, title: Option<&str>, color: Option<&str>) -> Result<()> {
        if let Some(title) = title {
            let title = title.trim();
            if let Some(message) = validate_title(title) {
                return Err(CoreError::validation("title", message));
            }
            if self.has_title_ci(title, Some(id)) {
                return Err(CoreError::DuplicateCategory(title.to_string()));
            }
        }
        if let Some(color) = color {
            if let Some(message) = validate_color(color) {
                return Err(CoreError::validation("color", message));
            }
        }

        let category = self
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| CoreError::CategoryNotFound(id.to_string()))?;

        if let Some(title) = title {
            category.title = title.trim().to_string();
        }
        if let Some(color) = color {
            category.color = color.to_string();
        }
        Ok(())
    }

    /// Remove a category by id.
    ///
    /// The in-use guard lives with the caller: storage never enforces the
    /// todo-to-category reference.
    pub fn remove(&mut self, id: &str) -> Result<Category> {
        let pos = self
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CoreError::CategoryNotFound(id.to_string()))?;
        Ok(self.categories.remove(pos))
    }

    /// Remove a category, refusing while any todo still references its title
    pub fn remove_if_unused(&mut self, id: &str, todos: &crate::task::TodoList) -> Result<Category> {
        let category = self
            .get(id)
            .ok_or_else(|| CoreError::CategoryNotFound(id.to_string()))?;
        let count = todos.count_in_category(&category.title);
        if count > 0 {
            return Err(CoreError::CategoryInUse {
                title: category.title.clone(),
                count,
            });
        }
        self.remove(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let list = CategoryList::with_defaults();
        assert_eq!(list.len(), 3);
        assert_eq!(list.find_by_title("Work").unwrap().color, "#3b82f6");
        assert_eq!(list.find_by_title("Personal").unwrap().color, "#8b5cf6");
        assert_eq!(list.find_by_title("Urgent").unwrap().color, "#ef4444");
    }

    #[test]
    fn test_validate_title() {
        assert_eq!(validate_title(""), Some("Category name is required"));
        assert_eq!(
            validate_title("a"),
            Some("Category name must be at least 2 characters")
        );
        assert_eq!(
            validate_title(&"a".repeat(51)),
            Some("Category name must not exceed 50 characters")
        );
        assert_eq!(validate_title("Chores"), None);
    }

    #[test]
    fn test_validate_color() {
        assert_eq!(validate_color("#3b82f6"), None);
        assert_eq!(validate_color("#3B82F6"), None);
        assert_eq!(validate_color("3b82f6"), Some("Invalid color format"));
        assert_eq!(validate_color("#3b82f"), Some("Invalid color format"));
        assert_eq!(validate_color("#3b82fg"), Some("Invalid color format"));
    }

    #[test]
    fn test_add_rejects_duplicate_case_insensitive() {
        let mut list = CategoryList::with_defaults();
        let err = list.add("work", "#112233").unwrap_err();
        assert!(matches!(err, CoreError::DuplicateCategory(_)));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_add_and_remove() {
        let mut list = CategoryList::new();
        let id = list.add("Chores", "#00ff00").unwrap().id.clone();
        assert_eq!(list.len(), 1);

        let removed = list.remove(&id).unwrap();
        assert_eq!(removed.title, "Chores");
        assert!(list.is_empty());
    }

    #[test]
    fn test_remove_if_unused_guards_references() {
        use crate::task::{Todo, TodoList};
        use chrono::NaiveDate;

        let mut categories = CategoryList::with_defaults();
        let mut todos = TodoList::new();
        todos.add(Todo::new(
            "Report",
            "Work",
            NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
        ));

        let work_id = categories.find_by_title("Work").unwrap().id.clone();
        let err = categories.remove_if_unused(&work_id, &todos).unwrap_err();
        assert!(matches!(err, CoreError::CategoryInUse { count: 1, .. }));
        assert!(categories.find_by_title("Work").is_some());

        let urgent_id = categories.find_by_title("Urgent").unwrap().id.clone();
        let removed = categories.remove_if_unused(&urgent_id, &todos).unwrap();
        assert_eq!(removed.title, "Urgent");
        assert!(categories.find_by_title("Urgent").is_none());
    }

    #[test]
    fn test_update_keeps_uniqueness() {
        let mut list = CategoryList::with_defaults();
        let id = list.find_by_title("Work").unwrap().id.clone();

        // Renaming to itself (case change) is allowed
        list.update(&id, Some("WORK"), None).unwrap();
        assert_eq!(list.get(&id).unwrap().title, "WORK");

        // Renaming onto another existing title is not
        let err = list.update(&id, Some("personal"), None).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateCategory(_)));
    }
}
