//! JSON document storage adapter for the todo and category collections
//!
//! Two named documents in the data directory act as the app's two storage
//! slots: the full todo collection and the full category collection, each a
//! JSON array. Every write replaces the whole document - load, mutate in
//! memory, store; last writer wins.
//!
//! A missing categories document seeds the three defaults; a missing todos
//! document yields an empty list. Unreadable documents are logged and fall
//! back the same way, and persist failures are logged and swallowed, so the
//! in-memory state can diverge from disk until the next successful write.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{error, warn};

use taskdeck_core::{CategoryList, TodoList};

use crate::config::Config;

/// Storage adapter over the two JSON documents
pub struct JsonStore {
    todos_path: PathBuf,
    categories_path: PathBuf,
}

impl JsonStore {
    /// Create a store rooted at the given data directory
    pub fn new(
        data_dir: impl Into<PathBuf>,
        todos_filename: &str,
        categories_filename: &str,
    ) -> Self {
        let data_dir = data_dir.into();
        Self {
            todos_path: data_dir.join(todos_filename),
            categories_path: data_dir.join(categories_filename),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.data_directory,
            &config.todos_filename,
            &config.categories_filename,
        )
    }

    pub fn todos_path(&self) -> &Path {
        &self.todos_path
    }

    /// Load the todo collection; absent or unreadable data yields an empty list
    pub fn load_todos(&self) -> TodoList {
        load_slot(&self.todos_path, "todos", TodoList::new)
    }

    /// Persist the todo collection; failures are logged and swallowed
    pub fn save_todos(&self, todos: &TodoList) {
        save_slot(&self.todos_path, "todos", todos);
    }

    /// Load the category collection; absent or unreadable data seeds the defaults
    pub fn load_categories(&self) -> CategoryList {
        load_slot(&self.categories_path, "categories", CategoryList::with_defaults)
    }

    /// Persist the category collection; failures are logged and swallowed
    pub fn save_categories(&self, categories: &CategoryList) {
        save_slot(&self.categories_path, "categories", categories);
    }
}

fn load_slot<T: DeserializeOwned>(path: &Path, slot: &str, default: impl FnOnce() -> T) -> T {
    if !path.exists() {
        return default();
    }

    let parsed = fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|raw| serde_json::from_str(&raw).map_err(|e| e.to_string()));

    match parsed {
        Ok(value) => value,
        Err(message) => {
            warn!(slot, %message, "failed to load slot, falling back to defaults");
            default()
        }
    }
}

fn save_slot<T: Serialize>(path: &Path, slot: &str, value: &T) {
    let result = (|| -> std::result::Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let raw = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
        fs::write(path, raw).map_err(|e| e.to_string())
    })();

    if let Err(message) = result {
        error!(slot, %message, "failed to persist slot; in-memory state not saved");
    }
}
