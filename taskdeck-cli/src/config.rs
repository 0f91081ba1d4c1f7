//! Application configuration, loaded via confy from the platform config dir

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the persisted JSON documents
    pub data_directory: String,
    /// Filename of the todos document inside the data directory
    pub todos_filename: String,
    /// Filename of the categories document inside the data directory
    pub categories_filename: String,
    /// Default page size for the list view
    pub items_per_page: usize,
}

impl Default for Config {
    fn default() -> Self {
        let data_directory = ProjectDirs::from("", "", "taskdeck")
            .map(|dirs| dirs.data_dir().to_string_lossy().into_owned())
            .unwrap_or_else(|| ".".to_string());

        Self {
            data_directory,
            todos_filename: "todos.json".to_string(),
            categories_filename: "categories.json".to_string(),
            items_per_page: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.data_directory.is_empty());
        assert_eq!(config.todos_filename, "todos.json");
        assert_eq!(config.categories_filename, "categories.json");
        assert_eq!(config.items_per_page, 10);
    }
}
