//! CLI-specific error types for taskdeck
//!
//! These errors wrap core errors and add CLI-specific error variants.

use thiserror::Error;

use taskdeck_core::CoreError;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Invalid file type. Please import a CSV or Excel file.")]
    UnsupportedFileType,

    #[error("No tasks found in the file.")]
    NoTasksFound,

    #[error("CSV parsing failed: {message}")]
    Csv {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Excel parsing failed: {message}")]
    Excel {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation errors:\n{0}")]
    ImportValidation(String),

    #[error("Export failed: {message}")]
    Export {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl CliError {
    /// Create a parse error with source
    pub fn parse_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Parse {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an Excel parse error with a message
    pub fn excel(message: impl Into<String>) -> Self {
        Self::Excel {
            message: message.into(),
            source: None,
        }
    }

    /// Create an Excel parse error with source
    pub fn excel_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Excel {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            context: "IO operation failed".to_string(),
            source: err,
        }
    }
}

impl From<confy::ConfyError> for CliError {
    fn from(err: confy::ConfyError) -> Self {
        Self::Config {
            message: "Failed to load configuration".to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse_with_source("JSON parsing failed", err)
    }
}

impl From<csv::Error> for CliError {
    fn from(err: csv::Error) -> Self {
        Self::Csv {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for CliError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Export {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
