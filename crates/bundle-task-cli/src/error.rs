//! Error types for the bundle-task CLI.
//!
//! `CliError` is what commands return. Task-file problems are reported as
//! `ConfigError` with a hint; failures of a build run keep the library's
//! [`bundle_task::Error`] so its diagnostic code survives to the report.

use std::path::PathBuf;
use thiserror::Error;

mod diagnostic;

pub use diagnostic::cli_error_to_miette;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Task file problems (missing file, invalid JSON, unknown target, etc.)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A target's build run failed
    #[error("Target '{target}' failed: {source}")]
    Target {
        /// Name of the failed target
        target: String,
        /// The run error
        #[source]
        source: bundle_task::Error,
    },

    /// Errors from the build library outside of a target run
    #[error(transparent)]
    Task(#[from] bundle_task::Error),

    /// Invalid command-line arguments
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Task file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Task file doesn't exist at the expected location
    #[error("Task file not found: {}\n\nHint: Create a bundle-task.json file or specify --config <path>", .0.display())]
    NotFound(PathBuf),

    /// Task file has invalid JSON syntax or shape
    #[error("Invalid JSON in task file: {0}\n\nHint: Check the file against `bundle-task check --schema`")]
    InvalidJson(#[from] serde_json::Error),

    /// A requested target is not defined
    #[error("Target '{name}' not found in task file\n\nHint: Available targets: {available}")]
    TargetNotFound {
        /// Requested target name
        name: String,
        /// Comma-separated list of defined targets
        available: String,
    },

    /// Missing required field
    #[error("Missing required field: {field}\n\nHint: {hint}")]
    MissingField {
        /// Name of the missing field
        field: String,
        /// Helpful hint for providing the field
        hint: String,
    },

    /// Invalid value for a field
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The invalid value
        value: String,
        /// Helpful hint for correct values
        hint: String,
    },

    /// I/O error while reading the task file
    #[error("Failed to read task file: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Attach task-file context to library errors.
pub trait ResultExt<T> {
    /// Report a library error as an invalid value of `field`.
    fn for_field(self, field: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for bundle_task::Result<T> {
    fn for_field(self, field: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            ConfigError::InvalidValue {
                field: field.into(),
                value: e.to_string(),
                hint: "See `bundle-task check --schema` for the accepted options".to_string(),
            }
            .into()
        })
    }
}
