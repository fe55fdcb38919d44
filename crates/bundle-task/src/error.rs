//! Error types for bundle-task runs.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for bundle-task operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a build run.
///
/// Every variant is fatal for the run that produced it. The message of the
/// underlying bundler failure is preserved verbatim.
#[derive(Debug, Error)]
pub enum Error {
    /// The external bundler configuration could not be loaded.
    #[error("failed to load bundler config {}: {message}", .path.display())]
    ConfigLoad { path: PathBuf, message: String },

    /// An entry mapped more than one source specifier to a single destination.
    #[error(
        "{} source specifiers given for {}; only one source per destination is supported",
        .count,
        .dest.display()
    )]
    MultipleSources { dest: PathBuf, count: usize },

    /// An entry had neither a source specifier nor an original source string.
    #[error("no source specifier given for {}", .0.display())]
    MissingSource(PathBuf),

    /// The bundler rejected a build call.
    #[error("{message}")]
    Build {
        source_spec: String,
        dest: PathBuf,
        message: String,
    },

    /// Options failed validation before the run started.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// The bundler could not be constructed or located.
    #[error("bundler unavailable: {0}")]
    BundlerUnavailable(String),

    /// A dispatched build task panicked.
    #[error("build task for {} panicked: {message}", .dest.display())]
    TaskPanicked { dest: PathBuf, message: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build failure reported by the bundler for one entry.
    pub fn build(
        source_spec: impl Into<String>,
        dest: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        Error::Build {
            source_spec: source_spec.into(),
            dest: dest.into(),
            message: message.into(),
        }
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Error::ConfigLoad { .. } => "CONFIG_LOAD",
            Error::MultipleSources { .. } => "MULTIPLE_SOURCES",
            Error::MissingSource(_) => "MISSING_SOURCE",
            Error::Build { .. } => "BUILD_FAILED",
            Error::InvalidOptions(_) => "INVALID_OPTIONS",
            Error::BundlerUnavailable(_) => "BUNDLER_UNAVAILABLE",
            Error::TaskPanicked { .. } => "TASK_PANICKED",
            Error::Io(_) => "IO_ERROR",
        }
    }
}

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(Error::code(self)))
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        let help = match self {
            Error::ConfigLoad { .. } => "Check the configFile path and its syntax",
            Error::MultipleSources { .. } => {
                "Map each destination to exactly one source module"
            }
            Error::MissingSource(_) => "Add a src entry for this destination",
            Error::BundlerUnavailable(_) => {
                "Install the bundler or point --bundler at its executable"
            }
            Error::TaskPanicked { .. } => "This is a bug in bundle-task. Please report it.",
            _ => return None,
        };
        Some(Box::new(help))
    }
}
