//! Miette diagnostic conversion for CLI errors.

use crate::error::CliError;
use miette::Report;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Target { target, source } => {
            // Keep the library diagnostic (code and help) and name the target on top.
            Report::new(source).wrap_err(format!("Target '{}' failed", target))
        }
        CliError::Task(e) => Report::new(e),
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        _ => miette::miette!("{}", err),
    }
}
