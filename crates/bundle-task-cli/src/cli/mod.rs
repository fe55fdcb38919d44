//! Command-line interface definition.
//!
//! - `bundle-task run [TARGET]...` - build the selected targets
//! - `bundle-task check` - validate the task file or print its schema

mod commands;
mod validation;

use clap::Parser;

pub use commands::{CheckArgs, Command, RunArgs};
pub use validation::parse_bundler_command;

/// bundle-task - build bundle targets with an external module bundler
#[derive(Parser, Debug)]
#[command(
    name = "bundle-task",
    version,
    about = "Build bundle targets with an external module bundler",
    long_about = "bundle-task reads a task file with named targets, merges task and target\n\
                  options, and hands every file mapping to an external module bundler,\n\
                  one bundle or standalone build per destination."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    ///
    /// Shows base URL and config loading as well as every build dispatch
    /// and completion.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
