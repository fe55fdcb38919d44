use std::path::PathBuf;

use bundle_task::BundlerCommand;
use clap::{Args, Subcommand};

use super::validation::parse_bundler_command;

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build targets from the task file
    ///
    /// Runs every target in file order unless target names are given.
    /// Stops at the first target that fails.
    Run(RunArgs),

    /// Validate the task file without building
    Check(CheckArgs),
}

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Targets to build, in the order given
    ///
    /// Builds every target in the task file when omitted.
    #[arg(value_name = "TARGET")]
    pub targets: Vec<String>,

    /// Path to the task file
    ///
    /// Defaults to bundle-task.json in the working directory.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Working directory for source resolution and the bundler process
    ///
    /// Defaults to `runner.cwd` from the task file, then to the directory
    /// holding the task file.
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Bundler command line, overriding `runner.bundler`
    ///
    /// The first word is the program, the rest are its arguments.
    #[arg(long, value_name = "CMD", value_parser = parse_bundler_command)]
    pub bundler: Option<BundlerCommand>,
}

/// Arguments for the check command
#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    /// Path to the task file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the task file JSON schema instead of validating
    #[arg(long)]
    pub schema: bool,
}
