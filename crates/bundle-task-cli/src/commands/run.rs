//! Run command implementation.
//!
//! Builds the selected targets one after another. Each target is a separate
//! build run with its own bundler; entries inside a target build
//! concurrently.

use std::path::Path;
use std::time::Instant;

use bundle_task::{BundlerCommand, CommandBundler, Error, RunState, TaskContext, run_task};
use tracing::{debug, info};

use crate::cli::RunArgs;
use crate::commands::utils;
use crate::config::{TargetConfig, TaskFile, resolve_task_file};
use crate::error::{CliError, Result};
use crate::ui;

/// Execute the run command.
///
/// # Steps
///
/// 1. Load the task file and layer environment overrides
/// 2. Pick the project directory and the bundler command
/// 3. Build each selected target in order, stopping at the first failure
///
/// # Errors
///
/// Returns task file errors before any build, or the first target failure.
pub async fn execute(args: RunArgs) -> Result<()> {
    let invocation_dir = utils::get_cwd()?;
    let task_path = resolve_task_file(args.config.as_deref(), &invocation_dir);
    let task = TaskFile::load(&task_path)?;

    let cwd = utils::project_dir(args.cwd.as_deref(), &task, &task_path, &invocation_dir);
    let command = bundler_command(args.bundler, &task, &cwd)?;
    let targets = task.select_targets(&args.targets)?;

    ui::info(&format!(
        "Running {} target(s): {}",
        targets.len(),
        ui::format_targets(targets.iter().map(|(name, _)| *name))
    ));
    debug!("Project directory {}", cwd.display());

    let started = Instant::now();
    let mut built = 0;
    for (name, target) in targets {
        built += run_target(&task, name, target, &command, &cwd).await?;
    }

    ui::success(&format!(
        "Built {} bundle(s) in {}",
        built,
        ui::format_duration(started.elapsed())
    ));
    Ok(())
}

/// Command from `--bundler` or the task file, running inside `cwd`.
fn bundler_command(
    cli_command: Option<BundlerCommand>,
    task: &TaskFile,
    cwd: &Path,
) -> Result<BundlerCommand> {
    let mut command = match cli_command {
        Some(command) => command,
        None => task.bundler_command()?,
    };
    command.cwd = Some(match &command.cwd {
        Some(dir) => utils::resolve_path(dir, cwd),
        None => cwd.to_path_buf(),
    });
    Ok(command)
}

async fn run_target(
    task: &TaskFile,
    name: &str,
    target: &TargetConfig,
    command: &BundlerCommand,
    cwd: &Path,
) -> Result<usize> {
    let options = task.target_options(name, target)?;
    let entries = target.files.normalize(cwd);
    if entries.is_empty() {
        ui::warning(&format!("Target '{}' has no files", name));
    }

    info!("Running target {} ({} entries)", name, entries.len());
    let started = Instant::now();
    let mut ctx = TargetContext::new(name);
    let state = run_task(&mut ctx, options, &entries, |builder| {
        CommandBundler::new(command.clone(), builder)
    })
    .await;
    debug!("Target {} finished as {:?}", name, state);

    ctx.finish()?;
    ui::success(&format!(
        "{}: {} bundle(s) in {}",
        name,
        entries.len(),
        ui::format_duration(started.elapsed())
    ));
    Ok(entries.len())
}

/// Task context for one target: records the terminal signal.
#[derive(Debug)]
struct TargetContext {
    name: String,
    state: RunState,
    error: Option<Error>,
}

impl TargetContext {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: RunState::Running,
            error: None,
        }
    }

    fn finish(self) -> Result<()> {
        match (self.state, self.error) {
            (RunState::Completed, _) => Ok(()),
            (_, Some(source)) => Err(CliError::Target {
                target: self.name,
                source,
            }),
            (state, None) => Err(CliError::InvalidArgument(format!(
                "target '{}' ended in state {:?} without a result",
                self.name, state
            ))),
        }
    }
}

impl TaskContext for TargetContext {
    fn done(&mut self) {
        debug_assert_eq!(self.state, RunState::Running);
        self.state = RunState::Completed;
    }

    fn fail_fatal(&mut self, error: Error) {
        debug_assert_eq!(self.state, RunState::Running);
        self.state = RunState::Aborted;
        self.error = Some(error);
    }
}
