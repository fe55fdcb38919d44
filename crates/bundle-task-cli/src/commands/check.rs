//! Check command implementation.
//!
//! Validates the task file and its file mappings without building.

use crate::cli::CheckArgs;
use crate::commands::utils;
use crate::config::{TaskFile, resolve_task_file};
use crate::error::{CliError, Result};
use crate::ui;

/// Execute the check command.
///
/// # Validation Steps
///
/// 1. Load and validate the task file
/// 2. Resolve every target's file mappings against the project directory
/// 3. Warn about sources that reach the bundler only as pass-through strings
///
/// With `--schema` the task file JSON schema is printed to stdout instead.
///
/// # Errors
///
/// Returns errors for an invalid task file or a mapping with several sources.
pub async fn execute(args: CheckArgs) -> Result<()> {
    if args.schema {
        let schema = schemars::schema_for!(TaskFile);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        return Ok(());
    }

    let invocation_dir = utils::get_cwd()?;
    let task_path = resolve_task_file(args.config.as_deref(), &invocation_dir);
    ui::info(&format!("Checking {}...", task_path.display()));

    let task = TaskFile::load(&task_path)?;
    task.validate()?;

    if task.runner.bundler.is_none() {
        ui::warning("No runner.bundler configured; `run` will need --bundler");
    }

    let cwd = utils::project_dir(None, &task, &task_path, &invocation_dir);
    for (name, target) in &task.targets {
        let options = task.target_options(name, target)?;
        let entries = target.files.normalize(&cwd);

        for entry in &entries {
            let source = entry.source_specifier().map_err(|source| CliError::Target {
                target: name.clone(),
                source,
            })?;
            if entry.src.is_empty() {
                ui::warning(&format!(
                    "  {}: no file matches '{}', passing it to the bundler as is",
                    entry.dest.display(),
                    source
                ));
            }
        }

        ui::success(&format!(
            "  {}: {} file mapping(s), {}",
            name,
            entries.len(),
            options.build_method()
        ));
    }

    ui::success("Task file is valid!");
    Ok(())
}
