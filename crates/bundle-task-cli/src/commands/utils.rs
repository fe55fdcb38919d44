//! Path helpers shared by commands.

use std::path::{Path, PathBuf};

use crate::config::TaskFile;
use crate::error::Result;

/// Resolve `path` against `base` unless it is already absolute.
pub fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Current working directory.
pub fn get_cwd() -> Result<PathBuf> {
    Ok(std::env::current_dir()?)
}

/// Project directory for a run.
///
/// `--cwd` (relative to the invocation directory) wins over `runner.cwd`
/// (relative to the task file), which wins over the task file's directory.
pub fn project_dir(
    cli_cwd: Option<&Path>,
    task: &TaskFile,
    task_path: &Path,
    invocation_dir: &Path,
) -> PathBuf {
    let task_dir = resolve_path(&TaskFile::base_dir(task_path), invocation_dir);
    match (cli_cwd, &task.runner.cwd) {
        (Some(cwd), _) => resolve_path(cwd, invocation_dir),
        (None, Some(cwd)) => resolve_path(cwd, &task_dir),
        (None, None) => task_dir,
    }
}
