use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Serialized},
};

use super::{DEFAULT_TASK_FILE, ENV_PREFIX, RunnerSettings, TaskFile};
use crate::error::{ConfigError, Result};

impl TaskFile {
    /// Load a task file and layer environment overrides over `runner`.
    ///
    /// Priority: environment variables > task file > defaults. Command-line
    /// overrides are applied by the commands themselves.
    pub fn load(path: &Path) -> Result<Self> {
        let mut task = Self::read(path)?;
        task.runner = task.runner.with_env()?;
        Ok(task)
    }

    /// Read and parse a task file without environment overrides.
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
            _ => ConfigError::Io(e),
        })?;
        Self::from_json(&content)
    }

    /// Parse task file contents.
    ///
    /// Parsed with serde_json directly so targets keep their declaration
    /// order.
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(ConfigError::InvalidJson)
            .map_err(Into::into)
    }

    /// Directory holding the task file, used as the default project root.
    pub fn base_dir(path: &Path) -> PathBuf {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

impl RunnerSettings {
    /// Layer `BUNDLE_TASK_*` environment variables over these settings.
    pub fn with_env(&self) -> Result<Self> {
        self.layered(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub(super) fn layered(&self, env: Env) -> Result<Self> {
        Figment::from(Serialized::defaults(self))
            .merge(env)
            .extract()
            .map_err(|e| {
                ConfigError::InvalidValue {
                    field: "runner".to_string(),
                    value: e.to_string(),
                    hint: format!(
                        "Check {}* environment variables and the runner section",
                        ENV_PREFIX
                    ),
                }
                .into()
            })
    }
}

/// Task file path: `config` when given, else `bundle-task.json`, relative
/// to `cwd`.
pub fn resolve_task_file(config: Option<&Path>, cwd: &Path) -> PathBuf {
    let path = config.unwrap_or_else(|| Path::new(DEFAULT_TASK_FILE));
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
