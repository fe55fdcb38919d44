//! Task file model and loading.
//!
//! A task file holds task-level `options`, `runner` settings and named
//! `targets`. Target options are merged over task options; runner settings
//! can be overridden with `BUNDLE_TASK_*` environment variables.

mod loading;
mod types;
mod validation;

use bundle_task::TaskOptions;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use loading::resolve_task_file;
pub use types::*;

/// Default task file name, looked up in the working directory.
pub const DEFAULT_TASK_FILE: &str = "bundle-task.json";

/// Prefix of environment variables layered over `runner`.
///
/// Nested keys are separated by `__`, e.g. `BUNDLE_TASK_BUNDLER__PROGRAM`.
pub const ENV_PREFIX: &str = "BUNDLE_TASK_";

/// Contents of `bundle-task.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TaskFile {
    /// Options shared by every target
    #[serde(default)]
    pub options: TaskOptions,

    /// How to reach the bundler
    #[serde(default)]
    pub runner: RunnerSettings,

    /// Named targets, built in declaration order
    #[serde(default)]
    pub targets: IndexMap<String, TargetConfig>,
}
