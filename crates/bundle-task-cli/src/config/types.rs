use std::path::PathBuf;

use bundle_task::command::scalar;
use bundle_task::{BundlerCommand, FilesSpec, TaskOptions};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Runner settings (`runner` in the task file).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunnerSettings {
    /// External bundler executable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundler: Option<BundlerCommand>,

    /// Project directory; relative paths are resolved against the task file
    #[serde(
        default,
        deserialize_with = "scalar::optional_path",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<PathBuf>")]
    pub cwd: Option<PathBuf>,
}

/// One named target.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TargetConfig {
    /// Options merged over the task-level options
    ///
    /// Kept as raw JSON so only the keys a target sets override the task.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    #[schemars(with = "Option<TaskOptions>")]
    pub options: Value,

    /// Source to destination mappings
    pub files: FilesSpec,
}
