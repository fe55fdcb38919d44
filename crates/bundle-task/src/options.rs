//! Task options and the shorthand merge rules.
//!
//! `TaskOptions` is the record a task runner hands to a build run. The
//! `build` block is forwarded to every per-entry build call; the top-level
//! `minify` and `sourceMaps` shorthands only fill in fields the `build` block
//! leaves unset.

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Options forwarded to each `bundle` / `build_static` call.
///
/// Keys other than `minify` and `sourceMaps` are kept verbatim so bundler
/// specific settings pass through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuildOptions {
    /// Minify the output artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minify: Option<bool>,

    /// Emit source maps next to the output artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_maps: Option<bool>,

    /// Any other bundler build setting
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Options for one build run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskOptions {
    /// Configuration passed verbatim to the bundler constructor
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub builder: Map<String, Value>,

    /// Options for every build call
    #[serde(default)]
    pub build: BuildOptions,

    /// Shorthand for `build.minify`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minify: Option<bool>,

    /// Shorthand for `build.sourceMaps`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_maps: Option<bool>,

    /// Produce self-executing static bundles instead of loader bundles
    #[serde(default)]
    pub sfx: bool,

    /// Bundler configuration file loaded before any build runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,

    /// Base URL for module resolution, overriding any value from `configFile`
    #[serde(
        default,
        rename = "baseURL",
        alias = "baseUrl",
        skip_serializing_if = "Option::is_none"
    )]
    pub base_url: Option<String>,
}

/// Which bundler call an entry is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildMethod {
    /// Bundle that still needs the module loader at runtime
    Bundle,
    /// Self-contained artifact (`sfx`)
    Static,
}

impl std::fmt::Display for BuildMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildMethod::Bundle => write!(f, "bundle"),
            BuildMethod::Static => write!(f, "buildStatic"),
        }
    }
}

impl TaskOptions {
    /// Parse options from a JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::InvalidOptions(e.to_string()))
    }

    /// Convert to a JSON value.
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| Error::InvalidOptions(e.to_string()))
    }

    /// The build options handed to the bundler.
    ///
    /// - `build.minify` takes `minify` only when `build.minify` is unset.
    /// - `build.sourceMaps` takes `sourceMaps` only when `build.sourceMaps`
    ///   is unset.
    /// - Every other `build` key is copied as is.
    pub fn resolved_build_options(&self) -> BuildOptions {
        let mut build = self.build.clone();
        if build.minify.is_none() {
            build.minify = self.minify;
        }
        if build.source_maps.is_none() {
            build.source_maps = self.source_maps;
        }
        build
    }

    pub fn build_method(&self) -> BuildMethod {
        if self.sfx {
            BuildMethod::Static
        } else {
            BuildMethod::Bundle
        }
    }

    /// Deep-merge `overrides` over these options.
    ///
    /// Objects merge key by key; scalars and arrays replace. This is how
    /// target-level options combine with task-level options.
    pub fn merged_with(&self, overrides: &Value) -> Result<Self> {
        if overrides.is_null() {
            return Ok(self.clone());
        }
        if !overrides.is_object() {
            return Err(Error::InvalidOptions(format!(
                "options must be an object, got {}",
                overrides
            )));
        }

        let mut base = self.to_value()?;
        merge_values(&mut base, overrides);
        Self::from_value(base)
    }

    /// Check options before a run starts.
    pub fn validate(&self) -> Result<()> {
        if matches!(&self.base_url, Some(url) if url.trim().is_empty()) {
            return Err(Error::InvalidOptions(
                "baseURL must not be empty".to_string(),
            ));
        }

        if matches!(&self.config_file, Some(path) if path.as_os_str().is_empty()) {
            return Err(Error::InvalidOptions(
                "configFile must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn merge_values(target: &mut Value, update: &Value) {
    match (target, update) {
        (Value::Object(target_map), Value::Object(update_map)) => {
            for (key, value) in update_map {
                merge_values(target_map.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (target_slot, _) => {
            *target_slot = update.clone();
        }
    }
}
