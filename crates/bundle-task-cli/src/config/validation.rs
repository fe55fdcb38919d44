use bundle_task::{BundlerCommand, TaskOptions};

use super::{TargetConfig, TaskFile};
use crate::error::{ConfigError, Result, ResultExt};
use crate::ui;

impl TaskFile {
    /// Validate the whole task file.
    ///
    /// Every target needs files, and its merged options must validate.
    pub fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(ConfigError::MissingField {
                field: "targets".to_string(),
                hint: "Add at least one target with a files mapping".to_string(),
            }
            .into());
        }

        self.options.validate().for_field("options")?;

        if let Some(bundler) = &self.runner.bundler {
            if bundler.program.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "runner.bundler.program".to_string(),
                    value: format!("{:?}", bundler.program),
                    hint: "Name the bundler executable, e.g. \"systemjs-build\"".to_string(),
                }
                .into());
            }
        }

        for (name, target) in &self.targets {
            self.target_options(name, target)?;
            if target.files.is_empty() {
                return Err(ConfigError::MissingField {
                    field: format!("targets.{}.files", name),
                    hint: "Map at least one destination to a source".to_string(),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Task options with the target's options merged over them.
    pub fn target_options(&self, name: &str, target: &TargetConfig) -> Result<TaskOptions> {
        let field = format!("targets.{}.options", name);
        let options = self.options.merged_with(&target.options).for_field(&field)?;
        options.validate().for_field(field)?;
        Ok(options)
    }

    /// Targets to build: all of them in file order when `names` is empty,
    /// else the named ones in the order given.
    pub fn select_targets(&self, names: &[String]) -> Result<Vec<(&str, &TargetConfig)>> {
        if names.is_empty() {
            return Ok(self
                .targets
                .iter()
                .map(|(name, target)| (name.as_str(), target))
                .collect());
        }

        names
            .iter()
            .map(|name| {
                self.targets
                    .get_key_value(name.as_str())
                    .map(|(name, target)| (name.as_str(), target))
                    .ok_or_else(|| {
                        ConfigError::TargetNotFound {
                            name: name.clone(),
                            available: ui::format_targets(self.targets.keys().map(String::as_str)),
                        }
                        .into()
                    })
            })
            .collect()
    }

    /// The configured bundler command.
    pub fn bundler_command(&self) -> Result<BundlerCommand> {
        self.runner.bundler.clone().ok_or_else(|| {
            ConfigError::MissingField {
                field: "runner.bundler".to_string(),
                hint: "Set runner.bundler.program, BUNDLE_TASK_BUNDLER__PROGRAM or --bundler"
                    .to_string(),
            }
            .into()
        })
    }
}
