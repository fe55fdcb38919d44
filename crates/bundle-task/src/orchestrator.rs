//! Build orchestration: one bundler call per file mapping.
//!
//! A run configures the bundler once, then dispatches every entry without
//! waiting for the previous one. It completes after every entry succeeded
//! and aborts on the first failure, whichever entry it comes from.

use std::path::PathBuf;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde_json::{Map, Value, json};
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::bundler::ModuleBundler;
use crate::error::{Error, Result};
use crate::files::FileMapping;
use crate::options::{BuildMethod, TaskOptions};

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Entries that reported success
    pub built: usize,
    pub method: BuildMethod,
}

/// State of one build run.
///
/// Both terminal states are final; there is no retry or resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Completed,
    Aborted,
}

/// A single invocation of the build task.
#[derive(Debug)]
pub struct BuildRun<B> {
    options: TaskOptions,
    bundler: B,
}

impl<B: ModuleBundler> BuildRun<B> {
    pub fn new(options: TaskOptions, bundler: B) -> Self {
        Self { options, bundler }
    }

    /// Construct the bundler from `options.builder`, then create the run.
    pub fn with_factory<F>(options: TaskOptions, make_bundler: F) -> Result<Self>
    where
        F: FnOnce(&Map<String, Value>) -> Result<B>,
    {
        let bundler = make_bundler(&options.builder)?;
        Ok(Self::new(options, bundler))
    }

    pub fn options(&self) -> &TaskOptions {
        &self.options
    }

    /// Apply the base URL and load the config file, in that order.
    async fn prepare(&mut self) -> Result<()> {
        if let Some(base_url) = &self.options.base_url {
            debug!("Setting baseURL to {}", base_url);
            self.bundler.configure(json!({ "baseURL": base_url }))?;
        }

        if let Some(config_file) = &self.options.config_file {
            let ignore_base_url = self.options.base_url.is_some();
            debug!(
                "Loading config file {} (ignore baseURL: {})",
                config_file.display(),
                ignore_base_url
            );
            self.bundler
                .load_config(config_file, false, ignore_base_url)
                .await?;
            debug!("Loaded config file {}", config_file.display());
        }

        Ok(())
    }

    /// Run every entry and wait for all of them.
    ///
    /// Returns the first error reported by the config load or by any entry.
    /// Entries still in flight at that point are detached, not cancelled.
    pub async fn run(mut self, entries: &[FileMapping]) -> Result<RunSummary> {
        self.options.validate()?;
        self.prepare().await?;

        let plan = entries
            .iter()
            .map(|entry| Ok((entry.source_specifier()?.to_string(), entry.dest.clone())))
            .collect::<Result<Vec<(String, PathBuf)>>>()?;

        let method = self.options.build_method();
        let build_options = Arc::new(self.options.resolved_build_options());
        let bundler = Arc::new(self.bundler);

        let mut pending = JoinSet::new();
        let mut dests = FxHashMap::default();
        for (source, dest) in plan {
            debug!("{} {} -> {}", method, source, dest.display());

            let bundler = Arc::clone(&bundler);
            let build_options = Arc::clone(&build_options);
            let task_dest = dest.clone();
            let handle = pending.spawn(async move {
                bundler
                    .build(method, &source, &task_dest, &build_options)
                    .await
                    .map(|()| task_dest)
            });
            dests.insert(handle.id(), dest);
        }

        let total = dests.len();
        let mut remaining = total;
        while remaining > 0 {
            let Some(joined) = pending.join_next().await else {
                break;
            };

            match joined {
                Ok(Ok(dest)) => {
                    remaining -= 1;
                    debug!("Built {} ({} remaining)", dest.display(), remaining);
                }
                Ok(Err(err)) => {
                    pending.detach_all();
                    return Err(err);
                }
                Err(join_err) => {
                    pending.detach_all();
                    let dest = dests.remove(&join_err.id()).unwrap_or_default();
                    return Err(Error::TaskPanicked {
                        dest,
                        message: join_err.to_string(),
                    });
                }
            }
        }

        info!("{} of {} entries built with {}", total - remaining, total, method);
        Ok(RunSummary {
            built: total - remaining,
            method,
        })
    }
}

/// Build `entries` with a bundler constructed from `options.builder`.
pub async fn run<B, F>(
    options: TaskOptions,
    entries: &[FileMapping],
    make_bundler: F,
) -> Result<RunSummary>
where
    B: ModuleBundler,
    F: FnOnce(&Map<String, Value>) -> Result<B>,
{
    BuildRun::with_factory(options, make_bundler)?
        .run(entries)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{Call, Outcome, RecordingBundler};
    use serde_json::json;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    fn options(value: Value) -> TaskOptions {
        TaskOptions::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn base_url_is_applied_before_config_load() {
        let bundler = RecordingBundler::new();
        let log = bundler.log();

        let run = BuildRun::new(
            options(json!({ "baseURL": "./app", "configFile": "config.js" })),
            bundler,
        );
        run.run(&[]).await.unwrap();

        assert_eq!(
            log.calls(),
            vec![
                Call::Configure(json!({ "baseURL": "./app" })),
                Call::LoadConfig {
                    path: PathBuf::from("config.js"),
                    merge: false,
                    ignore_base_url: true,
                },
            ]
        );
    }

    #[tokio::test]
    async fn config_load_without_base_url_keeps_file_base_url() {
        let bundler = RecordingBundler::new();
        let log = bundler.log();

        BuildRun::new(options(json!({ "configFile": "config.js" })), bundler)
            .run(&[])
            .await
            .unwrap();

        assert_eq!(
            log.calls(),
            vec![Call::LoadConfig {
                path: PathBuf::from("config.js"),
                merge: false,
                ignore_base_url: false,
            }]
        );
    }

    #[tokio::test]
    async fn failed_config_load_processes_no_entry() {
        let bundler = RecordingBundler::new().fail_config_load("config.js not found");
        let log = bundler.log();

        let err = BuildRun::new(options(json!({ "configFile": "config.js" })), bundler)
            .run(&[FileMapping::new("app/init.js", "dist/demo.js")])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ConfigLoad { .. }));
        assert!(log.builds().is_empty());
    }

    #[tokio::test]
    async fn invalid_entry_dispatches_nothing() {
        let bundler = RecordingBundler::new();
        let log = bundler.log();

        let entries = vec![
            FileMapping::new("app/a.js", "dist/a.js"),
            FileMapping {
                src: vec!["app/b.js".to_string(), "app/c.js".to_string()],
                orig_src: None,
                dest: PathBuf::from("dist/bc.js"),
            },
        ];

        let err = BuildRun::new(TaskOptions::default(), bundler)
            .run(&entries)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::MultipleSources { count: 2, .. }));
        assert!(log.builds().is_empty());
    }

    #[tokio::test]
    async fn invalid_options_fail_before_configuration() {
        let bundler = RecordingBundler::new();
        let log = bundler.log();

        let err = BuildRun::new(options(json!({ "baseURL": "" })), bundler)
            .run(&[])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidOptions(_)));
        assert!(log.calls().is_empty());
    }

    #[tokio::test]
    async fn entries_are_dispatched_without_waiting() {
        let bundler = RecordingBundler::new()
            .outcome("dist/slow.js", Outcome::SucceedAfter(Duration::from_millis(100)))
            .outcome("dist/fast.js", Outcome::SucceedAfter(Duration::from_millis(5)));
        let log = bundler.log();

        let summary = BuildRun::new(TaskOptions::default(), bundler)
            .run(&[
                FileMapping::new("app/slow.js", "dist/slow.js"),
                FileMapping::new("app/fast.js", "dist/fast.js"),
            ])
            .await
            .unwrap();

        assert_eq!(summary.built, 2);
        assert_eq!(
            log.finished(),
            vec![PathBuf::from("dist/fast.js"), PathBuf::from("dist/slow.js")]
        );
    }

    #[tokio::test]
    async fn zero_entries_complete_immediately() {
        let summary = BuildRun::new(TaskOptions::default(), RecordingBundler::new())
            .run(&[])
            .await
            .unwrap();
        assert_eq!(
            summary,
            RunSummary {
                built: 0,
                method: BuildMethod::Bundle
            }
        );
    }

    #[tokio::test]
    async fn factory_receives_builder_config() {
        let summary = run(
            options(json!({ "builder": { "defaultJSExtensions": true } })),
            &[FileMapping::new("app/init.js", "dist/demo.js")],
            |builder| {
                assert_eq!(builder["defaultJSExtensions"], json!(true));
                Ok(RecordingBundler::new())
            },
        )
        .await
        .unwrap();
        assert_eq!(summary.built, 1);
    }

    #[tokio::test]
    async fn factory_error_aborts_run() {
        let err = run(TaskOptions::default(), &[], |_| {
            Err::<RecordingBundler, _>(Error::BundlerUnavailable("missing".to_string()))
        })
        .await
        .unwrap_err();
        assert!(matches!(err, Error::BundlerUnavailable(_)));
    }

    #[tokio::test]
    async fn panicking_build_is_reported() {
        let bundler = RecordingBundler::new().outcome("dist/boom.js", Outcome::Panic);

        let err = BuildRun::new(TaskOptions::default(), bundler)
            .run(&[FileMapping::new("app/boom.js", "dist/boom.js")])
            .await
            .unwrap_err();

        match err {
            Error::TaskPanicked { dest, .. } => assert_eq!(dest, Path::new("dist/boom.js")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
