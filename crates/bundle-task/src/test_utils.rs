//! Test doubles for the bundler seam and the task runner channels.
//!
//! Available in unit tests and, with the `test-utils` feature, to
//! integration tests and downstream crates.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::bundler::ModuleBundler;
use crate::error::{Error, Result};
use crate::options::{BuildMethod, BuildOptions};
use crate::task::TaskContext;

/// A call received by [`RecordingBundler`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Configure(Value),
    LoadConfig {
        path: PathBuf,
        merge: bool,
        ignore_base_url: bool,
    },
    Build {
        method: BuildMethod,
        source: String,
        dest: PathBuf,
        options: BuildOptions,
    },
}

/// Scripted result of a build call.
#[derive(Debug, Clone)]
pub enum Outcome {
    Succeed,
    SucceedAfter(Duration),
    Fail(String),
    FailAfter(Duration, String),
    Panic,
}

#[derive(Debug, Default)]
struct LogInner {
    calls: Vec<Call>,
    finished: Vec<PathBuf>,
}

/// Shared view of everything a [`RecordingBundler`] saw.
///
/// Clones share the same log, so a test can keep one after the bundler has
/// been moved into a run.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    inner: Arc<Mutex<LogInner>>,
}

impl CallLog {
    /// Every call in the order it arrived.
    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().calls.clone()
    }

    /// Only the build calls.
    pub fn builds(&self) -> Vec<Call> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|call| matches!(call, Call::Build { .. }))
            .cloned()
            .collect()
    }

    /// Destinations whose build resolved successfully, in completion order.
    pub fn finished(&self) -> Vec<PathBuf> {
        self.inner.lock().finished.clone()
    }

    fn record(&self, call: Call) {
        self.inner.lock().calls.push(call);
    }

    fn finish(&self, dest: &Path) {
        self.inner.lock().finished.push(dest.to_path_buf());
    }
}

/// In-memory bundler that records calls and replays scripted outcomes.
///
/// Builds succeed immediately unless an [`Outcome`] was registered for their
/// destination.
#[derive(Debug, Default)]
pub struct RecordingBundler {
    log: CallLog,
    outcomes: FxHashMap<PathBuf, Outcome>,
    config_error: Option<String>,
}

impl RecordingBundler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    pub fn outcome(mut self, dest: impl Into<PathBuf>, outcome: Outcome) -> Self {
        self.outcomes.insert(dest.into(), outcome);
        self
    }

    pub fn fail_config_load(mut self, message: impl Into<String>) -> Self {
        self.config_error = Some(message.into());
        self
    }
}

#[async_trait]
impl ModuleBundler for RecordingBundler {
    fn configure(&mut self, config: Value) -> Result<()> {
        self.log.record(Call::Configure(config));
        Ok(())
    }

    async fn load_config(
        &mut self,
        path: &Path,
        merge: bool,
        ignore_base_url: bool,
    ) -> Result<()> {
        self.log.record(Call::LoadConfig {
            path: path.to_path_buf(),
            merge,
            ignore_base_url,
        });

        match &self.config_error {
            Some(message) => Err(Error::ConfigLoad {
                path: path.to_path_buf(),
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    async fn bundle(&self, source: &str, dest: &Path, options: &BuildOptions) -> Result<()> {
        self.replay(BuildMethod::Bundle, source, dest, options).await
    }

    async fn build_static(
        &self,
        source: &str,
        dest: &Path,
        options: &BuildOptions,
    ) -> Result<()> {
        self.replay(BuildMethod::Static, source, dest, options).await
    }
}

impl RecordingBundler {
    async fn replay(
        &self,
        method: BuildMethod,
        source: &str,
        dest: &Path,
        options: &BuildOptions,
    ) -> Result<()> {
        self.log.record(Call::Build {
            method,
            source: source.to_string(),
            dest: dest.to_path_buf(),
            options: options.clone(),
        });

        let outcome = self.outcomes.get(dest).cloned().unwrap_or(Outcome::Succeed);
        match outcome {
            Outcome::Succeed => {}
            Outcome::SucceedAfter(delay) => tokio::time::sleep(delay).await,
            Outcome::Fail(message) => return Err(Error::build(source, dest, message)),
            Outcome::FailAfter(delay, message) => {
                tokio::time::sleep(delay).await;
                return Err(Error::build(source, dest, message));
            }
            Outcome::Panic => panic!("scripted panic while building {}", dest.display()),
        }

        self.log.finish(dest);
        Ok(())
    }
}

/// A terminal signal received by [`RecordingContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    Done,
    Fatal(String),
}

/// Task context that records every signal it receives.
#[derive(Debug, Default)]
pub struct RecordingContext {
    pub signals: Vec<Signal>,
}

impl TaskContext for RecordingContext {
    fn done(&mut self) {
        self.signals.push(Signal::Done);
    }

    fn fail_fatal(&mut self, error: Error) {
        self.signals.push(Signal::Fatal(error.to_string()));
    }
}
