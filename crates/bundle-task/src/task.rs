//! Adapter between a build run and a task runner's completion channels.
//!
//! Task runners hand a task two callbacks: one that marks the invocation
//! done and one that fails it fatally. [`run_task`] drives a [`BuildRun`]
//! and fires exactly one of them.

use serde_json::{Map, Value};
use tracing::error;

use crate::bundler::ModuleBundler;
use crate::error::{Error, Result};
use crate::files::FileMapping;
use crate::options::TaskOptions;
use crate::orchestrator::{BuildRun, RunState};

/// The task runner's side of a task invocation.
pub trait TaskContext {
    /// Mark the invocation as finished.
    fn done(&mut self);

    /// Fail the invocation; the runner is expected to halt.
    fn fail_fatal(&mut self, error: Error);
}

/// Task context backed by two closures.
pub struct CallbackContext<D, F> {
    on_done: D,
    on_fatal: F,
}

impl<D, F> CallbackContext<D, F>
where
    D: FnMut(),
    F: FnMut(Error),
{
    pub fn new(on_done: D, on_fatal: F) -> Self {
        Self { on_done, on_fatal }
    }
}

impl<D, F> TaskContext for CallbackContext<D, F>
where
    D: FnMut(),
    F: FnMut(Error),
{
    fn done(&mut self) {
        (self.on_done)();
    }

    fn fail_fatal(&mut self, error: Error) {
        (self.on_fatal)(error);
    }
}

impl<D, F> std::fmt::Debug for CallbackContext<D, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackContext").finish_non_exhaustive()
    }
}

/// Run the build task and report the outcome to `ctx`.
///
/// Returns [`RunState::Completed`] after `done` fired or
/// [`RunState::Aborted`] after `fail_fatal` fired.
pub async fn run_task<C, B, M>(
    ctx: &mut C,
    options: TaskOptions,
    entries: &[FileMapping],
    make_bundler: M,
) -> RunState
where
    C: TaskContext,
    B: ModuleBundler,
    M: FnOnce(&Map<String, Value>) -> Result<B>,
{
    let outcome = match BuildRun::with_factory(options, make_bundler) {
        Ok(run) => run.run(entries).await,
        Err(err) => Err(err),
    };

    report(ctx, outcome.map(|_| ()))
}

/// Deliver a run result to `ctx`.
pub fn report<C: TaskContext>(ctx: &mut C, outcome: Result<()>) -> RunState {
    match outcome {
        Ok(()) => {
            ctx.done();
            RunState::Completed
        }
        Err(err) => {
            error!("{}", err);
            ctx.fail_fatal(err);
            RunState::Aborted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{RecordingBundler, RecordingContext, Signal};
    use serde_json::json;

    #[tokio::test]
    async fn success_fires_done_once() {
        let mut ctx = RecordingContext::default();
        let state = run_task(
            &mut ctx,
            TaskOptions::default(),
            &[FileMapping::new("app/init.js", "dist/demo.js")],
            |_| Ok(RecordingBundler::new()),
        )
        .await;

        assert_eq!(state, RunState::Completed);
        assert_eq!(ctx.signals, vec![Signal::Done]);
    }

    #[tokio::test]
    async fn invalid_entry_fires_fatal_once() {
        let mut ctx = RecordingContext::default();
        let entries = vec![FileMapping {
            src: vec!["a.js".to_string(), "b.js".to_string()],
            orig_src: None,
            dest: "dist/ab.js".into(),
        }];

        let state = run_task(&mut ctx, TaskOptions::default(), &entries, |_| {
            Ok(RecordingBundler::new())
        })
        .await;

        assert_eq!(state, RunState::Aborted);
        assert_eq!(ctx.signals.len(), 1);
        assert!(matches!(&ctx.signals[0], Signal::Fatal(msg) if msg.contains("dist/ab.js")));
    }

    #[tokio::test]
    async fn factory_failure_is_fatal() {
        let mut ctx = RecordingContext::default();
        let state = run_task(
            &mut ctx,
            TaskOptions::from_value(json!({ "sfx": true })).unwrap(),
            &[],
            |_| Err::<RecordingBundler, _>(Error::BundlerUnavailable("no builder".into())),
        )
        .await;

        assert_eq!(state, RunState::Aborted);
        assert_eq!(
            ctx.signals,
            vec![Signal::Fatal("bundler unavailable: no builder".to_string())]
        );
    }

    #[test]
    fn callback_context_forwards_signals() {
        let mut done = 0;
        let mut fatal = Vec::new();
        {
            let mut ctx = CallbackContext::new(|| done += 1, |err: Error| fatal.push(err.code()));
            report(&mut ctx, Ok(()));
            report(&mut ctx, Err(Error::MissingSource("dist/x.js".into())));
        }
        assert_eq!(done, 1);
        assert_eq!(fatal, vec!["MISSING_SOURCE"]);
    }
}
