//! # bundle-task
//!
//! Build-task adapter that drives an external module bundler.
//!
//! A task hands over [`TaskOptions`] and a list of [`FileMapping`]s. The
//! [`BuildRun`] configures one shared bundler (base URL, config file), then
//! dispatches one `bundle` or `build_static` call per mapping, completes when
//! every call succeeded and aborts on the first failure.
//!
//! The bundler itself sits behind the [`ModuleBundler`] trait.
//! [`CommandBundler`] forwards calls to an external executable; tests use the
//! recording doubles in `test_utils`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bundle_task::{BundlerCommand, CommandBundler, FileMapping, TaskOptions};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = TaskOptions {
//!     minify: Some(true),
//!     config_file: Some("config.js".into()),
//!     ..Default::default()
//! };
//! let entries = vec![FileMapping::new("app/init.js", "dist/app.js")];
//!
//! let summary = bundle_task::run(options, &entries, |builder| {
//!     CommandBundler::new(BundlerCommand::new("systemjs-build"), builder)
//! })
//! .await?;
//! println!("built {} bundles", summary.built);
//! # Ok(()) }
//! ```

pub mod bundler;
pub mod command;
pub mod error;
pub mod files;
pub mod options;
pub mod orchestrator;
pub mod task;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use bundler::ModuleBundler;
pub use command::{BundlerCommand, CommandBundler};
pub use error::{Error, Result};
pub use files::{FileMapping, FilesEntry, FilesSpec, Sources};
pub use options::{BuildMethod, BuildOptions, TaskOptions};
pub use orchestrator::{BuildRun, RunState, RunSummary, run};
pub use task::{CallbackContext, TaskContext, report, run_task};
