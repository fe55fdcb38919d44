//! bundle-task CLI - host task runner for bundle targets.
//!
//! Reads a task file (`bundle-task.json`) holding task-level `options`,
//! `runner` settings and named `targets`, then runs each selected target
//! through [`bundle_task`] with a [`bundle_task::CommandBundler`].
//!
//! # Architecture
//!
//! - [`cli`] - argument definitions (clap derive)
//! - [`config`] - task file model, loading and validation
//! - [`commands`] - `run` and `check`
//! - [`error`] - CLI error types and miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - colored status messages
//!
//! # Example task file
//!
//! ```json
//! {
//!   "options": { "configFile": "config.js", "minify": true },
//!   "runner": { "bundler": { "program": "systemjs-build" } },
//!   "targets": {
//!     "app": { "files": { "dist/app.js": "app/init.js" } },
//!     "standalone": {
//!       "options": { "sfx": true, "minify": false },
//!       "files": [{ "src": "app/init.js", "dest": "dist/app.sfx.js" }]
//!     }
//!   }
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, ConfigError, Result};
