//! Command implementations.
//!
//! - [`run`] - build targets
//! - [`check`] - validate the task file

pub mod check;
pub mod run;
pub(crate) mod utils;

pub use check::execute as check_execute;
pub use run::execute as run_execute;
