//! Terminal status messages.
//!
//! ```no_run
//! use bundle_task_cli::ui;
//!
//! ui::init_colors(false);
//! ui::info("Running target app");
//! ui::success("Built 2 bundles");
//! ```

mod messages;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub use messages::{info, success, warning};

static COLORS: AtomicBool = AtomicBool::new(true);

/// Configure whether status messages are colored.
///
/// `--no-color` and `NO_COLOR` switch colors off; `FORCE_COLOR` switches
/// them on for non-terminal stderr.
pub fn init_colors(no_color: bool) {
    let enabled = !no_color && crate::logger::should_use_colors();
    COLORS.store(enabled, Ordering::Relaxed);
}

pub(crate) fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}

/// Join target names for display.
pub fn format_targets<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let joined = names.into_iter().collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "(none)".to_string()
    } else {
        joined
    }
}

/// Format a duration as `350ms`, `1.25s` or `2m 5s`.
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
