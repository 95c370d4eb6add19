// Logging for the installer.
// Every line goes to stderr with a colored level tag so that the output of a
// post-install hook stays readable inside a package manager's own log.
// Debug lines are only printed once `init(true)` has been called.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

// `log_info!` for progress the user should see (selected tag, fetched URL, install path).
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => (eprintln!("{} {}", "[mtest] INFO".bright_green(), format!($($arg)*)));
}

// `log_warn!` for recoverable problems: a failed candidate, an unreachable release API.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => (eprintln!("{} {}", "[mtest] WARN".bright_yellow(), format!($($arg)*)));
}

// `log_error!` for failures that end the run.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => (eprintln!("{} {}", "[mtest] ERROR".bright_red(), format!($($arg)*)));
}

// `log_debug!` is a no-op unless debug mode was switched on.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if $crate::logger::is_debug_enabled() {
           eprintln!("{} {}", "[mtest] DEBUG".dimmed(), format!($($arg)*));
        }
    };
}

static DEBUG_ENABLED: OnceLock<AtomicBool> = OnceLock::new();

/// Sets the global debug flag. Called once from `main` with the value of `--debug` / `MTEST_DEBUG`.
pub fn init(debug: bool) {
    DEBUG_ENABLED
        .get_or_init(|| AtomicBool::new(debug))
        .store(debug, Ordering::Relaxed);

    if debug {
        use colored::Colorize;
        log_debug!("Debug logging enabled");
    }
}

/// Used by `log_debug!`. Defaults to `false` when `init` was never called (e.g. in tests).
pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED
        .get()
        .map(|flag| flag.load(Ordering::Relaxed))
        .unwrap_or(false)
}
