//! Diagnostic logging to stderr

use tracing_subscriber::EnvFilter;

use crate::cli::GlobalOpts;

/// Environment variable that overrides the log filter, e.g. `CRAFTRUV_LOG=craftruv=trace`
pub const LOG_ENV: &str = "CRAFTRUV_LOG";

/// Filter used when `CRAFTRUV_LOG` is not set
pub fn default_filter(global: &GlobalOpts) -> &'static str {
    if global.verbose {
        "debug"
    } else if global.quiet {
        "error"
    } else {
        "warn"
    }
}

/// Install the global subscriber; stdout stays reserved for command output
pub fn init(global: &GlobalOpts) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(global)));

    // A second init (e.g. in tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
