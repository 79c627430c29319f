//! Diagnostic logging for the CLI.
//!
//! `RUST_LOG` wins when set. Otherwise `--verbose` raises the level from
//! `warn` to `info`. Logs go to stderr; stdout carries the report.

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber. Later calls are no-ops.
pub fn init(verbose: bool) {
    let level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
