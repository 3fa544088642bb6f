//! Structured logging helpers

use std::time::Duration;

use bookline_domain::BooklineError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Initialise the global tracing subscriber.
///
/// Respects `RUST_LOG`; defaults to `info` for our crates.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bookline=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Log the outcome of a command execution with structured fields.
///
/// Keeps the webhook handlers concise and the log shape consistent. Callers
/// must avoid forwarding sensitive values in `command` or `tool`.
#[inline]
pub fn log_command_execution(command: &str, tool: &str, elapsed: Duration, success: bool) {
    let duration_ms = elapsed.as_millis() as u64;

    if success {
        info!(command, tool, duration_ms, "command_execution_success");
    } else {
        warn!(command, tool, duration_ms, "command_execution_failure");
    }
}

/// Convert a `BooklineError` into a stable label suitable for metrics/logging.
#[inline]
pub fn error_label(error: &BooklineError) -> &'static str {
    match error {
        BooklineError::Database(_) => "database",
        BooklineError::Config(_) => "config",
        BooklineError::Network(_) => "network",
        BooklineError::Auth(_) => "auth",
        BooklineError::NotFound(_) => "not_found",
        BooklineError::InvalidInput(_) => "invalid_input",
        BooklineError::Internal(_) => "internal",
    }
}
