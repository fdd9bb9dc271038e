//! Tracing subscriber set-up for the binary.

use tracing_subscriber::EnvFilter;

/// Installs the global `fmt` subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence; otherwise the crate logs at `log_level` and
/// dependencies at `warn`.
///
/// # Errors
///
/// Returns an error when a global subscriber is already installed.
pub fn init_tracing(log_level: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("taskboard={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
}
