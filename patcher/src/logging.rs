//! Diagnostic tracing for the patcher.
//!
//! Tracing output goes to stderr and is controlled by `RUST_LOG`. The one-line
//! outcome printed by each command goes to stdout and is unaffected by it, so
//! installers can parse it regardless of the log level.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`. Defaults to `warn` if unset.
///
/// # Example
/// ```bash
/// RUST_LOG=manifest_patcher=debug manifest-patcher apply
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
