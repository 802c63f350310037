//! Diagnostic tracing for the terminal host.
//!
//! Run output (events, outcome, diagnostics) goes to stdout and is not
//! affected by `RUST_LOG`. Tracing goes to stderr.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// Reads `RUST_LOG`, defaulting to `warn`. Executor bumps log at `warn`;
/// per-action detail needs `RUST_LOG=maze_eval=debug`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
