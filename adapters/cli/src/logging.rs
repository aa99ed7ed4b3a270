//! Diagnostic tracing for the command-line adapter.
//!
//! Library crates emit `tracing` events; this module decides where they go.
//! Session output itself is printed on stdout and never depends on `RUST_LOG`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber.
///
/// Reads `RUST_LOG` and falls back to `warn`, so rejected moves are visible
/// by default. Output goes to stderr in compact format:
///
/// ```bash
/// RUST_LOG=tractor_plough_session=info,tractor_plough_field=debug tractor-plough
/// ```
pub(crate) fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
