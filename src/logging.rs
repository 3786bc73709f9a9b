//! Development-time diagnostics.
//!
//! Tracing output is for people debugging the host, not part of what the
//! host produces: it goes to stderr, is selected through `RUST_LOG`, and
//! stays silent (warnings only) by default.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the subscriber. Call once, before any other work.
///
/// ```bash
/// RUST_LOG=script_prompt=debug script_prompt demo.lua
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
