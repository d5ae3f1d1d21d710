//! Diagnostics for the command line calculator.
//!
//! Reads `RUST_LOG` and defaults to `warn`. Engine events are emitted at
//! `debug`, e.g. `RUST_LOG=countonme=debug countonme 2+2`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
