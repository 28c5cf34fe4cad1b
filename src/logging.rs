//! tracing subscriber setup

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::stderr_buffer::BufferedStderr;

/// Default filter directive for the given verbosity. `RUST_LOG` wins when set.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "geofire=debug,warn"
    } else {
        "warn"
    }
}

/// Install the global subscriber.
///
/// Output goes to stderr through the stderr buffer, so anything logged while
/// the TUI is up is held back and printed once the terminal is restored.
pub fn init_logging(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let fmt_layer = fmt::layer()
        .with_writer(|| BufferedStderr)
        .with_target(verbose)
        .without_time()
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
