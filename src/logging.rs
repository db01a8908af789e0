//! Diagnostics for screening runs, kept on stderr so reports and previews own stdout.

use std::io::{self, IsTerminal};

use anyhow::Result;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Used when `RUST_LOG` is unset: this crate at `info`, chatty dependencies at `warn`.
const DEFAULT_FILTER: &str = "warn,preterm_risk=info";

/// Route `tracing` events for lookups, model loading and sessions to stderr.
///
/// Safe to call more than once; later calls keep the first subscriber.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(DEFAULT_FILTER)?,
    };
    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_thread_names(false)
        .with_filter(filter);

    tracing_subscriber::registry().with(stderr_layer).try_init()?;
    debug!("screening diagnostics enabled");
    Ok(())
}
