//! Entry point wiring CLI dispatch to the screening pipeline.

use anyhow::Result;
use preterm_risk::{cli::Cli, config::Settings, logging};
use tracing::{info, instrument};

#[instrument]
fn main() -> Result<()> {
    logging::init_tracing()?;
    let settings = Settings::load()?;
    let cli = Cli::parse();

    info!(?cli, "starting command");
    cli.dispatch(settings)
}
