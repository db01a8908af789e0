//! CLI entry-point for previewing an uploaded dataset.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{cli::DatasetArgs, config::Settings, data::preview};

/// Args for the `preview` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    /// Rows to show; defaults to `PREVIEW_ROWS`.
    #[arg(long)]
    pub rows: Option<usize>,
}

#[instrument(skip(settings))]
pub fn run(args: Args, settings: Settings) -> Result<()> {
    let dataset = args.dataset.load_raw()?;
    let rows = args.rows.unwrap_or(settings.preview_rows);
    let frame = preview::head_frame(&dataset, rows)?;
    println!("Data preview ({} of {} rows)", frame.height(), dataset.len());
    println!("{frame}");
    Ok(())
}
