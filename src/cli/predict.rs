//! CLI entry-point for a single prediction.

use std::{io::Write, path::PathBuf};

use anyhow::{anyhow, Result};
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{
    cli::{describe, DatasetArgs},
    config::Settings,
    model::ModelHandle,
    predict,
};

/// Args for the `predict` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    /// Patient identifier to score.
    #[arg(long)]
    pub id: String,
    /// Model artifact; defaults to `MODEL_PATH`.
    #[arg(long)]
    pub model: Option<PathBuf>,
    /// Contributions to draw; defaults to `EXPLAIN_TOP_K`.
    #[arg(long)]
    pub top_k: Option<usize>,
    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

#[instrument(skip(settings))]
pub fn run(args: Args, settings: Settings) -> Result<()> {
    let models = ModelHandle::new(settings.model_path_or(args.model));
    let dataset = args.dataset.load_prepared()?;
    let report =
        predict::predict_for_id(&dataset, &args.id, &models).map_err(|err| anyhow!(describe(&err)))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        let top_k = args.top_k.unwrap_or(settings.explain_top_k);
        predict::render_report(&report, top_k, &mut out)?;
    }
    Ok(())
}
