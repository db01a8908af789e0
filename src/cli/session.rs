//! Interactive session: one dataset upload, many identifier lookups.

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::{info, instrument, warn};

use crate::{
    cli::{describe, DatasetArgs},
    config::Settings,
    data::{preview, Dataset},
    error::RiskError,
    model::ModelHandle,
    pipeline, predict,
};

const PROMPT: &str = "Enter ID> ";

/// Args for the `session` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    /// Model artifact; defaults to `MODEL_PATH`.
    #[arg(long)]
    pub model: Option<PathBuf>,
    /// Contributions to draw; defaults to `EXPLAIN_TOP_K`.
    #[arg(long)]
    pub top_k: Option<usize>,
}

/// Counters for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub queries: usize,
    pub predictions: usize,
    pub failures: usize,
}

/// One upload as received and after the feature pipeline.
///
/// `:preview` shows the raw copy, matching the `preview` command; lookups use the prepared one.
#[derive(Debug, Clone)]
pub struct SessionData {
    pub raw: Dataset,
    pub prepared: Dataset,
}

impl SessionData {
    pub fn prepare(raw: Dataset) -> Result<Self, RiskError> {
        let mut prepared = raw.clone();
        pipeline::prepare(&mut prepared)?;
        Ok(Self { raw, prepared })
    }
}

/// Options for [`run_loop`].
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub top_k: usize,
    pub preview_rows: usize,
}

#[instrument(skip(settings))]
pub fn run(args: Args, settings: Settings) -> Result<()> {
    let models = ModelHandle::new(settings.model_path_or(args.model));
    let data = SessionData::prepare(args.dataset.load_raw()?)?;
    if let Err(err) = models.get() {
        eprintln!("{}", describe(&err));
    }

    let options = SessionOptions {
        top_k: args.top_k.unwrap_or(settings.explain_top_k),
        preview_rows: settings.preview_rows,
    };
    let stdin = io::stdin();
    let stdout = io::stdout();
    let stats = run_loop(&data, &models, options, stdin.lock(), &mut stdout.lock())?;
    info!(?stats, "session ended");
    Ok(())
}

/// Answer identifiers read line by line from `input` until `quit`, `exit` or EOF.
///
/// Each line is handled start to finish before the next is read. A failed lookup is
/// reported and the loop carries on. `:preview` shows the first rows of the upload.
pub fn run_loop<R: BufRead, W: Write>(
    data: &SessionData,
    models: &ModelHandle,
    options: SessionOptions,
    input: R,
    out: &mut W,
) -> io::Result<SessionStats> {
    let mut stats = SessionStats::default();
    write!(out, "{PROMPT}")?;
    out.flush()?;
    for line in input.lines() {
        let line = line?;
        let query = line.trim();
        match query {
            "" => {}
            "quit" | "exit" => break,
            ":preview" => match preview::head_frame(&data.raw, options.preview_rows) {
                Ok(frame) => writeln!(out, "{frame}")?,
                Err(err) => writeln!(out, "Error: {err}")?,
            },
            _ => {
                stats.queries += 1;
                match predict::predict_for_id(&data.prepared, query, models) {
                    Ok(report) => {
                        stats.predictions += 1;
                        predict::render_report(&report, options.top_k, out)?;
                    }
                    Err(err) => {
                        stats.failures += 1;
                        warn!(id = query, %err, "prediction failed");
                        writeln!(out, "Error: {}", describe(&err))?;
                    }
                }
            }
        }
        write!(out, "{PROMPT}")?;
        out.flush()?;
    }
    writeln!(out)?;
    Ok(stats)
}
