//! Command-line interface wiring for preterm-risk.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};

use crate::{
    config::Settings,
    data::{loader, Dataset},
    error::RiskError,
    pipeline,
};

pub mod predict;
pub mod preview;
pub mod session;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Preterm birth risk screening", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Preview(args) => preview::run(args, settings),
            Commands::Predict(args) => predict::run(args, settings),
            Commands::Session(args) => session::run(args, settings),
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the first rows of an uploaded dataset.
    Preview(preview::Args),
    /// Score the latest visit of one patient.
    Predict(predict::Args),
    /// Load a dataset once and score identifiers read from stdin.
    Session(session::Args),
}

/// Dataset upload options shared by every command.
#[derive(Debug, Clone, Args)]
pub struct DatasetArgs {
    /// Visit table with a header row: delimited text, or an `.xlsx` workbook.
    #[arg(long)]
    pub data: PathBuf,
    /// Field delimiter for delimited text.
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,
}

impl DatasetArgs {
    fn delimiter_byte(&self) -> Result<u8> {
        if !self.delimiter.is_ascii() {
            bail!("delimiter must be a single ASCII character");
        }
        Ok(self.delimiter as u8)
    }

    /// Read the upload without running the pipeline.
    pub fn load_raw(&self) -> Result<Dataset> {
        Ok(loader::load_path(&self.data, self.delimiter_byte()?)?)
    }

    /// Read the upload and derive the model features.
    pub fn load_prepared(&self) -> Result<Dataset> {
        let mut dataset = self.load_raw()?;
        pipeline::prepare(&mut dataset)?;
        Ok(dataset)
    }
}

/// Operator-facing message for a failed operation.
pub fn describe(err: &RiskError) -> String {
    match err {
        RiskError::NotFound { suggestions, .. } if !suggestions.is_empty() => {
            format!("{err}. Did you mean: {}?", suggestions.join(", "))
        }
        RiskError::ResourceLoad { .. } => format!("{err}. Prediction is disabled."),
        RiskError::FeatureCoercion { .. } => format!("Prediction Error: {err}"),
        _ => err.to_string(),
    }
}
