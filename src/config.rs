//! Runtime configuration utilities for preterm-risk.

use std::{env, path::PathBuf};

use serde::Deserialize;

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Persisted classifier artifact.
    pub model_path: PathBuf,
    /// Rows shown by `preview`.
    pub preview_rows: usize,
    /// Contributions drawn when a prediction is explained.
    pub explain_top_k: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("./models/preterm_risk_model.json"),
            preview_rows: 5,
            explain_top_k: 10,
        }
    }
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();
        let model_path = env::var("MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.model_path);
        let preview_rows = env::var("PREVIEW_ROWS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.preview_rows);
        let explain_top_k = env::var("EXPLAIN_TOP_K")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.explain_top_k);

        Ok(Self {
            model_path,
            preview_rows,
            explain_top_k,
        })
    }

    /// Model path, preferring a per-command override.
    pub fn model_path_or(&self, override_path: Option<PathBuf>) -> PathBuf {
        override_path.unwrap_or_else(|| self.model_path.clone())
    }
}
