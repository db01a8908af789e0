//! Risk assessment for one patient's latest visit.

use std::io::Write;

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    data::Dataset,
    error::{Result, RiskError},
    model::{
        explain::{self, Attribution},
        LoadedModel, ModelHandle,
    },
    pipeline::{
        features::{self, FeatureVector, FEATURE_SCHEMA},
        select,
    },
};

/// Preterm probability at or above which a visit is flagged and explained.
pub const RISK_THRESHOLD: f64 = 0.5;

const PROBABILITY_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLabel {
    PretermRisk,
    TermLikely,
}

impl RiskLabel {
    pub fn from_probability(preterm_probability: f64) -> Self {
        if preterm_probability >= RISK_THRESHOLD {
            Self::PretermRisk
        } else {
            Self::TermLikely
        }
    }
}

/// Outcome of one prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskReport {
    pub id: String,
    pub visit_date: Option<String>,
    pub preterm_probability: f64,
    pub label: RiskLabel,
    /// Present only for flagged visits.
    pub attribution: Option<Attribution>,
}

impl RiskReport {
    /// Operator-facing verdict, e.g. `Preterm Birth Risk: 73.00%`.
    pub fn headline(&self) -> String {
        match self.label {
            RiskLabel::PretermRisk => {
                format!("Preterm Birth Risk: {:.2}%", self.preterm_probability * 100.0)
            }
            RiskLabel::TermLikely => format!(
                "Term Birth Likely: {:.2}%",
                (1.0 - self.preterm_probability) * 100.0
            ),
        }
    }
}

fn check_distribution(proba: [f64; 2]) -> Result<f64> {
    let valid = proba.iter().all(|p| p.is_finite() && (0.0..=1.0).contains(p))
        && (proba[0] + proba[1] - 1.0).abs() <= PROBABILITY_TOLERANCE;
    if valid {
        Ok(proba[1])
    } else {
        Err(RiskError::Inference(format!(
            "model returned an invalid distribution {proba:?}"
        )))
    }
}

/// Score a feature vector, explaining it when the risk reaches the threshold.
pub fn assess(model: &LoadedModel, features: &FeatureVector) -> Result<(f64, Option<Attribution>)> {
    let preterm = check_distribution(model.classifier.predict_proba(features)?)?;
    let attribution = match RiskLabel::from_probability(preterm) {
        RiskLabel::PretermRisk => Some(model.explainer.explain(features)?),
        RiskLabel::TermLikely => None,
    };
    debug!(preterm, explained = attribution.is_some(), "assessed feature vector");
    Ok((preterm, attribution))
}

/// Select the latest visit for `identifier`, assemble its features and score it.
///
/// Fails before touching the model if the model is unavailable, the identifier is
/// unknown, or a feature cannot be coerced.
pub fn predict_for_id(dataset: &Dataset, identifier: &str, models: &ModelHandle) -> Result<RiskReport> {
    let model = models.get()?;
    let record = select::select_latest(dataset, identifier)?;
    let features = features::assemble(record, &FEATURE_SCHEMA)?;
    let (preterm_probability, attribution) = assess(model, &features)?;
    let report = RiskReport {
        id: identifier.trim().to_string(),
        visit_date: record.visit_date().and_then(|cell| cell.key_string()),
        preterm_probability,
        label: RiskLabel::from_probability(preterm_probability),
        attribution,
    };
    info!(id = %report.id, preterm_probability, label = ?report.label, "prediction complete");
    Ok(report)
}

/// Write the report for a terminal, with up to `top_k` contributions.
pub fn render_report<W: Write>(report: &RiskReport, top_k: usize, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "Prediction for ID: {}", report.id)?;
    if let Some(date) = &report.visit_date {
        writeln!(out, "Latest visit: {date}")?;
    }
    writeln!(out, "Prediction: {}", report.headline())?;
    if let Some(attribution) = &report.attribution {
        writeln!(out, "Why this prediction?")?;
        explain::render(attribution, top_k, out)?;
    }
    Ok(())
}
