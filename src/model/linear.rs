//! Logistic risk model persisted as a JSON coefficient artifact.

use std::{fs, path::Path};

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{Result, RiskError},
    model::{
        explain::{Attribution, Contribution},
        Classifier, Explainer,
    },
    pipeline::features::FeatureVector,
};

/// On-disk layout of a trained logistic model.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LinearArtifact {
    pub feature_names: Vec<String>,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    /// Per-feature centring applied before the coefficients. Zero when absent.
    #[serde(default)]
    pub means: Option<Vec<f64>>,
    /// Per-feature scale applied before the coefficients. One when absent.
    #[serde(default)]
    pub scales: Option<Vec<f64>>,
}

/// Logistic regression over standardised features.
#[derive(Debug, Clone)]
pub struct LinearRiskModel {
    feature_names: Vec<String>,
    intercept: f64,
    coefficients: Array1<f64>,
    means: Array1<f64>,
    scales: Array1<f64>,
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl LinearRiskModel {
    /// Validate an artifact's shape.
    pub fn from_artifact(artifact: LinearArtifact) -> std::result::Result<Self, String> {
        let width = artifact.feature_names.len();
        if width == 0 {
            return Err("artifact declares no features".into());
        }
        let check = |label: &str, values: &[f64]| {
            if values.len() != width {
                return Err(format!(
                    "{label} has {} entries for {width} features",
                    values.len()
                ));
            }
            if values.iter().any(|v| !v.is_finite()) {
                return Err(format!("{label} contains non-finite values"));
            }
            Ok(())
        };
        check("coefficients", &artifact.coefficients)?;
        let means = artifact.means.unwrap_or_else(|| vec![0.0; width]);
        check("means", &means)?;
        let scales = artifact.scales.unwrap_or_else(|| vec![1.0; width]);
        check("scales", &scales)?;
        if scales.iter().any(|s| *s == 0.0) {
            return Err("scales must be non-zero".into());
        }
        if !artifact.intercept.is_finite() {
            return Err("intercept is not finite".into());
        }
        Ok(Self {
            feature_names: artifact.feature_names,
            intercept: artifact.intercept,
            coefficients: Array1::from_vec(artifact.coefficients),
            means: Array1::from_vec(means),
            scales: Array1::from_vec(scales),
        })
    }

    /// Read an artifact and check it was trained on exactly `schema`, in order.
    pub fn load<S: AsRef<str>>(path: &Path, schema: &[S]) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|err| RiskError::resource_load(path, err))?;
        let artifact: LinearArtifact =
            serde_json::from_str(&raw).map_err(|err| RiskError::resource_load(path, err))?;
        let expected: Vec<&str> = schema.iter().map(AsRef::as_ref).collect();
        if artifact.feature_names != expected {
            return Err(RiskError::resource_load(
                path,
                "artifact features differ from the expected feature schema",
            ));
        }
        let model = Self::from_artifact(artifact).map_err(|err| RiskError::resource_load(path, err))?;
        debug!(features = model.feature_names.len(), "parsed linear artifact");
        Ok(model)
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Log-odds contribution of every feature.
    fn contributions(&self, features: &FeatureVector) -> Result<Array1<f64>> {
        if features.names() != self.feature_names.as_slice() {
            return Err(RiskError::Inference(format!(
                "model expects {} named features, got {}",
                self.feature_names.len(),
                features.len()
            )));
        }
        let centred = &features.row() - &self.means;
        Ok(centred / &self.scales * &self.coefficients)
    }
}

impl Classifier for LinearRiskModel {
    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2]> {
        let logit = self.intercept + self.contributions(features)?.sum();
        let preterm = sigmoid(logit);
        Ok([1.0 - preterm, preterm])
    }
}

impl Explainer for LinearRiskModel {
    fn explain(&self, features: &FeatureVector) -> Result<Attribution> {
        let contributions = self.contributions(features)?;
        Ok(Attribution {
            base_value: self.intercept,
            contributions: features
                .iter()
                .zip(contributions.iter())
                .map(|((name, value), contribution)| Contribution {
                    feature: name.to_string(),
                    value,
                    contribution: *contribution,
                })
                .collect(),
        })
    }
}
