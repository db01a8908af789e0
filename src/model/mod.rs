//! Pre-trained classifier and explainer contracts plus the process-wide model holder.

pub mod explain;
pub mod linear;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use once_cell::sync::OnceCell;
use tracing::{error, info};

use crate::{
    error::{Result, RiskError},
    model::{explain::Attribution, linear::LinearRiskModel},
    pipeline::features::{FeatureVector, FEATURE_SCHEMA},
};

/// Two-class probability estimator. Index 1 is the preterm class.
pub trait Classifier: Send + Sync {
    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2]>;
}

/// Per-feature contribution estimator for a single prediction.
pub trait Explainer: Send + Sync {
    fn explain(&self, features: &FeatureVector) -> Result<Attribution>;
}

/// A loaded model and the explainer bound to it.
#[derive(Clone)]
pub struct LoadedModel {
    pub classifier: Arc<dyn Classifier>,
    pub explainer: Arc<dyn Explainer>,
}

impl LoadedModel {
    pub fn new(classifier: Arc<dyn Classifier>, explainer: Arc<dyn Explainer>) -> Self {
        Self {
            classifier,
            explainer,
        }
    }

    /// Wrap a model that explains itself.
    pub fn from_shared<M>(model: Arc<M>) -> Self
    where
        M: Classifier + Explainer + 'static,
    {
        Self {
            classifier: model.clone(),
            explainer: model,
        }
    }
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel").finish_non_exhaustive()
    }
}

#[derive(Debug)]
enum ModelState {
    Ready(LoadedModel),
    Unavailable(String),
}

/// Init-once holder for the persisted model.
///
/// The artifact is read on first access and never reloaded. A failed load is remembered
/// and every later access reports it instead of retrying.
#[derive(Debug)]
pub struct ModelHandle {
    path: PathBuf,
    state: OnceCell<ModelState>,
}

impl ModelHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: OnceCell::new(),
        }
    }

    /// A handle already holding `model`, for callers that build models themselves.
    pub fn preloaded(model: LoadedModel) -> Self {
        Self {
            path: PathBuf::from("<in-memory>"),
            state: OnceCell::with_value(ModelState::Ready(model)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The loaded model, loading it on first call.
    pub fn get(&self) -> Result<&LoadedModel> {
        match self.state.get_or_init(|| load_state(&self.path)) {
            ModelState::Ready(model) => Ok(model),
            ModelState::Unavailable(reason) => Err(RiskError::resource_load(&self.path, reason)),
        }
    }

    pub fn is_available(&self) -> bool {
        self.get().is_ok()
    }
}

fn load_state(path: &Path) -> ModelState {
    match LinearRiskModel::load(path, &FEATURE_SCHEMA) {
        Ok(model) => {
            info!(path = %path.display(), "loaded risk model");
            ModelState::Ready(LoadedModel::from_shared(Arc::new(model)))
        }
        Err(err) => {
            error!(path = %path.display(), %err, "risk model unavailable; prediction disabled");
            let reason = match err {
                RiskError::ResourceLoad { reason, .. } => reason,
                other => other.to_string(),
            };
            ModelState::Unavailable(reason)
        }
    }
}
