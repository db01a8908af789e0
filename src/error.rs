//! Error kinds surfaced to the operator.

use std::path::PathBuf;

use thiserror::Error;

/// Failures of a single operation. None of them invalidate the loaded dataset.
#[derive(Debug, Error)]
pub enum RiskError {
    /// The persisted model artifact is missing, corrupt or does not fit the schema.
    #[error("failed to load model from {path}: {reason}")]
    ResourceLoad { path: PathBuf, reason: String },

    /// No record carries the requested identifier.
    #[error("ID {id} not found in dataset")]
    NotFound {
        id: String,
        /// Close identifiers, best match first.
        suggestions: Vec<String>,
    },

    /// A schema field is absent or not numeric after pipeline processing.
    #[error("feature `{field}` cannot be used: {reason}")]
    FeatureCoercion { field: String, reason: String },

    /// The uploaded table could not be read.
    #[error("dataset error: {0}")]
    Dataset(String),

    /// The model broke its output contract.
    #[error("inference error: {0}")]
    Inference(String),
}

impl RiskError {
    pub(crate) fn resource_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ResourceLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn coercion(field: &str, reason: impl Into<String>) -> Self {
        Self::FeatureCoercion {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<csv::Error> for RiskError {
    fn from(err: csv::Error) -> Self {
        Self::Dataset(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RiskError>;
