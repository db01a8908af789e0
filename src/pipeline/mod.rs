//! Record normalisation and feature derivation.

pub mod categorize;
pub mod features;
pub mod normalize;
pub mod outcome;
pub mod select;

use tracing::info;

use crate::{
    data::{CellValue, Dataset},
    error::{Result, RiskError},
};

/// Free-text history of earlier pregnancy complications.
pub const PREGNANCY_ISSUE_COLUMN: &str = "Previous pregnancy other issue status";
/// Derived pregnancy-issue category (1-9).
pub const SIMPLIFIED_ISSUE_COLUMN: &str = "Simplified Pregnancy Issues";
/// Free-text birth outcome.
pub const BABY_STATUS_COLUMN: &str = "status_baby";
/// Derived birth outcome code.
pub const STATUS_BABY_COLUMN: &str = "Status Baby";

/// Counters reported after [`prepare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrepareSummary {
    pub records: usize,
    pub recoded_cells: usize,
}

/// Run the derivation steps over an uploaded dataset in place.
///
/// Order: lower-case the pregnancy-issue text, derive its category, recode lab
/// indicators across every cell, then derive the birth outcome code. Derived columns are
/// overwritten if they already exist.
pub fn prepare(dataset: &mut Dataset) -> Result<PrepareSummary> {
    for column in [PREGNANCY_ISSUE_COLUMN, BABY_STATUS_COLUMN] {
        if !dataset.has_column(column) {
            return Err(RiskError::Dataset(format!(
                "required column `{column}` is missing"
            )));
        }
    }

    dataset.update_column(PREGNANCY_ISSUE_COLUMN, |cell| {
        if let CellValue::Text(text) = cell {
            *text = text.to_lowercase();
        }
    })?;
    dataset.derive_column(SIMPLIFIED_ISSUE_COLUMN, |record| {
        record
            .get(PREGNANCY_ISSUE_COLUMN)
            .map(categorize::simplify_pregnancy_issue)
            .unwrap_or(CellValue::Missing)
    });

    let recoded_cells = normalize::normalize_dataset(dataset);

    dataset.derive_column(STATUS_BABY_COLUMN, |record| {
        record
            .get(BABY_STATUS_COLUMN)
            .map(outcome::code_outcome)
            .unwrap_or(CellValue::Missing)
    });

    let summary = PrepareSummary {
        records: dataset.len(),
        recoded_cells,
    };
    info!(
        records = summary.records,
        recoded_cells = summary.recoded_cells,
        "prepared dataset"
    );
    Ok(summary)
}
