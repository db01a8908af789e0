//! Recoding of free-text negative/positive lab indicators.

use crate::data::{CellValue, Dataset};

/// Indicator literal for a negative result.
pub const NEGATIVE_KEYWORD: &str = "negatif";
/// Indicator literal for a positive result.
pub const POSITIVE_KEYWORD: &str = "positif";

/// Recode one cell.
///
/// Text containing the negative literal becomes 0, otherwise text containing the positive
/// literal becomes 1. The negative check runs first, so text holding both becomes 0.
/// Any other cell is returned untouched.
pub fn normalize(value: CellValue) -> CellValue {
    match value {
        CellValue::Text(text) => {
            let lowered = text.to_lowercase();
            if lowered.contains(NEGATIVE_KEYWORD) {
                CellValue::Numeric(0.0)
            } else if lowered.contains(POSITIVE_KEYWORD) {
                CellValue::Numeric(1.0)
            } else {
                CellValue::Text(text)
            }
        }
        other => other,
    }
}

/// Apply [`normalize`] to every cell in place, returning how many cells were recoded.
pub fn normalize_dataset(dataset: &mut Dataset) -> usize {
    let mut recoded = 0;
    for cell in dataset.cells_mut() {
        if cell.as_text().is_none() {
            continue;
        }
        let value = std::mem::replace(cell, CellValue::Missing);
        *cell = normalize(value);
        if cell.as_text().is_none() {
            recoded += 1;
        }
    }
    recoded
}
