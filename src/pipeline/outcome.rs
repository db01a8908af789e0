//! Binary coding of the recorded birth outcome.

use crate::{
    data::CellValue,
    pipeline::categorize::{CategoryCode, RuleTable},
};

/// Live birth is 1, stillbirth 0.
///
/// The fallback is the text `"0"` rather than an integer, unlike the pregnancy-issue table.
/// Downstream numeric coercion reads it as 0.0, so existing consumers see no difference.
pub const OUTCOME_RULES: RuleTable<'static> = RuleTable::new(
    &[
        ("lahir_hidup", CategoryCode::Int(1)),
        ("lahir_mati", CategoryCode::Int(0)),
    ],
    CategoryCode::Text("0"),
);

/// Code one `status_baby` cell.
pub fn code_outcome(cell: &CellValue) -> CellValue {
    OUTCOME_RULES.categorize(cell.as_text()).into()
}
