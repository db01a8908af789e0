//! Ordered keyword matching of free-text notes into fixed category codes.

use crate::data::CellValue;

/// Code assigned by a rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryCode {
    Int(i64),
    Text(&'static str),
}

impl From<CategoryCode> for CellValue {
    fn from(code: CategoryCode) -> Self {
        match code {
            CategoryCode::Int(value) => CellValue::Numeric(value as f64),
            CategoryCode::Text(value) => CellValue::Text(value.to_string()),
        }
    }
}

/// Ordered `(pattern, code)` rules plus the code used when nothing matches.
///
/// A pattern is a `|`-separated list of keyword alternatives. Keywords match as plain
/// substrings, so `su` also hits words such as `susu`.
#[derive(Debug, Clone, Copy)]
pub struct RuleTable<'a> {
    rules: &'a [(&'a str, CategoryCode)],
    default: CategoryCode,
}

impl<'a> RuleTable<'a> {
    pub const fn new(rules: &'a [(&'a str, CategoryCode)], default: CategoryCode) -> Self {
        Self { rules, default }
    }

    pub fn rules(&self) -> &'a [(&'a str, CategoryCode)] {
        self.rules
    }

    pub fn default_code(&self) -> CategoryCode {
        self.default
    }

    /// Code of the first rule with a keyword contained in `text`, else the default.
    pub fn categorize(&self, text: Option<&str>) -> CategoryCode {
        let Some(text) = text else {
            return self.default;
        };
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .find(|(pattern, _)| {
                pattern
                    .split('|')
                    .filter(|keyword| !keyword.is_empty())
                    .any(|keyword| lowered.contains(&keyword.to_lowercase()))
            })
            .map(|(_, code)| *code)
            .unwrap_or(self.default)
    }
}

/// Free-function form of [`RuleTable::categorize`].
pub fn categorize(text: Option<&str>, table: &RuleTable<'_>) -> CategoryCode {
    table.categorize(text)
}

/// History of complications in earlier pregnancies. Declaration order matters: `kpd` is
/// listed under both 5 and 8, so it always resolves to 5.
pub const PREGNANCY_ISSUE_RULES: RuleTable<'static> = RuleTable::new(
    &[
        ("abortus|bo|keguguran", CategoryCode::Int(1)),
        ("prematur|preterm|premature", CategoryCode::Int(2)),
        (
            "meninggal|lahir mati|iufd|stillbirth|bayi mati",
            CategoryCode::Int(3),
        ),
        (
            "anemia|hbsag|hepatitis|saraf|asma|kek",
            CategoryCode::Int(4),
        ),
        (
            "partus|sungsang|cpd|plasenta|kpd|post term|posterm|sunsang|su",
            CategoryCode::Int(5),
        ),
        ("gemeli|gameli|susp. gemeli|twin", CategoryCode::Int(6)),
        ("perdarahan|pendarahan|hpp", CategoryCode::Int(7)),
        ("ketuban pecah dini|kpd", CategoryCode::Int(8)),
    ],
    CategoryCode::Int(9),
);

/// Simplified pregnancy-issue code for one cell. Non-text cells count as absent.
pub fn simplify_pregnancy_issue(cell: &CellValue) -> CellValue {
    PREGNANCY_ISSUE_RULES.categorize(cell.as_text()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abortion_history_maps_to_one() {
        assert_eq!(
            PREGNANCY_ISSUE_RULES.categorize(Some("riwayat abortus")),
            CategoryCode::Int(1)
        );
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(
            PREGNANCY_ISSUE_RULES.categorize(Some("Riwayat PERDARAHAN")),
            CategoryCode::Int(7)
        );
    }

    #[test]
    fn shared_keyword_resolves_to_earlier_rule() {
        assert_eq!(
            PREGNANCY_ISSUE_RULES.categorize(Some("kpd")),
            CategoryCode::Int(5)
        );
        assert_eq!(
            PREGNANCY_ISSUE_RULES.categorize(Some("ketuban pecah dini")),
            CategoryCode::Int(8)
        );
    }

    #[test]
    fn short_keyword_matches_inside_words() {
        // "su" is a substring of "susu"; no word boundary is required.
        assert_eq!(
            PREGNANCY_ISSUE_RULES.categorize(Some("alergi susu")),
            CategoryCode::Int(5)
        );
    }

    #[test]
    fn absent_and_unmatched_text_use_default() {
        assert_eq!(PREGNANCY_ISSUE_RULES.categorize(None), CategoryCode::Int(9));
        assert_eq!(
            PREGNANCY_ISSUE_RULES.categorize(Some("tidak ada")),
            CategoryCode::Int(9)
        );
    }

    #[test]
    fn non_text_cells_fall_back_to_default() {
        assert_eq!(
            simplify_pregnancy_issue(&CellValue::Numeric(3.0)),
            CellValue::Numeric(9.0)
        );
        assert_eq!(
            simplify_pregnancy_issue(&CellValue::Missing),
            CellValue::Numeric(9.0)
        );
    }
}
