//! Tabular visit records and the cell values they hold.

pub mod loader;
pub mod preview;

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{Result, RiskError};

/// Patient identifier column.
pub const ID_COLUMN: &str = "ID";
/// Visit date column used to pick the latest record.
pub const VISIT_DATE_COLUMN: &str = "visit_date";

/// A single cell of the uploaded table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Numeric(f64),
    Missing,
}

impl CellValue {
    /// Classify a raw cell: blank is missing, finite numbers are numeric, the rest is text.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(number) if number.is_finite() => Self::Numeric(number),
            _ => Self::Text(raw.to_string()),
        }
    }

    /// Keep a raw cell textual even when it looks numeric.
    pub fn text(raw: &str) -> Self {
        if raw.trim().is_empty() {
            Self::Missing
        } else {
            Self::Text(raw.to_string())
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Numeric(number) => Some(*number),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// String form used for identifier comparison. Missing cells have none.
    pub fn key_string(&self) -> Option<String> {
        match self {
            Self::Missing => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Numeric(number) => write!(f, "{number}"),
            Self::Missing => Ok(()),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Numeric(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Numeric(value as f64)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Missing)
    }
}

/// One clinical visit, keyed by column name in header order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: IndexMap<String, CellValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from `(column, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<CellValue>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields.get(column)
    }

    pub fn get_mut(&mut self, column: &str) -> Option<&mut CellValue> {
        self.fields.get_mut(column)
    }

    /// Insert or overwrite a column value.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        self.fields.insert(column.into(), value.into());
    }

    pub fn contains(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut CellValue> {
        self.fields.values_mut()
    }

    /// Identifier in string form, if the record carries one.
    pub fn identifier(&self) -> Option<String> {
        self.get(ID_COLUMN).and_then(CellValue::key_string)
    }

    pub fn visit_date(&self) -> Option<&CellValue> {
        self.get(VISIT_DATE_COLUMN)
    }
}

/// An uploaded table: an ordered set of records sharing one column set.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    /// Assemble a dataset, checking the identifier and visit-date columns exist and every
    /// record carries exactly the declared columns.
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Result<Self> {
        for required in [ID_COLUMN, VISIT_DATE_COLUMN] {
            if !columns.iter().any(|column| column == required) {
                return Err(RiskError::Dataset(format!(
                    "required column `{required}` is missing"
                )));
            }
        }
        for (row, record) in records.iter().enumerate() {
            let consistent = record.fields.len() == columns.len()
                && columns.iter().all(|column| record.contains(column));
            if !consistent {
                return Err(RiskError::Dataset(format!(
                    "row {row} does not match the header columns"
                )));
            }
        }
        Ok(Self { columns, records })
    }

    /// Take the column set from the first record.
    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        let columns = records
            .first()
            .map(|record| record.columns().map(str::to_string).collect())
            .unwrap_or_default();
        Self::new(columns, records)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn head(&self, rows: usize) -> &[Record] {
        &self.records[..rows.min(self.records.len())]
    }

    /// Add (or overwrite) a column whose value is computed from each record.
    pub fn derive_column<F>(&mut self, column: &str, mut derive: F)
    where
        F: FnMut(&Record) -> CellValue,
    {
        if !self.has_column(column) {
            self.columns.push(column.to_string());
        }
        for record in &mut self.records {
            let value = derive(record);
            record.set(column, value);
        }
    }

    /// Rewrite one existing column in place.
    pub fn update_column<F>(&mut self, column: &str, mut update: F) -> Result<()>
    where
        F: FnMut(&mut CellValue),
    {
        if !self.has_column(column) {
            return Err(RiskError::Dataset(format!(
                "required column `{column}` is missing"
            )));
        }
        for record in &mut self.records {
            if let Some(cell) = record.get_mut(column) {
                update(cell);
            }
        }
        Ok(())
    }

    /// Visit every cell of every record.
    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut CellValue> {
        self.records.iter_mut().flat_map(Record::values_mut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_classifies_cells() {
        assert_eq!(CellValue::parse(""), CellValue::Missing);
        assert_eq!(CellValue::parse("  "), CellValue::Missing);
        assert_eq!(CellValue::parse("12.5"), CellValue::Numeric(12.5));
        assert_eq!(CellValue::parse("NaN"), CellValue::Text("NaN".into()));
        assert_eq!(CellValue::parse("positif"), CellValue::Text("positif".into()));
    }

    #[test]
    fn numeric_identifier_has_plain_string_form() {
        assert_eq!(CellValue::Numeric(123.0).key_string().as_deref(), Some("123"));
        assert_eq!(CellValue::Missing.key_string(), None);
    }

    #[test]
    fn dataset_requires_id_and_visit_date() {
        let record = Record::from_pairs([("ID", "P1")]);
        let err = Dataset::from_records(vec![record]).unwrap_err();
        assert!(matches!(err, RiskError::Dataset(_)));
    }

    #[test]
    fn derive_column_extends_header_once() {
        let record = Record::from_pairs([("ID", "P1"), ("visit_date", "2024-01-01")]);
        let mut dataset = Dataset::from_records(vec![record]).unwrap();
        dataset.derive_column("flag", |_| CellValue::Numeric(1.0));
        dataset.derive_column("flag", |_| CellValue::Numeric(2.0));
        assert_eq!(dataset.columns(), ["ID", "visit_date", "flag"]);
        assert_eq!(
            dataset.records()[0].get("flag"),
            Some(&CellValue::Numeric(2.0))
        );
    }
}
