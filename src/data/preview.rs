//! Tabular preview of the first rows of an upload.

use polars::prelude::{DataFrame, NamedFrom, PolarsResult, Series};

use crate::data::{CellValue, Dataset};

/// Build a `DataFrame` holding the first `rows` records.
///
/// Columns whose cells are all numeric or missing become float series; any text turns the
/// whole column into strings.
pub fn head_frame(dataset: &Dataset, rows: usize) -> PolarsResult<DataFrame> {
    let head = dataset.head(rows);
    let mut series = Vec::with_capacity(dataset.columns().len());
    for column in dataset.columns() {
        let cells: Vec<&CellValue> = head
            .iter()
            .map(|record| record.get(column).unwrap_or(&CellValue::Missing))
            .collect();
        let numeric = cells
            .iter()
            .all(|cell| matches!(cell, CellValue::Numeric(_) | CellValue::Missing));
        let name = column.as_str().into();
        if numeric {
            let values: Vec<Option<f64>> = cells.iter().map(|cell| cell.as_number()).collect();
            series.push(Series::new(name, values));
        } else {
            let values: Vec<Option<String>> = cells.iter().map(|cell| cell.key_string()).collect();
            series.push(Series::new(name, values));
        }
    }
    DataFrame::new(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;

    #[test]
    fn head_frame_limits_rows_and_keeps_columns() {
        let records = (0..4)
            .map(|idx| {
                Record::from_pairs([
                    ("ID", CellValue::from(format!("P{idx}"))),
                    ("visit_date", CellValue::from("2024-01-01")),
                    ("pulse", CellValue::Numeric(80.0 + idx as f64)),
                ])
            })
            .collect();
        let dataset = Dataset::from_records(records).unwrap();
        let df = head_frame(&dataset, 2).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
        assert!(df.column("pulse").unwrap().f64().is_ok());
        assert!(df.column("ID").unwrap().str().is_ok());
    }
}
