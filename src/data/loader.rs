//! Ingestion of uploaded visit tables: delimited text or `.xlsx` workbooks.

use std::{fs::File, io::Read, path::Path};

use calamine::{open_workbook, Data, Range, Reader, Xlsx, XlsxError};
use csv::ReaderBuilder;
use tracing::{debug, info};

use crate::{
    data::{CellValue, Dataset, Record, ID_COLUMN, VISIT_DATE_COLUMN},
    error::{Result, RiskError},
};

/// Columns kept as text regardless of how their cells look.
const TEXT_COLUMNS: &[&str] = &[ID_COLUMN, VISIT_DATE_COLUMN];
/// Layout for workbook date cells; `select::parse_visit_date` reads it back.
const WORKBOOK_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"))
}

/// Load a dataset with a header row. `.xlsx` files are read from their first worksheet;
/// anything else is delimited text split on `delimiter`.
pub fn load_path(path: &Path, delimiter: u8) -> Result<Dataset> {
    let dataset = if is_workbook(path) {
        read_workbook(path)?
    } else {
        let file = File::open(path)
            .map_err(|err| RiskError::Dataset(format!("cannot open {}: {err}", path.display())))?;
        read_dataset(file, delimiter)?
    };
    info!(
        path = %path.display(),
        rows = dataset.len(),
        columns = dataset.columns().len(),
        "loaded dataset"
    );
    Ok(dataset)
}

/// Parse a dataset from any reader.
pub fn read_dataset<R: Read>(reader: R, delimiter: u8) -> Result<Dataset> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    check_headers(&headers)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let record = Record::from_pairs(headers.iter().zip(row.iter()).map(|(header, raw)| {
            let value = if TEXT_COLUMNS.contains(&header.as_str()) {
                CellValue::text(raw)
            } else {
                CellValue::parse(raw)
            };
            (header.clone(), value)
        }));
        records.push(record);
    }
    debug!(rows = records.len(), "parsed delimited rows");

    Dataset::new(headers, records)
}

fn check_headers(headers: &[String]) -> Result<()> {
    for (idx, header) in headers.iter().enumerate() {
        if headers[..idx].contains(header) {
            return Err(RiskError::Dataset(format!("duplicate column `{header}`")));
        }
    }
    Ok(())
}

/// Read the first worksheet of an `.xlsx` workbook.
pub fn read_workbook(path: &Path) -> Result<Dataset> {
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|err: XlsxError| {
        RiskError::Dataset(format!("cannot open workbook {}: {err}", path.display()))
    })?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| RiskError::Dataset(format!("{} has no worksheets", path.display())))?
        .map_err(|err| RiskError::Dataset(format!("cannot read {}: {err}", path.display())))?;
    dataset_from_range(&range)
}

/// Build a dataset from a worksheet range whose first row holds the headers.
pub fn dataset_from_range(range: &Range<Data>) -> Result<Dataset> {
    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| RiskError::Dataset("worksheet is empty".into()))?
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();
    check_headers(&headers)?;

    let records: Vec<Record> = rows
        .filter(|row| !row.iter().all(|cell| matches!(cell, Data::Empty)))
        .map(|row| {
            Record::from_pairs(
                headers
                    .iter()
                    .zip(row)
                    .map(|(header, cell)| (header.clone(), workbook_cell(header, cell))),
            )
        })
        .collect();
    debug!(rows = records.len(), "parsed worksheet rows");

    Dataset::new(headers, records)
}

/// Map one workbook cell the way delimited text is mapped.
pub fn workbook_cell(header: &str, cell: &Data) -> CellValue {
    let textual = TEXT_COLUMNS.contains(&header);
    let number = |value: f64| {
        let cell = CellValue::Numeric(value);
        if textual {
            CellValue::Text(cell.to_string())
        } else {
            cell
        }
    };
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Missing,
        Data::String(raw) | Data::DateTimeIso(raw) | Data::DurationIso(raw) => {
            if textual {
                CellValue::text(raw)
            } else {
                CellValue::parse(raw)
            }
        }
        Data::Float(value) => number(*value),
        Data::Int(value) => number(*value as f64),
        Data::Bool(flag) => number(if *flag { 1.0 } else { 0.0 }),
        Data::DateTime(excel) => excel
            .as_datetime()
            .map(|stamp| CellValue::Text(stamp.format(WORKBOOK_DATETIME_FORMAT).to_string()))
            .unwrap_or(CellValue::Missing),
    }
}
