//! Lookup of a patient's most recent visit.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexSet;
use strsim::jaro_winkler;
use tracing::{debug, warn};

use crate::{
    data::{CellValue, Dataset, Record},
    error::{Result, RiskError},
};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];
/// Fixed-width rendering of parsed dates, so parsed and raw keys share one ordering.
const SORT_KEY_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.9f";
const SUGGESTION_THRESHOLD: f64 = 0.8;
const MAX_SUGGESTIONS: usize = 3;

/// Parse a visit-date cell. Only text cells carry dates.
///
/// Offsets are dropped rather than converted, so every layout reads on the same local clock.
pub fn parse_visit_date(cell: &CellValue) -> Option<NaiveDateTime> {
    let raw = cell.as_text()?.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_local());
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Ordering key for a visit date.
///
/// Parsed dates become canonical ISO text; anything else keeps its raw string form and
/// orders lexically against them. Missing dates have no key.
fn visit_sort_key(id: &str, cell: Option<&CellValue>) -> Option<String> {
    let cell = cell?;
    match parse_visit_date(cell) {
        Some(parsed) => Some(parsed.format(SORT_KEY_FORMAT).to_string()),
        None => {
            let raw = cell.key_string();
            warn!(id, raw = raw.as_deref(), "visit date missing or unparseable");
            raw.map(|raw| raw.trim().to_string())
        }
    }
}

/// Newest first; visits without any date after every other.
fn newest_first(a: &Option<String>, b: &Option<String>) -> Ordering {
    b.cmp(a)
}

/// Return the latest visit for `identifier`.
///
/// The query is trimmed; record identifiers are compared as-is in string form. Visits on
/// the same date keep dataset order, so the earlier row wins.
pub fn select_latest<'d>(dataset: &'d Dataset, identifier: &str) -> Result<&'d Record> {
    let query = identifier.trim();
    let mut matches: Vec<(Option<String>, &Record)> = dataset
        .records()
        .iter()
        .filter(|record| record.identifier().as_deref() == Some(query))
        .map(|record| (visit_sort_key(query, record.visit_date()), record))
        .collect();

    if matches.is_empty() {
        return Err(RiskError::NotFound {
            id: query.to_string(),
            suggestions: suggest_identifiers(dataset, query),
        });
    }

    matches.sort_by(|(a, _), (b, _)| newest_first(a, b));
    debug!(id = query, visits = matches.len(), "selected latest visit");
    Ok(matches[0].1)
}

/// Identifiers close to `query`, best match first.
pub fn suggest_identifiers(dataset: &Dataset, query: &str) -> Vec<String> {
    let known: IndexSet<String> = dataset.records().iter().filter_map(Record::identifier).collect();
    let mut scored: Vec<(f64, String)> = known
        .into_iter()
        .map(|candidate| (jaro_winkler(query, &candidate), candidate))
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, candidate)| candidate)
        .collect()
}
