use preterm_risk::{
    data::{CellValue, Dataset, Record},
    pipeline::select::select_latest,
    RiskError,
};

fn visit(id: impl Into<CellValue>, date: &str, marker: f64) -> Record {
    Record::from_pairs([
        ("ID", id.into()),
        ("visit_date", CellValue::text(date)),
        ("marker", CellValue::Numeric(marker)),
    ])
}

fn marker(record: &Record) -> Option<f64> {
    record.get("marker").and_then(CellValue::as_number)
}

#[test]
fn unknown_identifier_is_not_found() {
    let dataset = Dataset::from_records(vec![visit("P1", "2024-01-01", 1.0)]).unwrap();
    let err = select_latest(&dataset, "Q9").unwrap_err();
    assert!(matches!(err, RiskError::NotFound { ref id, .. } if id == "Q9"));
}

#[test]
fn single_match_is_returned_even_without_a_date() {
    let dataset = Dataset::from_records(vec![
        visit("P1", "", 1.0),
        visit("P2", "2024-01-01", 2.0),
    ])
    .unwrap();
    assert_eq!(marker(select_latest(&dataset, "P1").unwrap()), Some(1.0));
}

#[test]
fn latest_date_wins_regardless_of_row_order() {
    let dataset = Dataset::from_records(vec![
        visit("P1", "2024-02-01", 1.0),
        visit("P1", "05/03/2024", 2.0),
        visit("P1", "2023-12-31", 3.0),
        visit("P1", "", 4.0),
    ])
    .unwrap();
    assert_eq!(marker(select_latest(&dataset, "P1").unwrap()), Some(2.0));
}

#[test]
fn slash_and_fractional_second_dates_pick_the_newer_visit() {
    for (older, newer) in [
        ("2024/01/10", "2024/03/05"),
        ("2024-01-10 08:00:00.000", "2024-03-05 08:00:00.000"),
    ] {
        let dataset =
            Dataset::from_records(vec![visit("P1", older, 1.0), visit("P1", newer, 2.0)]).unwrap();
        assert_eq!(marker(select_latest(&dataset, "P1").unwrap()), Some(2.0), "{newer}");
    }
}

#[test]
fn unparseable_dates_fall_back_to_raw_text_order() {
    let dataset = Dataset::from_records(vec![
        visit("P1", "2024.01.10", 1.0),
        visit("P1", "2024.03.05", 2.0),
        visit("P1", "", 3.0),
    ])
    .unwrap();
    assert_eq!(marker(select_latest(&dataset, "P1").unwrap()), Some(2.0));
}

#[test]
fn offset_dates_compare_on_the_local_clock() {
    let dataset = Dataset::from_records(vec![
        visit("P1", "2024-03-09T10:00:00+07:00", 1.0),
        visit("P1", "2024-03-09 05:00:00", 2.0),
    ])
    .unwrap();
    assert_eq!(marker(select_latest(&dataset, "P1").unwrap()), Some(1.0));
}

#[test]
fn same_day_visits_keep_dataset_order() {
    let dataset = Dataset::from_records(vec![
        visit("P1", "2024-01-01", 1.0),
        visit("P1", "2024-03-01", 2.0),
        visit("P1", "2024-03-01", 3.0),
    ])
    .unwrap();
    assert_eq!(marker(select_latest(&dataset, "P1").unwrap()), Some(2.0));
}

#[test]
fn query_whitespace_is_trimmed() {
    let dataset = Dataset::from_records(vec![visit("P1", "2024-01-01", 1.0)]).unwrap();
    assert!(select_latest(&dataset, " P1 ").is_ok());
    assert!(select_latest(&dataset, "\tP1\n").is_ok());
}

#[test]
fn record_identifiers_are_not_trimmed() {
    let dataset = Dataset::from_records(vec![visit(" P1", "2024-01-01", 1.0)]).unwrap();
    assert!(select_latest(&dataset, "P1").is_err());
}

#[test]
fn numeric_identifiers_compare_by_string_form() {
    let dataset = Dataset::from_records(vec![visit(123.0, "2024-01-01", 1.0)]).unwrap();
    assert!(select_latest(&dataset, "123").is_ok());
}

#[test]
fn not_found_suggests_close_identifiers() {
    let dataset = Dataset::from_records(vec![
        visit("P1", "2024-01-01", 1.0),
        visit("ZZZ-900", "2024-01-01", 2.0),
    ])
    .unwrap();
    match select_latest(&dataset, "P11") {
        Err(RiskError::NotFound { suggestions, .. }) => assert_eq!(suggestions, ["P1"]),
        other => panic!("unexpected result: {other:?}"),
    }
}
