use std::path::{Path, PathBuf};

use assert_cmd::Command;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("preterm-risk").expect("binary exists");
    cmd.env("RUST_LOG", "error")
        .env("MODEL_PATH", fixture("model.json"))
        .env("PREVIEW_ROWS", "5");
    cmd
}

#[test]
fn cli_help_runs() {
    cli().arg("--help").assert().success();
}

#[test]
fn preview_prints_head() {
    let output = cli()
        .args(["preview", "--data"])
        .arg(fixture("visits.csv"))
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Data preview (4 of 4 rows)"));
}

#[test]
fn predict_explains_flagged_visit() {
    let output = cli()
        .args(["predict", "--id", "P1", "--top-k", "3", "--data"])
        .arg(fixture("visits.csv"))
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Prediction: Preterm Birth Risk: 88.08%"));
    assert!(stdout.contains("Why this prediction?"));
    assert!(stdout.contains("Abortus"));
}

#[test]
fn predict_json_report() {
    let output = cli()
        .args(["predict", "--id", "P3", "--json", "--data"])
        .arg(fixture("visits.csv"))
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["id"], "P3");
    assert_eq!(report["label"], "term_likely");
    assert!(report["attribution"].is_null());
}

#[test]
fn unknown_identifier_fails() {
    let output = cli()
        .args(["predict", "--id", "P404", "--data"])
        .arg(fixture("visits.csv"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found in dataset"));
}

#[test]
fn missing_model_disables_prediction() {
    let output = cli()
        .args(["predict", "--id", "P1", "--data"])
        .arg(fixture("visits.csv"))
        .arg("--model")
        .arg(fixture("missing_model.json"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Prediction is disabled"));
}

#[test]
fn session_reads_identifiers_from_stdin() {
    let output = cli()
        .args(["session", "--data"])
        .arg(fixture("visits.csv"))
        .write_stdin(" P1 \nquit\n")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Preterm Birth Risk: 88.08%"));
}

#[test]
fn preview_accepts_other_delimiters() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("visits.tsv");
    std::fs::write(&path, "ID\tvisit_date\tpulse\nP9\t2024-04-01\t91\n").unwrap();
    let output = cli()
        .args(["preview", "--delimiter", "\t", "--data"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Data preview (1 of 1 rows)"));
}
