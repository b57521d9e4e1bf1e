//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const REGISTRY: &str = r#"{
    "Europe": {"countries": [
        {"name": "France", "chinese": "法国", "code": "FR", "url": "https://example.org/fr", "lat": 46.2, "lng": 2.2},
        {"name": "Germany", "chinese": "德国", "code": "DE", "url": "https://example.org/de", "lat": 51.2, "lng": 10.4}
    ]},
    "Asia": {"countries": [
        {"name": "Japan", "chinese": "日本", "code": "JP", "url": "https://example.org/jp", "lat": 36.2, "lng": 138.3}
    ]}
}"#;

const FACTS: &str = r#"[
    {"name": "France", "capital": "Paris", "area": "643,801", "population": "68.5 million"},
    {"name": "Japan", "capital": "Tokyo", "area": 377915, "population": 123200000}
]"#;

fn atlas() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("country-atlas"))
}

fn write_fixtures(root: &Path) {
    fs::create_dir_all(root.join("data")).expect("data dir");
    fs::write(root.join("countylink.json"), REGISTRY).expect("registry");
    fs::write(root.join("data/country_data.json"), FACTS).expect("facts");
    // Use a year inside the default 3-year lookback window.
    let year = chrono::Datelike::year(&chrono::Utc::now()) - 1;
    fs::write(
        root.join("data").join(format!("worldbank_indicators_data_{year}.csv")),
        "country,GDP (current US$),GDP growth (annual %)\nFrance,3.1e12,0.9\nJapan,4.2e12,\n",
    )
    .expect("table");
}

fn run_args(root: &Path) -> Vec<String> {
    vec![
        "run".to_string(),
        "--registry".to_string(),
        root.join("countylink.json").display().to_string(),
        "--facts".to_string(),
        root.join("data/country_data.json").display().to_string(),
        "--data-dir".to_string(),
        root.join("data").display().to_string(),
        "--output-dir".to_string(),
        root.join("out").display().to_string(),
        "--no-timestamp".to_string(),
    ]
}

#[test]
fn test_cli_version() {
    let mut cmd = atlas();
    cmd.arg("--version");
    cmd.assert().success().stdout(predicate::str::contains("country-atlas"));
}

#[test]
fn test_cli_help() {
    let mut cmd = atlas();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("regional dataset"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("fetch"))
        .stdout(predicate::str::contains("info"));
}

#[test]
fn test_run_fails_without_registry() {
    let tmp = TempDir::new().expect("tmp");
    let mut cmd = atlas();
    cmd.current_dir(tmp.path());
    cmd.args(run_args(tmp.path()));
    cmd.assert().failure().stderr(predicate::str::contains("Failed reading registry file"));
}

#[test]
fn test_run_writes_merged_outputs() {
    let tmp = TempDir::new().expect("tmp");
    write_fixtures(tmp.path());

    let mut cmd = atlas();
    cmd.current_dir(tmp.path());
    cmd.args(run_args(tmp.path()));
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Merged 3 countries across 2 regions"))
        .stdout(predicate::str::contains("Facts matched: 2"));

    let nested: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(tmp.path().join("out/merged_country_data.json")).expect("nested"),
    )
    .expect("json");
    assert_eq!(nested["Europe"][0]["name"], serde_json::json!("France"));
    assert_eq!(nested["Europe"][0]["capital"], serde_json::json!("Paris"));
    assert_eq!(nested["Europe"][0]["population"], serde_json::json!(68_500_000u64));
    assert_eq!(nested["Europe"][0]["GDP (current US$)"], serde_json::json!(3.1e12));
    // Germany has no fact entry and no indicator rows: explicit nulls.
    assert_eq!(nested["Europe"][1]["name"], serde_json::json!("Germany"));
    assert!(nested["Europe"][1]["capital"].is_null());
    assert!(nested["Europe"][1]["GDP (current US$)"].is_null());
    // Japan's empty growth cell stays null while its GDP resolves.
    assert_eq!(nested["Asia"][0]["GDP (current US$)"], serde_json::json!(4.2e12));
    assert!(nested["Asia"][0]["GDP growth (annual %)"].is_null());

    let table = fs::read(tmp.path().join("out/merged_country_data.csv")).expect("table");
    assert_eq!(&table[..3], &[0xEF, 0xBB, 0xBF], "flat table should start with a UTF-8 BOM");
    let table_text = String::from_utf8_lossy(&table[3..]).to_string();
    assert!(table_text.starts_with("region,name,chinese,code,url,capital,area,population"));
    assert!(table_text.contains("Europe,France"));

    let report: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(tmp.path().join("out/merge_report.json")).expect("report"),
    )
    .expect("json");
    assert!(report.get("generated_at").is_none());
    assert_eq!(report["stats"]["countries"], serde_json::json!(3));
}

#[test]
fn test_rerun_is_byte_identical() {
    let tmp = TempDir::new().expect("tmp");
    write_fixtures(tmp.path());

    let mut cmd = atlas();
    cmd.current_dir(tmp.path());
    cmd.args(run_args(tmp.path()));
    cmd.assert().success();
    let first = fs::read(tmp.path().join("out/merged_country_data.json")).expect("first");
    let first_report = fs::read(tmp.path().join("out/merge_report.json")).expect("first report");

    let mut cmd = atlas();
    cmd.current_dir(tmp.path());
    cmd.args(run_args(tmp.path()));
    cmd.assert().success();
    let second = fs::read(tmp.path().join("out/merged_country_data.json")).expect("second");
    let second_report = fs::read(tmp.path().join("out/merge_report.json")).expect("second report");

    assert_eq!(first, second);
    assert_eq!(first_report, second_report);
}

#[test]
fn test_info_reports_inputs() {
    let tmp = TempDir::new().expect("tmp");
    write_fixtures(tmp.path());

    let mut cmd = atlas();
    cmd.current_dir(tmp.path());
    cmd.args(vec![
        "info".to_string(),
        "--registry".to_string(),
        tmp.path().join("countylink.json").display().to_string(),
        "--facts".to_string(),
        tmp.path().join("data/country_data.json").display().to_string(),
        "--data-dir".to_string(),
        tmp.path().join("data").display().to_string(),
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Regions: 2"))
        .stdout(predicate::str::contains("Countries: 3"))
        .stdout(predicate::str::contains("Coverage: 2 of 3 countries"));
}

#[test]
fn test_completions_generate() {
    let mut cmd = atlas();
    cmd.args(["completions", "bash"]);
    cmd.assert().success().stdout(predicate::str::contains("country-atlas"));
}
