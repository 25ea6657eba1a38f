use assert_cmd::Command;
use predicates::str::contains;
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/police_fatalities_sample.csv")
}

/// Runs in an empty directory so no local config file is picked up.
fn cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fatal-force").unwrap();
    cmd.current_dir(dir.path()).arg("--csv").arg(fixture()).arg("-q");
    cmd
}

#[test]
fn summary_text() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .arg("summary")
        .assert()
        .success()
        .stdout(contains("Dataset:  24 rows, 12 columns"))
        .stdout(contains("Houston, Texas"))
        .stdout(contains("Deaths by race"));
}

#[test]
fn summary_json_for_one_state_and_year() {
    let dir = TempDir::new().unwrap();
    let output = cmd(&dir)
        .args(["summary", "--json", "--year", "2016", "--state", "TX"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["year"], "2016");
    assert_eq!(json["states"], "Texas");
    assert_eq!(json["selected_rows"], 2);
    assert_eq!(json["by_state"][0]["name"], "Texas");
    assert_eq!(json["by_state"][0]["value"], 2);
}

#[test]
fn export_writes_option_documents() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("charts");
    cmd(&dir)
        .args(["export", "--out"])
        .arg(&out)
        .assert()
        .success()
        .stdout(contains("state_map.json"));

    for name in [
        "race_bar.json",
        "cities_bar.json",
        "state_map.json",
        "gender_pie.json",
        "age_distribution_male.json",
        "age_distribution_female.json",
        "summary.json",
    ] {
        assert!(out.join(name).is_file(), "missing {name}");
    }

    let map: Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("state_map.json")).unwrap()).unwrap();
    assert_eq!(map["visualMap"]["max"], 2);

    let cities: Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("cities_bar.json")).unwrap()).unwrap();
    let labels = cities["yAxis"]["data"].as_array().unwrap();
    assert_eq!(labels.len(), 10);
    assert_eq!(labels.last().unwrap(), "Houston");
}

#[test]
fn missing_csv_fails_with_context() {
    let dir = TempDir::new().unwrap();
    Command::cargo_bin("fatal-force")
        .unwrap()
        .current_dir(dir.path())
        .args(["--csv", "nope.csv", "summary"])
        .assert()
        .failure()
        .stderr(contains("loading incident data"));
}

#[test]
fn unknown_flag_is_rejected() {
    Command::cargo_bin("fatal-force")
        .unwrap()
        .args(["summary", "--bogus"])
        .assert()
        .failure();
}
