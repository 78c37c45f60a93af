//! CLI end-to-end tests
//!
//! Tests for the simulcast command-line interface.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

/// Get a command for the simulcast binary
#[allow(deprecated)]
fn simulcast_cmd() -> Command {
    Command::cargo_bin("simulcast").unwrap()
}

/// Write a config pointing the database into `dir` with a UTC viewer.
fn write_config(dir: &Path) -> PathBuf {
    let config_file = dir.join("config.toml");
    let db_path = dir.join("simulcast.db");
    fs::write(
        &config_file,
        format!(
            r#"
[database]
path = "{}"

[schedule]
viewer_timezone = "UTC"

[[sources]]
language = "chs"
timezone = "Asia/Shanghai"
"#,
            db_path.display()
        ),
    )
    .unwrap();
    config_file
}

fn write_sources(dir: &Path) -> (PathBuf, PathBuf) {
    let chs = dir.join("chs.json");
    fs::write(
        &chs,
        r#"[
            {"name": "Foo", "day": 5, "time": "23:00"},
            {"name": "Bar", "day": 9, "time": "20:00"}
        ]"#,
    )
    .unwrap();

    let eng = dir.join("eng.json");
    fs::write(
        &eng,
        r#"[
            {"name": "Foo", "day": 6, "time": "00:00", "timezone": "Asia/Tokyo", "image_url": "http://img/foo.jpg"}
        ]"#,
    )
    .unwrap();

    (chs, eng)
}

fn setup() -> (TempDir, PathBuf, PathBuf, PathBuf) {
    let temp = tempdir().unwrap();
    let config = write_config(temp.path());
    let (chs, eng) = write_sources(temp.path());
    (temp, config, chs, eng)
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = simulcast_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = simulcast_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("simulcast"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = simulcast_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("simulcast"));
}

#[test]
fn test_cli_aggregate_help() {
    let mut cmd = simulcast_cmd();
    cmd.args(["aggregate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("LANG=FILE"));
}

#[test]
fn test_cli_normalize_rolls_past_midnight() {
    let (_temp, config, _, _) = setup();

    let mut cmd = simulcast_cmd();
    cmd.args([
        "normalize",
        "--config",
        config.to_str().unwrap(),
        "--day",
        "Fri",
        "--time",
        "25:15",
        "--zone",
        "JST",
        "--date",
        "2024-10-16",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Friday 16:15"));
}

#[test]
fn test_cli_normalize_viewer_override() {
    let mut cmd = simulcast_cmd();
    cmd.args([
        "normalize",
        "--day",
        "2",
        "--time",
        "23:30",
        "--zone",
        "Asia/Tokyo",
        "--viewer",
        "Europe/Berlin",
        "--date",
        "2024-01-17",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Wednesday 15:30"));
}

#[test]
fn test_cli_normalize_broadcast_line() {
    let mut cmd = simulcast_cmd();
    cmd.args([
        "normalize",
        "--broadcast",
        "Fridays at 24:30 (JST)",
        "--viewer",
        "UTC",
        "--date",
        "2024-10-16",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Friday 15:30"));
}

#[test]
fn test_cli_normalize_premiere_date() {
    // 2024-10-05 is a Saturday.
    let mut cmd = simulcast_cmd();
    cmd.args([
        "normalize",
        "--day",
        "10/05",
        "--time",
        "23:00",
        "--zone",
        "JST",
        "--viewer",
        "UTC",
        "--date",
        "2024-10-16",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Saturday 14:00"));
}

#[test]
fn test_cli_normalize_needs_a_slot() {
    let mut cmd = simulcast_cmd();
    cmd.args(["normalize", "--viewer", "UTC"])
        .assert()
        .failure();
}

#[test]
fn test_cli_normalize_rejects_bad_time() {
    let mut cmd = simulcast_cmd();
    cmd.args([
        "normalize", "--day", "1", "--time", "7.30", "--zone", "JST", "--viewer", "UTC",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Invalid time format"));
}

#[test]
fn test_cli_aggregate_dry_run_json() {
    let (temp, config, chs, eng) = setup();

    let output = simulcast_cmd()
        .args([
            "aggregate",
            "--config",
            config.to_str().unwrap(),
            "--source",
            &format!("chs={}", chs.display()),
            "--source",
            &format!("eng={}", eng.display()),
            "--dry-run",
            "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let records = report["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);

    // Shanghai Saturday 23:00 and Tokyo Sunday 00:00 are both Saturday 15:00 UTC.
    let translations = &records[0]["translations"];
    assert_eq!(translations["chs"]["day"], 5);
    assert_eq!(translations["chs"]["time"], "15:00");
    assert_eq!(translations["chs"]["timezone"], "Asia/Shanghai");
    assert_eq!(translations["eng"]["time"], "15:00");
    assert_eq!(translations["eng"]["image_url"], "http://img/foo.jpg");

    assert_eq!(report["slot_matches"], 1);
    assert_eq!(report["written"], 0);
    assert_eq!(report["skipped"][0]["title"], "Bar");
    assert_eq!(report["skipped"][0]["index"], 1);

    assert!(!temp.path().join("simulcast.db").exists());
}

#[test]
fn test_cli_aggregate_keeps_good_rows_of_a_damaged_source() {
    let (temp, config, _, _) = setup();

    let chs = temp.path().join("chs-damaged.json");
    fs::write(
        &chs,
        r#"[
            {"name": "A", "day": 0, "time": "10:00"},
            {"name": "B", "day": 1},
            {"name": "C", "day": -1, "time": "10:00"},
            {"name": "D", "day": 1, "time": "20:00"}
        ]"#,
    )
    .unwrap();
    let eng = temp.path().join("eng-lines.json");
    fs::write(
        &eng,
        r#"[
            {"name": "E", "broadcast": "Saturdays at 23:00 (JST)"},
            {"name": "F", "broadcast": "Unknown"}
        ]"#,
    )
    .unwrap();

    let output = simulcast_cmd()
        .args([
            "aggregate",
            "--config",
            config.to_str().unwrap(),
            "--source",
            &format!("chs={}", chs.display()),
            "--source",
            &format!("eng={}", eng.display()),
            "--dry-run",
            "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["records"].as_array().unwrap().len(), 3);
    assert_eq!(report["normalized"], 3);

    let skipped: Vec<_> = report["skipped"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| {
            (
                s["language"].as_str().unwrap().to_string(),
                s["index"].as_u64().unwrap(),
                s["title"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    assert_eq!(
        skipped,
        vec![
            ("chs".to_string(), 1, "B".to_string()),
            ("chs".to_string(), 2, "C".to_string()),
            ("eng".to_string(), 1, "F".to_string()),
        ]
    );
    assert!(report["skipped"][0]["reason"]
        .as_str()
        .unwrap()
        .contains("missing field"));

    // Saturday 23:00 in Tokyo is Saturday 14:00 UTC.
    let line_entry = report["records"]
        .as_array()
        .unwrap()
        .iter()
        .find_map(|r| r["translations"].get("eng"))
        .unwrap();
    assert_eq!(line_entry["day"], 5);
    assert_eq!(line_entry["time"], "14:00");
}

#[test]
fn test_cli_aggregate_then_list() {
    let (_temp, config, chs, eng) = setup();

    simulcast_cmd()
        .args([
            "aggregate",
            "--config",
            config.to_str().unwrap(),
            "--source",
            &format!("chs={}", chs.display()),
            "--source",
            &format!("eng={}", eng.display()),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Written: 1"))
        .stdout(predicate::str::contains("Skipped: 1"));

    let output = simulcast_cmd()
        .args(["list", "--config", config.to_str().unwrap(), "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["translations"]["chs"]["name"], "Foo");
}

#[test]
fn test_cli_aggregate_bad_source_arg() {
    let mut cmd = simulcast_cmd();
    cmd.args(["aggregate", "--source", "klingon=/tmp/x.json", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid source language"));
}

#[test]
fn test_cli_aggregate_missing_file() {
    let mut cmd = simulcast_cmd();
    cmd.args([
        "aggregate",
        "--source",
        "eng=/nonexistent/eng.json",
        "--dry-run",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to read source file"));
}

#[test]
fn test_cli_validate_config() {
    let (_temp, config, _, _) = setup();

    let mut cmd = simulcast_cmd();
    cmd.args(["validate", config.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("Viewer timezone: UTC"));
}

#[test]
fn test_cli_validate_invalid_config() {
    let temp = tempdir().unwrap();
    let config_file = temp.path().join("bad.toml");
    fs::write(
        &config_file,
        r#"
[schedule]
match_window_minutes = 0
"#,
    )
    .unwrap();

    let mut cmd = simulcast_cmd();
    cmd.args(["validate", config_file.to_str().unwrap()])
        .assert()
        .failure();
}

#[test]
fn test_cli_season() {
    let mut cmd = simulcast_cmd();
    cmd.arg("season")
        .assert()
        .success()
        .stdout(predicate::str::contains("Season:"));
}
