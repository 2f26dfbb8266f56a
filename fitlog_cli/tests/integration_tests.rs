//! Integration tests for the fitlog binary.
//!
//! These tests verify end-to-end behavior including:
//! - Logging quantities and reading back day totals
//! - Month-to-date statistics
//! - Profile updates feeding the calorie model
//! - CSV export

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const TODAY: &str = "2026-10-15";

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// CLI pinned to a fixed date, isolated from the user's config and data
fn cli(data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fitlog"));
    cmd.env("XDG_CONFIG_HOME", data_dir.join("config"))
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--today")
        .arg(TODAY);
    cmd
}

fn log(data_dir: &Path, exercise: &str, quantity: &str) -> assert_cmd::assert::Assert {
    cli(data_dir)
        .arg("log")
        .arg(exercise)
        .arg(quantity)
        .assert()
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("fitlog"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Daily exercise log with calorie estimates",
        ));
}

#[test]
fn test_log_creates_record_file() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    log(data_dir, "pushup", "20")
        .success()
        .stdout(predicate::str::contains("Logged 20 pushup on 2026-10-15"))
        .stdout(predicate::str::contains("Day total: 7 cal"));

    let contents = fs::read_to_string(data_dir.join("records.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(json["2026-10-15"]["pushup"], 20.0);
}

#[test]
fn test_day_total_adds_walking() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    log(data_dir, "pushup", "20").success();
    log(data_dir, "walk", "2")
        .success()
        .stdout(predicate::str::contains("Logged 2KM walk"))
        .stdout(predicate::str::contains("Day total: 127 cal"));

    cli(data_dir)
        .arg("day")
        .assert()
        .success()
        .stdout(predicate::str::contains("THURSDAY  15 OCT 2026"))
        .stdout(predicate::str::contains("Total: 127 cal"))
        .stdout(predicate::str::contains("Last 7 days"));
}

#[test]
fn test_relogging_replaces_quantity() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    log(data_dir, "walk", "5").success();
    log(data_dir, "walk", "2")
        .success()
        .stdout(predicate::str::contains("Day total: 120 cal"));
}

#[test]
fn test_full_completion_message() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    for (exercise, quantity) in [("pushup", "20"), ("pullup", "10"), ("situp", "30"), ("bicepcurl", "15")] {
        log(data_dir, exercise, quantity)
            .success()
            .stdout(predicate::str::contains("exercises done").not());
    }

    log(data_dir, "walk", "2")
        .success()
        .stdout(predicate::str::contains("All 5 exercises done"));
}

#[test]
fn test_log_to_recent_day() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["log", "situp", "30", "--date", "2026-10-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("on 2026-10-10"));

    cli(data_dir)
        .args(["day", "--date", "2026-10-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SATURDAY  10 OCT 2026"))
        .stdout(predicate::str::contains("Total: 5 cal"));
}

#[test]
fn test_log_outside_history_rejected() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["log", "situp", "30", "--date", "2026-10-09"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DateOutOfRange"));

    cli(data_dir)
        .args(["log", "situp", "30", "--date", "2026-10-16"])
        .assert()
        .failure();

    assert!(!data_dir.join("records.json").exists());
}

#[test]
fn test_invalid_input_rejected() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    log(data_dir, "pushup", "-3")
        .failure()
        .stderr(predicate::str::contains("InvalidQuantity"));

    log(data_dir, "yoga", "10")
        .failure()
        .stderr(predicate::str::contains("UnknownExercise"));

    log(data_dir, "pushup", "lots").failure();
}

#[test]
fn test_day_outside_history_falls_back_to_today() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["day", "--date", "2026-09-01"])
        .assert()
        .success()
        .stderr(predicate::str::contains("showing today"))
        .stdout(predicate::str::contains("15 OCT 2026"));
}

#[test]
fn test_stats_month_to_date() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["log", "walk", "5", "--date", "2026-10-13"])
        .assert()
        .success();

    cli(data_dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Streak:    0 DAYS"))
        .stdout(predicate::str::contains("Best day:  301 CAL"))
        .stdout(predicate::str::contains("Distance:  5.0 KM"))
        .stdout(predicate::str::contains("Calories:  301 CAL"));
}

#[test]
fn test_stats_streak() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    for date in ["2026-10-13", "2026-10-14", "2026-10-15"] {
        cli(data_dir)
            .args(["log", "pushup", "10", "--date", date])
            .assert()
            .success();
    }

    cli(data_dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Streak:    3 DAYS"));
}

#[test]
fn test_profile_weight_changes_calories() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .arg("profile")
        .assert()
        .success()
        .stdout(predicate::str::contains("Weight: 86 kg"))
        .stdout(predicate::str::contains("Height: 178 cm"));

    cli(data_dir)
        .args(["profile", "--weight", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile saved"))
        .stdout(predicate::str::contains("Weight: 100 kg"));

    log(data_dir, "walk", "2")
        .success()
        .stdout(predicate::str::contains("Day total: 140 cal"));
}

#[test]
fn test_profile_rejects_zero_weight() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["profile", "--weight", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("InvalidProfile"));
}

#[test]
fn test_graph_window() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    log(data_dir, "walk", "2").success();

    let output = cli(data_dir)
        .arg("graph")
        .assert()
        .success()
        .stdout(predicate::str::contains("Last 30 days"))
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8_lossy(&output);
    let bars: Vec<_> = stdout
        .lines()
        .filter(|l| l.trim_start().starts_with(|c: char| c.is_ascii_digit()))
        .collect();
    assert_eq!(bars.len(), 30);
    assert!(bars[0].contains("09-16"));
    assert!(bars[29].contains("10-15 THU"));
    assert!(bars[29].contains(&"█".repeat(30)));
}

#[test]
fn test_oversized_windows_rejected() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["graph", "--days", "100000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 1 and 366"));

    cli(data_dir)
        .args(["graph", "--days", "0"])
        .assert()
        .failure();

    cli(data_dir)
        .arg("export")
        .arg("--output")
        .arg(data_dir.join("export.csv"))
        .args(["--days", "4294967295"])
        .assert()
        .failure();

    cli(data_dir)
        .args(["graph", "--days", "366"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Last 366 days"));
}

#[test]
fn test_day_lists_viewable_days() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["day", "--date", "2026-10-12"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "SAT 10  SUN 11  [MON 12]  TUE 13  WED 14  THU 15",
        ));

    cli(data_dir)
        .arg("day")
        .assert()
        .success()
        .stdout(predicate::str::contains("WED 14  [THU 15]"));
}

#[test]
fn test_export_csv() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let output = data_dir.join("export.csv");

    log(data_dir, "pushup", "20").success();

    cli(data_dir)
        .arg("export")
        .arg("--output")
        .arg(&output)
        .args(["--days", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 7 days"));

    let csv = fs::read_to_string(&output).unwrap();
    assert!(csv.starts_with("date,pushup,pullup,situp,bicepcurl,walk,total_kcal"));
    assert!(csv.contains("2026-10-15,20,0,0,0,0,6.55"));
}

#[test]
fn test_exercises_lists_catalog() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("exercises")
        .assert()
        .success()
        .stdout(predicate::str::contains("pushup"))
        .stdout(predicate::str::contains("BICEP CURL"))
        .stdout(predicate::str::contains("km at 5 km/h"));
}
