//! Integration tests for the liftlog binary.
//!
//! These tests verify end-to-end behavior including:
//! - Session workflow and persistence
//! - Inter-session progression across runs
//! - Stats and history reporting
//! - Baseline management and CSV export

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("liftlog"))
}

/// Run one full session with every set recorded at `reps`
fn run_session(data_dir: &std::path::Path, program: &str, reps: u32) -> Vec<u8> {
    cli()
        .arg("start")
        .arg(program)
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--auto-reps")
        .arg(reps.to_string())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone()
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Progressive overload strength tracker",
        ));
}

#[test]
fn test_programs_lists_catalog() {
    cli()
        .arg("programs")
        .assert()
        .success()
        .stdout(predicate::str::contains("upper1"))
        .stdout(predicate::str::contains("Bench Press"))
        .stdout(predicate::str::contains("lower2"))
        .stdout(predicate::str::contains("Deadlift"));
}

#[test]
fn test_start_unknown_program_fails() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("start")
        .arg("nope")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--auto-reps")
        .arg("8")
        .assert()
        .failure();
}

#[test]
fn test_session_logged_to_history() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("start")
        .arg("upper1")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--auto-reps")
        .arg("8")
        .assert()
        .success()
        .stdout(predicate::str::contains("Session logged"));

    let history_path = data_dir.join("history.jsonl");
    let content = fs::read_to_string(&history_path).expect("Failed to read history");
    let line = content.lines().next().expect("history is empty");
    let entry: serde_json::Value = serde_json::from_str(line).expect("invalid JSON line");

    assert_eq!(entry["workoutType"], "upper1");
    assert!(entry["date"].is_string());
    assert!(entry["id"].is_string());
    // Bench opens at the built-in 95 and earns +5 after each of the
    // first two max-rep sets; the final set triggers no further change.
    let bench = &entry["exercises"]["bench"];
    assert_eq!(bench["targetWeight"], 105.0);
    let sets = bench["sets"].as_array().expect("bench sets missing");
    assert_eq!(sets.len(), 3);
    assert_eq!(sets[0]["weight"], 95.0);
    assert_eq!(sets[2]["weight"], 105.0);
    assert_eq!(sets[0]["reps"], 8);
    assert_eq!(sets[0]["targetReps"], serde_json::json!([6, 8]));
}

#[test]
fn test_closed_stdin_discards_session() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    // With no stdin the interactive loop quits without saving
    cli()
        .arg("start")
        .arg("upper1")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Session discarded"));

    assert!(!data_dir.join("history.jsonl").exists());
}

#[test]
fn test_hitting_top_of_range_raises_next_session() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    // Bench target range is 6-8, so every set at 8 earns an increase
    run_session(&data_dir, "upper1", 8);
    let second = run_session(&data_dir, "upper1", 8);

    let stdout = String::from_utf8(second).expect("non-utf8 output");
    assert!(stdout.contains("increased from last session"));
}

#[test]
fn test_missing_reps_lowers_next_session() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    run_session(&data_dir, "upper1", 8);
    // Well below every minimum in the program
    run_session(&data_dir, "upper1", 2);
    let third = run_session(&data_dir, "upper1", 8);

    let stdout = String::from_utf8(third).expect("non-utf8 output");
    assert!(stdout.contains("decreased from last session"));
}

#[test]
fn test_stats_recommends_least_trained_program() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    run_session(&data_dir, "upper1", 8);

    cli()
        .arg("stats")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 total"))
        .stdout(predicate::str::contains("Recommended next: lower1"));
}

#[test]
fn test_history_lists_sessions_newest_first() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    run_session(&data_dir, "upper1", 8);
    run_session(&data_dir, "lower1", 8);

    let output = cli()
        .arg("history")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).expect("non-utf8 output");
    let upper = stdout.find("upper1").expect("upper1 missing");
    let lower = stdout.find("lower1").expect("lower1 missing");
    assert!(lower < upper, "newest session should print first");
}

#[test]
fn test_history_empty() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No workouts recorded yet"));
}

#[test]
fn test_baseline_set_and_show() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("baseline")
        .arg("set")
        .arg("bench")
        .arg("105")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("105"));

    cli()
        .arg("baseline")
        .arg("show")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("bench"))
        .stdout(predicate::str::contains("105"));
}

#[test]
fn test_baseline_seeds_first_session_weight() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("baseline")
        .arg("set")
        .arg("bench")
        .arg("185")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    let output = run_session(&data_dir, "upper1", 8);
    let stdout = String::from_utf8(output).expect("non-utf8 output");
    assert!(stdout.contains("185"));
}

#[test]
fn test_baseline_unknown_exercise_fails() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("baseline")
        .arg("set")
        .arg("snatch")
        .arg("95")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("snatch"));
}

#[test]
fn test_export_creates_csv() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    run_session(&data_dir, "lower2", 6);

    cli()
        .arg("export")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported"));

    let csv_path = data_dir.join("history.csv");
    assert!(csv_path.exists());

    let csv_content = fs::read_to_string(&csv_path).expect("Failed to read CSV");
    assert!(csv_content.contains("date,workout_type,exercise"));
    assert!(csv_content.contains("deadlift"));
}
