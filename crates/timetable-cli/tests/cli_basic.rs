//! Basic CLI E2E tests.
//!
//! Each test runs the binary against its own data directory and checks
//! exit codes and output.

use std::process::Command;
use tempfile::TempDir;

const CATALOG: &str = r#"{
  "message": "fetched all courses from db",
  "courses": [
    {"uniqueId": "MTH-A", "courseName": "Math", "displayName": "Calculus", "staff": "Prof. Das",
     "credits": 4, "slots": [{"day": "Monday", "time": "8-10"}]},
    {"uniqueId": "MTH-B", "courseName": "Math", "displayName": "Calculus", "staff": "Dr. Roy",
     "credits": 4, "slots": [{"day": "Tuesday", "time": "8-10"}]},
    {"uniqueId": "PHY-A", "courseName": "Physics", "displayName": "Mechanics", "staff": "Dr. Sen",
     "credits": 3, "slots": [{"day": "Monday", "time": "9-10"}]},
    {"uniqueId": "CHE-A", "courseName": "Chemistry", "displayName": "Organic", "staff": "Dr. Pal",
     "credits": 3, "slots": [{"day": "Wednesday", "time": "1-2"}, {"day": "Friday", "time": "3-5"}]},
    {"uniqueId": "BAD-A", "courseName": "Bad", "displayName": "Bad", "staff": "Nobody",
     "credits": 3, "slots": [{"day": "Monday", "time": "eight"}]}
  ]
}"#;

/// Run the CLI with `home` as its data directory.
fn run_cli(home: &TempDir, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_timetable"))
        .args(args)
        .env("TIMETABLE_HOME", home.path())
        .env_remove("TIMETABLE_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn imported_home() -> TempDir {
    let home = TempDir::new().unwrap();
    let file = home.path().join("catalog.json");
    std::fs::write(&file, CATALOG).unwrap();
    let (stdout, stderr, code) = run_cli(&home, &["catalog", "import", file.to_str().unwrap()]);
    assert_eq!(code, 0, "import failed: {stderr}");
    assert!(stdout.contains("4 offerings accepted, 1 rejected"), "{stdout}");
    home
}

#[test]
fn test_help() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&home, &["--help"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("catalog"));
    assert!(stdout.contains("select"));
}

#[test]
fn test_catalog_list_json() {
    let home = imported_home();
    let (stdout, _, code) = run_cli(&home, &["catalog", "list", "--json"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 4);
    assert_eq!(parsed[0]["uniqueId"], "MTH-A");
}

#[test]
fn test_catalog_search_and_subjects() {
    let home = imported_home();
    let (stdout, _, code) = run_cli(&home, &["catalog", "search", "sen"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("PHY-A"));
    assert!(!stdout.contains("MTH-A"));

    let (stdout, _, code) = run_cli(&home, &["catalog", "subjects", "--json"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed[0]["courseName"], "Math");
    assert_eq!(parsed[0]["totalCourses"], 2);
}

#[test]
fn test_catalog_show_unknown_fails() {
    let home = imported_home();
    let (_, stderr, code) = run_cli(&home, &["catalog", "show", "NOPE"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error: no offering matches"));
}

#[test]
fn test_select_scenario() {
    let home = imported_home();

    let (stdout, _, code) = run_cli(&home, &["select", "add", "MTH-A"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Added"));

    let (_, stderr, code) = run_cli(&home, &["select", "add", "MTH-B"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Math"));

    let (_, stderr, code) = run_cli(&home, &["select", "add", "PHY-A"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("is already scheduled on Monday at 8-10"));

    let (_, stderr, code) = run_cli(&home, &["select", "add", "BAD-A"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Course not found"));

    let (stdout, _, code) = run_cli(&home, &["select", "add", "CHE-A", "--json"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["outcome"], "added");

    let (stdout, _, _) = run_cli(&home, &["select", "credits"]);
    assert_eq!(stdout.trim(), "7");

    let (stdout, _, code) = run_cli(&home, &["select", "remove", "CHE-A"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("removed CHE-A"));
    let (stdout, _, code) = run_cli(&home, &["select", "remove", "CHE-A"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("was not selected"));
}

#[test]
fn test_filter_free_day_and_conflicts() {
    let home = imported_home();
    let (stdout, _, code) = run_cli(&home, &["filter", "--free-day", "mon", "--json"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let ids: Vec<&str> = parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["uniqueId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["MTH-B", "CHE-A"]);

    run_cli(&home, &["select", "add", "MTH-A"]);
    let (stdout, _, code) = run_cli(
        &home,
        &["filter", "--exclude-conflicting", "--exclude-same-subject", "--subjects"],
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("Chemistry"));
    assert!(!stdout.contains("Physics"));
    assert!(!stdout.contains("Math"));
}

#[test]
fn test_filter_rejects_bad_day() {
    let home = imported_home();
    let (_, _, code) = run_cli(&home, &["filter", "--free-day", "someday"]);
    assert_ne!(code, 0);
}

#[test]
fn test_grid_shows_selection() {
    let home = imported_home();
    run_cli(&home, &["select", "add", "MTH-A"]);
    let (stdout, _, code) = run_cli(&home, &["grid"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("MTH-A"));
    assert!(stdout.contains("total credits: 4"));

    let (stdout, _, code) = run_cli(&home, &["grid", "--json"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 6);
}

#[test]
fn test_config_get_set_reset() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&home, &["config", "get", "catalog.refresh_interval_min"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "30");

    let (_, _, code) = run_cli(&home, &["config", "set", "grid.palette", "red,green"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(&home, &["config", "get", "grid.palette"]);
    assert_eq!(stdout.trim(), r#"["red","green"]"#);

    let (_, stderr, code) = run_cli(&home, &["config", "get", "grid.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));

    let (_, _, code) = run_cli(&home, &["config", "reset"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(&home, &["config", "get", "grid.palette"]);
    assert!(stdout.contains("blue"));
}

#[test]
fn test_fetch_skips_fresh_catalog() {
    let home = imported_home();
    let (stdout, _, code) = run_cli(&home, &["catalog", "fetch"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("up to date"));
}

#[test]
fn test_completions() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&home, &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("timetable"));
}
