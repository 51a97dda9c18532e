//! Integration tests for the fittrack binary.
//!
//! These tests verify end-to-end behavior including:
//! - Progress and meal-type output
//! - Preference persistence across invocations
//! - Daily summaries from CSV logs, gated by preferences

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the CLI with an isolated data dir and config
fn cli(data_dir: &Path) -> Command {
    let config_path = data_dir.join("config.toml");
    if !config_path.exists() {
        fs::write(
            &config_path,
            "[goals]\ncalories = 2000\nprotein = 150\ncarbs = 250\nfats = 65\n\n\
             [progress]\ntolerance_percent = 10\nbar_width = 10\n",
        )
        .expect("Failed to write config");
    }
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fittrack"));
    cmd.arg("--data-dir")
        .arg(data_dir)
        .arg("--config")
        .arg(config_path);
    cmd
}

fn write_meals(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("meals.csv");
    fs::write(
        &path,
        "name,calories,protein,carbs,fats,logged_at,meal_type\n\
         Oats,400,20,60,10,2025-03-01T07:30:00,\n\
         Chicken wrap,650,45,70,20,2025-03-01T12:15:00,\n\
         Protein bar,,20,25,8,2025-03-01T15:00:00,Snacks\n\
         Salmon,850,60,90,30,2025-03-01T19:00:00,\n\
         Pizza,900,30,100,35,2025-03-02T19:00:00,\n",
    )
    .expect("Failed to write meals");
    path
}

fn write_workouts(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("workouts.csv");
    fs::write(
        &path,
        "name,duration,exercises,performed_on\n\
         Legs,45,5,2025-02-27\n\
         Push,40,4,2025-02-28\n\
         Walk,30,0,2025-03-01\n\
         Pull,50,6,2025-03-01\n",
    )
    .expect("Failed to write workouts");
    path
}

#[test]
fn test_cli_help() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Fitness progress and goal tracking"));
}

#[test]
fn test_progress_output() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args(["progress", "109", "100", "--unit", "g"])
        .assert()
        .success()
        .stdout(predicate::str::contains("109/100 g"))
        .stdout(predicate::str::contains("Progress: 100% (excellent)"))
        .stdout(predicate::str::contains("Goal met: yes"))
        .stdout(predicate::str::contains("Goal exceeded: yes"));
}

#[test]
fn test_progress_past_tolerance_is_not_met() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args(["progress", "111", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Goal met: no"))
        .stdout(predicate::str::contains("Goal exceeded: yes"));
}

#[test]
fn test_progress_zero_goal() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args(["progress", "50", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Progress: 0% (poor)"))
        .stdout(predicate::str::contains("[----------]"));
}

#[test]
fn test_progress_rejects_negative_tolerance() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args(["progress", "50", "100", "--tolerance", "-5"])
        .assert()
        .failure();
}

#[test]
fn test_progress_rejects_non_finite_values() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args(["progress", "NaN", "100"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Progress").not())
        .stderr(predicate::str::contains("actual must be a finite number"));

    cli(temp_dir.path())
        .args(["progress", "50", "inf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("goal must be a finite number"));
}

#[test]
fn test_meal_type_for_hour() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args(["meal-type", "--hour", "12"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lunch"))
        .stdout(predicate::str::contains("Next: Snacks"))
        .stdout(predicate::str::contains("Previous: Breakfast"));
}

#[test]
fn test_meal_type_gap_hour_is_breakfast() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args(["meal-type", "--hour", "23"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Breakfast"));
}

#[test]
fn test_meal_type_rejects_out_of_range_hour() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args(["meal-type", "--hour", "24"])
        .assert()
        .failure();
}

#[test]
fn test_prefs_list_defaults() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args(["prefs", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x] calories"))
        .stdout(predicate::str::contains("[x] streak"))
        .stdout(predicate::str::contains("Streak metric: workouts"));

    // Listing doesn't write anything
    assert!(!temp_dir.path().join("settings.json").exists());
}

#[test]
fn test_prefs_toggle_persists() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["prefs", "toggle", "protein"])
        .assert()
        .success()
        .stdout(predicate::str::contains("protein hidden"));

    cli(temp_dir.path())
        .args(["prefs", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[ ] protein"))
        .stdout(predicate::str::contains("[x] carbs"));

    cli(temp_dir.path())
        .args(["prefs", "toggle", "protein"])
        .assert()
        .success()
        .stdout(predicate::str::contains("protein shown"));

    let contents = fs::read_to_string(temp_dir.path().join("settings.json")).unwrap();
    let settings: serde_json::Value = serde_json::from_str(&contents).unwrap();
    let protein = settings["goal_preferences"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["stat_name"] == "protein")
        .unwrap();
    assert_eq!(protein["is_enabled"], true);
}

#[test]
fn test_prefs_toggle_unknown_stat_fails() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args(["prefs", "toggle", "steps"])
        .assert()
        .failure();
    assert!(!temp_dir.path().join("settings.json").exists());
}

#[test]
fn test_prefs_streak_metric() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["prefs", "streak", "exercises"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Streak metric set to exercises"));

    cli(temp_dir.path())
        .args(["prefs", "streak", "laps"])
        .assert()
        .failure();

    cli(temp_dir.path())
        .args(["prefs", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Streak metric: exercises"));
}

#[test]
fn test_ephemeral_prefs_do_not_touch_disk() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args(["--ephemeral", "prefs", "toggle", "fats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fats hidden"));
    assert!(!temp_dir.path().join("settings.json").exists());
}

#[test]
fn test_corrupted_settings_file_is_reported() {
    let temp_dir = setup_test_dir();
    fs::write(temp_dir.path().join("settings.json"), "{ invalid json }}}").unwrap();

    cli(temp_dir.path())
        .args(["prefs", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Persistence"));
}

#[test]
fn test_summary_totals_and_categories() {
    let temp_dir = setup_test_dir();
    let meals = write_meals(temp_dir.path());

    cli(temp_dir.path())
        .args(["summary", "--date", "2025-03-01", "--meals"])
        .arg(&meals)
        .assert()
        .success()
        .stdout(predicate::str::contains("Summary for 2025-03-01"))
        // The protein bar has no calories, so it is skipped
        .stdout(predicate::str::contains("1900/2000 kcal"))
        .stdout(predicate::str::contains("125/150 g"))
        .stdout(predicate::str::contains("Breakfast (1): Oats"))
        .stdout(predicate::str::contains("Lunch (1): Chicken wrap"))
        .stdout(predicate::str::contains("Dinner (1): Salmon"))
        .stdout(predicate::str::contains("Protein bar").not())
        .stdout(predicate::str::contains("Pizza").not());
}

#[test]
fn test_summary_hides_disabled_stats() {
    let temp_dir = setup_test_dir();
    let meals = write_meals(temp_dir.path());

    cli(temp_dir.path())
        .args(["prefs", "toggle", "calories"])
        .assert()
        .success();

    cli(temp_dir.path())
        .args(["summary", "--date", "2025-03-01", "--meals"])
        .arg(&meals)
        .assert()
        .success()
        .stdout(predicate::str::contains("kcal").not())
        .stdout(predicate::str::contains("125/150 g"));
}

#[test]
fn test_summary_with_workouts_and_streak() {
    let temp_dir = setup_test_dir();
    let meals = write_meals(temp_dir.path());
    let workouts = write_workouts(temp_dir.path());

    cli(temp_dir.path())
        .args(["summary", "--date", "2025-03-01", "--meals"])
        .arg(&meals)
        .arg("--workouts")
        .arg(&workouts)
        .assert()
        .success()
        .stdout(predicate::str::contains("Workouts: 2"))
        .stdout(predicate::str::contains("Exercises: 6"))
        .stdout(predicate::str::contains("Streak (workouts): 3 days, best 3"));
}

#[test]
fn test_summary_rejects_bad_date() {
    let temp_dir = setup_test_dir();
    let meals = write_meals(temp_dir.path());

    cli(temp_dir.path())
        .args(["summary", "--date", "2025-02-30", "--meals"])
        .arg(&meals)
        .assert()
        .failure();
}
