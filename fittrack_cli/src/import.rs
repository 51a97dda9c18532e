//! CSV import for meal and workout logs.
//!
//! Meal logs use the columns `name,calories,protein,carbs,fats,logged_at,meal_type`
//! (`logged_at` is local time, `YYYY-MM-DDTHH:MM:SS`);
//! workout logs use `name,duration,exercises,performed_on`. Any column may be
//! blank or absent; validation happens later in the core. Rows the CSV
//! reader cannot deserialize at all are logged and skipped.

use csv::ReaderBuilder;
use fittrack_core::{Error, MealRecord, Result, WorkoutRecord};
use serde::de::DeserializeOwned;
use std::path::Path;

fn load_rows<T: DeserializeOwned>(path: &Path, kind: &str) -> Result<Vec<T>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::Import(format!("cannot open {} log {:?}: {}", kind, path, e)))?;

    let mut rows = Vec::new();
    for (line, result) in reader.deserialize::<T>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                tracing::warn!("Skipping {} row {}: {}", kind, line + 2, e);
            }
        }
    }

    tracing::info!("Read {} {} rows from {:?}", rows.len(), kind, path);
    Ok(rows)
}

/// Load every meal row from a CSV log
pub fn load_meals(path: &Path) -> Result<Vec<MealRecord>> {
    load_rows(path, "meal")
}

/// Load every workout row from a CSV log
pub fn load_workouts(path: &Path) -> Result<Vec<WorkoutRecord>> {
    load_rows(path, "workout")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_meals_with_blank_fields() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("meals.csv");
        std::fs::write(
            &path,
            "name,calories,protein,carbs,fats,logged_at,meal_type\n\
             Oats,350,12,60,6,2025-03-01T07:30:00,\n\
             Shake,,30,5,2,,Snacks\n",
        )
        .unwrap();

        let meals = load_meals(&path).unwrap();
        assert_eq!(meals.len(), 2);
        assert_eq!(meals[0].name.as_deref(), Some("Oats"));
        assert_eq!(meals[0].calories, Some(350.0));
        assert!(meals[0].logged_at.is_some());
        assert_eq!(meals[0].meal_type, None);
        assert_eq!(meals[1].calories, None);
        assert_eq!(meals[1].meal_type.as_deref(), Some("Snacks"));
    }

    #[test]
    fn test_undeserializable_rows_are_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("meals.csv");
        std::fs::write(
            &path,
            "name,calories,protein,carbs,fats\n\
             Toast,lots,4,20,2\n\
             Egg,70,6,0,5\n",
        )
        .unwrap();

        let meals = load_meals(&path).unwrap();
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].name.as_deref(), Some("Egg"));
    }

    #[test]
    fn test_load_workouts() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("workouts.csv");
        std::fs::write(
            &path,
            "name,duration,exercises,performed_on\n\
             Legs,45,5,2025-03-01\n\
             Walk,20,,2025-03-02\n",
        )
        .unwrap();

        let workouts = load_workouts(&path).unwrap();
        assert_eq!(workouts.len(), 2);
        assert_eq!(workouts[0].exercises, Some(5));
        assert_eq!(workouts[1].exercises, None);
        assert_eq!(workouts[1].performed_on.as_deref(), Some("2025-03-02"));
    }

    #[test]
    fn test_missing_file_is_an_import_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = load_meals(&temp_dir.path().join("nope.csv"));
        assert!(matches!(result, Err(Error::Import(_))));
    }
}
