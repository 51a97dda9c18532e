//! Core domain types for fittrack.
//!
//! This module defines the plain data that flows through the core:
//! - Raw meal and workout records as they arrive from input or storage
//! - Validated meals and macro totals/goals
//! - Meal categories
//! - Goal-tracking preferences and the streak metric setting

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

// ============================================================================
// Nutrition Types
// ============================================================================

/// Macro values where any field may be missing
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PartialMacros {
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub carbs: Option<f64>,
    #[serde(default)]
    pub fats: Option<f64>,
}

/// Fully populated macro values (totals, rounded values)
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Macros {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

/// Daily macro targets. Zero is a valid target.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MacroGoals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl Default for MacroGoals {
    fn default() -> Self {
        Self {
            calories: 2000.0,
            protein: 150.0,
            carbs: 250.0,
            fats: 65.0,
        }
    }
}

/// Time-of-day meal category, ordered Breakfast → Lunch → Snacks → Dinner
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MealCategory {
    Breakfast,
    Lunch,
    Snacks,
    Dinner,
}

impl MealCategory {
    /// Canonical cyclic ordering
    pub const ALL: [MealCategory; 4] = [
        MealCategory::Breakfast,
        MealCategory::Lunch,
        MealCategory::Snacks,
        MealCategory::Dinner,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealCategory::Breakfast => "Breakfast",
            MealCategory::Lunch => "Lunch",
            MealCategory::Snacks => "Snacks",
            MealCategory::Dinner => "Dinner",
        }
    }
}

impl fmt::Display for MealCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealCategory {
    type Err = Error;

    /// Only the four canonical strings are accepted (case-sensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MealCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("unknown meal type '{}'", s)))
    }
}

/// A meal as it arrives from input or storage; any field may be missing
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct MealRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub carbs: Option<f64>,
    #[serde(default)]
    pub fats: Option<f64>,
    /// Local wall-clock time the meal was logged
    #[serde(default)]
    pub logged_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub meal_type: Option<String>,
}

impl MealRecord {
    /// The record's macro fields, missing ones left as `None`
    pub fn macros(&self) -> PartialMacros {
        PartialMacros {
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fats: self.fats,
        }
    }
}

/// A validated meal
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Meal {
    pub name: String,
    pub macros: Macros,
    pub category: MealCategory,
    pub logged_at: Option<NaiveDateTime>,
}

// ============================================================================
// Workout Types
// ============================================================================

/// A workout as it arrives from input or storage
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkoutRecord {
    #[serde(default)]
    pub name: Option<String>,
    /// Duration in minutes
    #[serde(default)]
    pub duration: Option<f64>,
    /// Number of exercises performed in the workout
    #[serde(default)]
    pub exercises: Option<u32>,
    /// Calendar day, `YYYY-MM-DD`
    #[serde(default)]
    pub performed_on: Option<String>,
}

// ============================================================================
// Preference Types
// ============================================================================

/// The closed catalog of stats a user can show or hide
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StatKey {
    Calories,
    Protein,
    Carbs,
    Fats,
    Workouts,
    Exercises,
    Streak,
}

impl StatKey {
    pub const ALL: [StatKey; 7] = [
        StatKey::Calories,
        StatKey::Protein,
        StatKey::Carbs,
        StatKey::Fats,
        StatKey::Workouts,
        StatKey::Exercises,
        StatKey::Streak,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatKey::Calories => "calories",
            StatKey::Protein => "protein",
            StatKey::Carbs => "carbs",
            StatKey::Fats => "fats",
            StatKey::Workouts => "workouts",
            StatKey::Exercises => "exercises",
            StatKey::Streak => "streak",
        }
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| Error::UnknownStat(s.to_string()))
    }
}

/// One stat's visibility preference
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoalPreference {
    pub stat: StatKey,
    pub is_enabled: bool,
}

/// A preference row as the backing store holds it; the name is unchecked
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredPreference {
    pub stat_name: String,
    pub is_enabled: bool,
}

/// Basis used for day-to-day streak counting
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StreakMetric {
    #[default]
    Workouts,
    Exercises,
}

impl StreakMetric {
    /// User-setting key the metric is persisted under
    pub const SETTING_KEY: &'static str = "streak_metric";

    pub fn as_str(&self) -> &'static str {
        match self {
            StreakMetric::Workouts => "workouts",
            StreakMetric::Exercises => "exercises",
        }
    }
}

impl fmt::Display for StreakMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StreakMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "workouts" => Ok(StreakMetric::Workouts),
            "exercises" => Ok(StreakMetric::Exercises),
            other => Err(Error::InvalidInput(format!(
                "streak metric must be 'workouts' or 'exercises', got '{}'",
                other
            ))),
        }
    }
}

/// Composite settings state handed to observers after every change
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SettingsSnapshot {
    pub streak_metric: StreakMetric,
    pub enabled_stats: Vec<StatKey>,
}
