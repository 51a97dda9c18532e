//! Input validation predicates.
//!
//! Every raw value passes through here before it reaches the domain layer.
//! The predicates never panic and never mutate; a failed check is a `false`
//! (or a neutral default for the two normalizers), not an error.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::{MacroGoals, MealRecord, WorkoutRecord};

/// Default precision for [`round_number`]
pub const DEFAULT_DECIMALS: u32 = 2;

static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"));

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Non-empty after trimming surrounding whitespace
pub fn is_valid_string(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Not NaN and at least zero
pub fn is_valid_number(value: f64) -> bool {
    is_valid_number_min(value, 0.0)
}

/// Not NaN and at least `min_value`
pub fn is_valid_number_min(value: f64, min_value: f64) -> bool {
    !value.is_nan() && value >= min_value
}

/// A whole, non-negative number
pub fn is_valid_integer(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0 && value >= 0.0
}

/// `YYYY-MM-DD` that names a real calendar day
///
/// The shape check alone would accept `2025-02-30`; the calendar check
/// rejects it.
pub fn is_valid_date(value: &str) -> bool {
    if !DATE_PATTERN.is_match(value) {
        return false;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .is_some()
}

/// Permissive `local@domain.tld` shape check for UI gating, not RFC 5322
pub fn is_valid_email(value: &str) -> bool {
    is_valid_string(value) && EMAIL_PATTERN.is_match(value)
}

/// An object with no keys
pub fn is_empty_object(value: &Value) -> bool {
    value.as_object().is_some_and(|o| o.is_empty())
}

/// An array with no items
pub fn is_empty_array(value: &Value) -> bool {
    value.as_array().is_some_and(|a| a.is_empty())
}

/// Anything but `null`
pub fn value_exists(value: &Value) -> bool {
    !value.is_null()
}

fn present_and_valid(value: Option<f64>) -> bool {
    value.is_some_and(is_valid_number)
}

/// Named meal with all four macros present and non-negative
///
/// Missing macros fail here; only aggregation treats them as zero.
pub fn is_valid_meal(meal: &MealRecord) -> bool {
    meal.name.as_deref().is_some_and(is_valid_string)
        && present_and_valid(meal.calories)
        && present_and_valid(meal.protein)
        && present_and_valid(meal.carbs)
        && present_and_valid(meal.fats)
}

/// Named workout with a non-negative duration
pub fn is_valid_workout(workout: &WorkoutRecord) -> bool {
    workout.name.as_deref().is_some_and(is_valid_string)
        && workout
            .duration
            .is_some_and(|d| is_valid_number(d) || is_valid_integer(d))
}

pub fn is_valid_macro_goals(goals: &MacroGoals) -> bool {
    [goals.calories, goals.protein, goals.carbs, goals.fats]
        .into_iter()
        .all(is_valid_number)
}

/// Trim and collapse internal whitespace runs to one space
///
/// Returns an empty string for blank input. Idempotent.
pub fn sanitize_input(value: &str) -> String {
    if !is_valid_string(value) {
        return String::new();
    }
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Round half away from zero at `decimals` places; NaN becomes 0
///
/// Uses scaled rounding, so high precisions carry the usual floating-point
/// artifacts.
pub fn round_number(value: f64, decimals: u32) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
