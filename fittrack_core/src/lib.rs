#![forbid(unsafe_code)]

//! Progress and goal-classification core for the fittrack fitness tracker.
//!
//! This crate provides:
//! - Domain types (meals, workouts, macro goals, stat preferences)
//! - Input validation
//! - Meal classification and macro aggregation
//! - Progress, tier and goal-satisfaction calculations
//! - The goal preference store and its backing-store seam
//! - Workout streaks

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod validation;
pub mod meal;
pub mod progress;
pub mod preferences;
pub mod streak;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use meal::{calculate_meal_macro_totals, group_by_category, meal_type_by_time};
pub use progress::{calculate_macro_progress, macro_progress_report, ProgressResult, ProgressTier};
pub use preferences::{GoalPreferenceStore, MemoryBackend, PreferenceBackend};
pub use streak::{current_streak, daily_activity, DailyActivity};
