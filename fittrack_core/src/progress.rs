//! Progress, tier and goal-satisfaction calculations.
//!
//! Tiers are read off a percentage-of-goal, first match wins:
//! - `>= 90` → excellent
//! - `>= 70` → good
//! - `>= 50` → fair (shares the good colour)
//! - otherwise → poor

use serde::Serialize;

use crate::{MacroGoals, Macros, StatKey};

/// Default width of a progress bar, in whatever unit the caller draws with
pub const DEFAULT_BAR_WIDTH: f64 = 100.0;

/// Default symmetric tolerance band for [`is_goal_met`]
pub const DEFAULT_TOLERANCE_PERCENT: f64 = 10.0;

const COLOR_EXCELLENT: &str = "#4CAF50";
const COLOR_GOOD: &str = "#FFC107";
const COLOR_POOR: &str = "#F44336";

/// Status tier for a percentage of goal achieved
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProgressTier {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ProgressTier {
    /// Tier for a (possibly uncapped) percentage
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            ProgressTier::Excellent
        } else if percentage >= 70.0 {
            ProgressTier::Good
        } else if percentage >= 50.0 {
            ProgressTier::Fair
        } else {
            ProgressTier::Poor
        }
    }

    /// Hex colour; fair deliberately reuses the good colour
    pub fn color(&self) -> &'static str {
        match self {
            ProgressTier::Excellent => COLOR_EXCELLENT,
            ProgressTier::Good | ProgressTier::Fair => COLOR_GOOD,
            ProgressTier::Poor => COLOR_POOR,
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            ProgressTier::Excellent => "excellent",
            ProgressTier::Good => "good",
            ProgressTier::Fair => "fair",
            ProgressTier::Poor => "poor",
        }
    }
}

/// Display-ready progress for one metric
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ProgressResult {
    /// Rounded percentage, always within 0..=100
    pub percentage: u8,
    pub tier: ProgressTier,
    pub color: &'static str,
    pub status: &'static str,
}

/// `actual / goal * 100`, or 0 when the goal is zero or not a number
///
/// Uncapped: over-achievement goes past 100 and negative actuals go below 0.
pub fn calculate_percentage(actual: f64, goal: f64) -> f64 {
    if goal == 0.0 || goal.is_nan() {
        return 0.0;
    }
    actual / goal * 100.0
}

/// [`calculate_percentage`] clamped to at most 100 (no lower clamp)
///
/// NaN passes through unclamped so callers never read it as a full bar.
pub fn calculate_percentage_capped(actual: f64, goal: f64) -> f64 {
    let percentage = calculate_percentage(actual, goal);
    if percentage.is_nan() {
        percentage
    } else {
        percentage.min(100.0)
    }
}

pub fn progress_tier(percentage: f64) -> ProgressTier {
    ProgressTier::from_percentage(percentage)
}

pub fn progress_color(percentage: f64) -> &'static str {
    progress_tier(percentage).color()
}

pub fn progress_status(percentage: f64) -> &'static str {
    progress_tier(percentage).status()
}

/// Canonical entry point for displaying progress toward a goal
pub fn calculate_macro_progress(actual: f64, goal: f64) -> ProgressResult {
    let percentage = calculate_percentage_capped(actual, goal).round().max(0.0);
    let tier = progress_tier(percentage);
    ProgressResult {
        percentage: percentage as u8,
        tier,
        color: tier.color(),
        status: tier.status(),
    }
}

/// Capped percentage scaled linearly into `[0, max_width]`
pub fn progress_bar_width(actual: f64, goal: f64, max_width: f64) -> f64 {
    let fraction = calculate_percentage_capped(actual, goal).max(0.0) / 100.0;
    fraction * max_width
}

/// `"{actual}/{goal}"` with both rounded, plus `" {unit}"` when a unit is given
pub fn format_progress_text(actual: f64, goal: f64, unit: &str) -> String {
    let text = format!("{}/{}", actual.round() as i64, goal.round() as i64);
    if unit.is_empty() {
        text
    } else {
        format!("{} {}", text, unit)
    }
}

/// Reached or passed the goal
pub fn is_goal_exceeded(actual: f64, goal: f64) -> bool {
    actual >= goal
}

/// Within `tolerance_percent` of the goal on either side, inclusive
///
/// Overshooting past the band is not "met", even though
/// [`is_goal_exceeded`] holds.
pub fn is_goal_met(actual: f64, goal: f64, tolerance_percent: f64) -> bool {
    let band = tolerance_percent / 100.0;
    let lower = goal * (1.0 - band);
    let upper = goal * (1.0 + band);
    actual >= lower && actual <= upper
}

/// Progress of one tracked metric against its goal
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct MetricProgress {
    pub stat: StatKey,
    pub actual: f64,
    pub goal: f64,
    pub progress: ProgressResult,
    pub met: bool,
    pub exceeded: bool,
}

impl MetricProgress {
    pub fn new(stat: StatKey, actual: f64, goal: f64, tolerance_percent: f64) -> Self {
        Self {
            stat,
            actual,
            goal,
            progress: calculate_macro_progress(actual, goal),
            met: is_goal_met(actual, goal, tolerance_percent),
            exceeded: is_goal_exceeded(actual, goal),
        }
    }
}

/// Per-macro progress for a day's totals
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct MacroProgressReport {
    pub metrics: Vec<MetricProgress>,
}

impl MacroProgressReport {
    pub fn get(&self, stat: StatKey) -> Option<&MetricProgress> {
        self.metrics.iter().find(|m| m.stat == stat)
    }

    /// Every macro inside its tolerance band
    pub fn all_met(&self) -> bool {
        self.metrics.iter().all(|m| m.met)
    }
}

pub fn macro_progress_report(
    totals: &Macros,
    goals: &MacroGoals,
    tolerance_percent: f64,
) -> MacroProgressReport {
    let pairs = [
        (StatKey::Calories, totals.calories, goals.calories),
        (StatKey::Protein, totals.protein, goals.protein),
        (StatKey::Carbs, totals.carbs, goals.carbs),
        (StatKey::Fats, totals.fats, goals.fats),
    ];
    MacroProgressReport {
        metrics: pairs
            .into_iter()
            .map(|(stat, actual, goal)| MetricProgress::new(stat, actual, goal, tolerance_percent))
            .collect(),
    }
}
