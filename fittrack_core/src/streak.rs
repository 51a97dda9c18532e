//! Day-to-day streaks over logged workouts.
//!
//! Which count makes a day "active" depends on the user's [`StreakMetric`]:
//! at least one workout, or at least one exercise.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::validation::{is_valid_date, is_valid_workout};
use crate::{StreakMetric, WorkoutRecord};

/// Totals for one calendar day
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
pub struct DailyActivity {
    pub workouts: u32,
    pub exercises: u32,
}

impl DailyActivity {
    pub fn count(&self, metric: StreakMetric) -> u32 {
        match metric {
            StreakMetric::Workouts => self.workouts,
            StreakMetric::Exercises => self.exercises,
        }
    }
}

/// Roll valid, dated workouts up into per-day totals
///
/// Workouts that fail validation or carry no valid `performed_on` are skipped.
pub fn daily_activity<'a, I>(workouts: I) -> BTreeMap<NaiveDate, DailyActivity>
where
    I: IntoIterator<Item = &'a WorkoutRecord>,
{
    let mut days: BTreeMap<NaiveDate, DailyActivity> = BTreeMap::new();
    let mut skipped = 0;

    for workout in workouts {
        let date = workout
            .performed_on
            .as_deref()
            .filter(|d| is_valid_date(d))
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

        match date {
            Some(date) if is_valid_workout(workout) => {
                let day = days.entry(date).or_default();
                day.workouts = day.workouts.saturating_add(1);
                day.exercises = day.exercises.saturating_add(workout.exercises.unwrap_or(0));
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::debug!("Skipped {} workouts without a valid name, duration or date", skipped);
    }
    days
}

fn is_active(activity: &BTreeMap<NaiveDate, DailyActivity>, day: NaiveDate, metric: StreakMetric) -> bool {
    activity.get(&day).is_some_and(|a| a.count(metric) > 0)
}

/// Consecutive active days ending today
///
/// A day without activity yet doesn't break the streak until it is over,
/// so when `today` is inactive the count ends at yesterday instead.
pub fn current_streak(
    activity: &BTreeMap<NaiveDate, DailyActivity>,
    metric: StreakMetric,
    today: NaiveDate,
) -> u32 {
    let mut day = if is_active(activity, today, metric) {
        Some(today)
    } else {
        today.pred_opt()
    };

    let mut streak = 0;
    while let Some(d) = day.filter(|d| is_active(activity, *d, metric)) {
        streak += 1;
        day = d.pred_opt();
    }
    streak
}

/// Longest run of consecutive active days anywhere in the history
pub fn longest_streak(activity: &BTreeMap<NaiveDate, DailyActivity>, metric: StreakMetric) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for (&date, day) in activity {
        if day.count(metric) == 0 {
            run = 0;
            previous = None;
            continue;
        }
        run = match previous.and_then(|p| p.succ_opt()) {
            Some(expected) if expected == date => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(date);
    }
    longest
}
