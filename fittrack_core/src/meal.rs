//! Meal classification and macro aggregation.
//!
//! Meals are bucketed by the local hour they were logged at:
//!
//! | category  | hours   |
//! |-----------|---------|
//! | Breakfast | [5, 10) |
//! | Lunch     | [11, 14)|
//! | Snacks    | [14, 17)|
//! | Dinner    | [17, 23)|
//!
//! Hours outside every window (10, and 23 through 4) fall back to Breakfast.

use chrono::{Local, Timelike};
use std::collections::BTreeMap;

use crate::validation::{is_valid_meal, sanitize_input};
use crate::{Error, Macros, Meal, MealCategory, MealRecord, PartialMacros, Result};

const FALLBACK_ICON: &str = "food";
const FALLBACK_EMOJI: &str = "🍽️";
const FALLBACK_SUGGESTED_TIME: &str = "12:00";

impl MealCategory {
    /// Half-open hour window `[start, end)`
    pub fn hour_window(&self) -> (u32, u32) {
        match self {
            MealCategory::Breakfast => (5, 10),
            MealCategory::Lunch => (11, 14),
            MealCategory::Snacks => (14, 17),
            MealCategory::Dinner => (17, 23),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            MealCategory::Breakfast => "coffee",
            MealCategory::Lunch => FALLBACK_ICON,
            MealCategory::Snacks => "food-apple",
            MealCategory::Dinner => "silverware-fork-knife",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            MealCategory::Breakfast => "🍳",
            MealCategory::Lunch => FALLBACK_EMOJI,
            MealCategory::Snacks => "🍎",
            MealCategory::Dinner => "🍲",
        }
    }

    pub fn label(&self) -> &'static str {
        self.as_str()
    }

    /// Suggested clock time, `HH:MM`
    pub fn suggested_time(&self) -> &'static str {
        match self {
            MealCategory::Breakfast => "08:00",
            MealCategory::Lunch => FALLBACK_SUGGESTED_TIME,
            MealCategory::Snacks => "15:30",
            MealCategory::Dinner => "19:00",
        }
    }

    fn position(&self) -> usize {
        match self {
            MealCategory::Breakfast => 0,
            MealCategory::Lunch => 1,
            MealCategory::Snacks => 2,
            MealCategory::Dinner => 3,
        }
    }

    pub fn next(&self) -> MealCategory {
        let all = MealCategory::ALL;
        all[(self.position() + 1) % all.len()]
    }

    pub fn previous(&self) -> MealCategory {
        let all = MealCategory::ALL;
        all[(self.position() + all.len() - 1) % all.len()]
    }
}

/// Category for an hour of the day (0-23)
pub fn meal_type_by_hour(hour: u32) -> MealCategory {
    MealCategory::ALL
        .into_iter()
        .find(|c| {
            let (start, end) = c.hour_window();
            (start..end).contains(&hour)
        })
        .unwrap_or(MealCategory::Breakfast)
}

/// Category for the hour of `at`
///
/// Zoned timestamps are read in their own time zone; naive ones are taken as
/// local wall-clock time.
pub fn meal_type_by_time<T: Timelike>(at: &T) -> MealCategory {
    meal_type_by_hour(at.hour())
}

/// Category for the current local time
pub fn current_meal_type() -> MealCategory {
    meal_type_by_time(&Local::now())
}

pub fn is_valid_meal_type(value: &str) -> bool {
    value.parse::<MealCategory>().is_ok()
}

pub fn meal_type_icon(value: &str) -> &'static str {
    value
        .parse::<MealCategory>()
        .map(|c| c.icon())
        .unwrap_or(FALLBACK_ICON)
}

pub fn meal_type_emoji(value: &str) -> &'static str {
    value
        .parse::<MealCategory>()
        .map(|c| c.emoji())
        .unwrap_or(FALLBACK_EMOJI)
}

pub fn meal_type_suggested_time(value: &str) -> &'static str {
    value
        .parse::<MealCategory>()
        .map(|c| c.suggested_time())
        .unwrap_or(FALLBACK_SUGGESTED_TIME)
}

/// Successor in the cycle; unrecognized input starts the cycle at Breakfast
pub fn next_meal_type(value: &str) -> MealCategory {
    value
        .parse::<MealCategory>()
        .map(|c| c.next())
        .unwrap_or(MealCategory::Breakfast)
}

/// Predecessor in the cycle; unrecognized input resolves to Dinner
pub fn previous_meal_type(value: &str) -> MealCategory {
    value
        .parse::<MealCategory>()
        .map(|c| c.previous())
        .unwrap_or(MealCategory::Dinner)
}

/// Sum macros across meals, counting missing fields as zero
pub fn calculate_meal_macro_totals<'a, I>(meals: I) -> Macros
where
    I: IntoIterator<Item = &'a MealRecord>,
{
    meals.into_iter().fold(Macros::default(), |mut acc, meal| {
        acc.calories += meal.calories.unwrap_or(0.0);
        acc.protein += meal.protein.unwrap_or(0.0);
        acc.carbs += meal.carbs.unwrap_or(0.0);
        acc.fats += meal.fats.unwrap_or(0.0);
        acc
    })
}

/// Round each macro to the nearest integer, missing fields as zero
pub fn format_macro_values(macros: &PartialMacros) -> Macros {
    let round = |v: Option<f64>| v.unwrap_or(0.0).round();
    Macros {
        calories: round(macros.calories),
        protein: round(macros.protein),
        carbs: round(macros.carbs),
        fats: round(macros.fats),
    }
}

/// Bucket meals by category, each bucket in input order
pub fn group_by_category<'a, I>(meals: I) -> BTreeMap<MealCategory, Vec<&'a Meal>>
where
    I: IntoIterator<Item = &'a Meal>,
{
    let mut groups: BTreeMap<MealCategory, Vec<&Meal>> = BTreeMap::new();
    for meal in meals {
        groups.entry(meal.category).or_default().push(meal);
    }
    groups
}

impl TryFrom<MealRecord> for Meal {
    type Error = Error;

    /// Validate a raw record into a meal
    ///
    /// The category is the record's explicit `meal_type` when it names a
    /// canonical category, otherwise it is derived from `logged_at` (or the
    /// current time when the record has no timestamp).
    fn try_from(record: MealRecord) -> Result<Self> {
        let (Some(calories), Some(protein), Some(carbs), Some(fats)) =
            (record.calories, record.protein, record.carbs, record.fats)
        else {
            return Err(invalid_meal(&record));
        };
        if !is_valid_meal(&record) {
            return Err(invalid_meal(&record));
        }

        let category = record
            .meal_type
            .as_deref()
            .and_then(|t| t.parse::<MealCategory>().ok())
            .unwrap_or_else(|| match &record.logged_at {
                Some(at) => meal_type_by_time(at),
                None => current_meal_type(),
            });

        Ok(Meal {
            name: sanitize_input(record.name.as_deref().unwrap_or_default()),
            macros: Macros {
                calories,
                protein,
                carbs,
                fats,
            },
            category,
            logged_at: record.logged_at,
        })
    }
}

fn invalid_meal(record: &MealRecord) -> Error {
    Error::InvalidInput(format!(
        "meal {:?} needs a name and non-negative calories, protein, carbs and fats",
        record.name.as_deref().unwrap_or_default()
    ))
}
