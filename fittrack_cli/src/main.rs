use chrono::{Local, NaiveDate};
use clap::{ArgAction, Parser, Subcommand};
use fittrack_core::meal::{current_meal_type, meal_type_by_hour};
use fittrack_core::progress::{
    calculate_macro_progress, format_progress_text, is_goal_exceeded, is_goal_met,
    progress_bar_width, MetricProgress,
};
use fittrack_core::streak::longest_streak;
use fittrack_core::validation::{is_valid_date, is_valid_number, is_valid_number_min};
use fittrack_core::*;
use std::path::PathBuf;

mod import;
mod store;

use store::JsonFileBackend;

#[derive(Parser)]
#[command(name = "fittrack")]
#[command(about = "Fitness progress and goal tracking", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Keep preferences in memory only; nothing is read from or written to disk
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Show progress of an actual value toward a goal
    #[command(allow_negative_numbers = true)]
    Progress {
        actual: f64,
        goal: f64,

        /// Unit appended to the progress text (e.g. g, kcal)
        #[arg(long, default_value = "")]
        unit: String,

        /// Tolerance band in percent (defaults to the configured value)
        #[arg(long)]
        tolerance: Option<f64>,
    },

    /// Show the meal category for an hour (default: now)
    MealType {
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
        hour: Option<u32>,
    },

    /// Summarize a day's meals (and optionally workouts) against your goals
    Summary {
        /// Meal log CSV
        #[arg(long)]
        meals: PathBuf,

        /// Workout log CSV, used for workout counts and streaks
        #[arg(long)]
        workouts: Option<PathBuf>,

        /// Day to summarize, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// View or change which stats are shown
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
}

#[derive(Subcommand)]
enum PrefsAction {
    /// List every stat and whether it is shown
    List,
    /// Show a hidden stat or hide a shown one
    Toggle { stat: String },
    /// Choose what counts toward streaks (workouts, exercises)
    Streak { metric: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    fittrack_core::logging::init(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());

    if cli.ephemeral {
        let store = GoalPreferenceStore::new(MemoryBackend::seeded());
        run(cli.command, store, &config).await
    } else {
        let store = GoalPreferenceStore::new(JsonFileBackend::new(data_dir.join("settings.json")));
        run(cli.command, store, &config).await
    }
}

async fn run<B: PreferenceBackend>(
    command: Commands,
    store: GoalPreferenceStore<B>,
    config: &Config,
) -> Result<()> {
    match command {
        Commands::Progress {
            actual,
            goal,
            unit,
            tolerance,
        } => cmd_progress(actual, goal, &unit, tolerance, config),
        Commands::MealType { hour } => {
            cmd_meal_type(hour);
            Ok(())
        }
        Commands::Summary {
            meals,
            workouts,
            date,
        } => cmd_summary(store, meals, workouts, date, config).await,
        Commands::Prefs { action } => cmd_prefs(store, action).await,
    }
}

fn cmd_progress(
    actual: f64,
    goal: f64,
    unit: &str,
    tolerance: Option<f64>,
    config: &Config,
) -> Result<()> {
    for (label, value) in [("actual", actual), ("goal", goal)] {
        if !is_valid_number_min(value, f64::MIN) || !value.is_finite() {
            return Err(Error::InvalidInput(format!(
                "{} must be a finite number, got {}",
                label, value
            )));
        }
    }

    let tolerance = tolerance.unwrap_or(config.progress.tolerance_percent);
    if !is_valid_number(tolerance) {
        return Err(Error::InvalidInput(format!(
            "tolerance must be >= 0, got {}",
            tolerance
        )));
    }

    let progress = calculate_macro_progress(actual, goal);
    println!("{}", format_progress_text(actual, goal, unit));
    println!("Progress: {}% ({})", progress.percentage, progress.status);
    println!("{}", render_bar(actual, goal, config.progress.bar_width));
    println!(
        "Goal met: {} (±{}%)",
        yes_no(is_goal_met(actual, goal, tolerance)),
        tolerance
    );
    println!("Goal exceeded: {}", yes_no(is_goal_exceeded(actual, goal)));
    Ok(())
}

fn cmd_meal_type(hour: Option<u32>) {
    let category = match hour {
        Some(h) => meal_type_by_hour(h),
        None => current_meal_type(),
    };

    println!("{} {}", category.emoji(), category.label());
    println!("  Icon: {}", category.icon());
    println!("  Suggested time: {}", category.suggested_time());
    println!("  Next: {}", category.next());
    println!("  Previous: {}", category.previous());
}

async fn cmd_summary<B: PreferenceBackend>(
    mut store: GoalPreferenceStore<B>,
    meals_path: PathBuf,
    workouts_path: Option<PathBuf>,
    date: Option<String>,
    config: &Config,
) -> Result<()> {
    let day = match date {
        Some(d) if is_valid_date(&d) => NaiveDate::parse_from_str(&d, "%Y-%m-%d")
            .map_err(|e| Error::InvalidInput(format!("invalid date '{}': {}", d, e)))?,
        Some(d) => {
            return Err(Error::InvalidInput(format!(
                "date must be YYYY-MM-DD, got '{}'",
                d
            )))
        }
        None => Local::now().date_naive(),
    };

    store.load().await?;

    // Only meals logged on the requested day count toward its totals
    let records: Vec<MealRecord> = import::load_meals(&meals_path)?
        .into_iter()
        .filter(|r| r.logged_at.is_some_and(|at| at.date() == day))
        .collect();

    let mut meals = Vec::new();
    let mut valid_records = Vec::new();
    for record in records {
        match Meal::try_from(record.clone()) {
            Ok(meal) => {
                meals.push(meal);
                valid_records.push(record);
            }
            Err(e) => tracing::warn!("Skipping meal: {}", e),
        }
    }
    let totals = calculate_meal_macro_totals(&valid_records);
    let report = macro_progress_report(&totals, &config.goals, config.progress.tolerance_percent);

    println!("Summary for {}", day);
    println!();
    for metric in report.metrics.iter().filter(|m| store.is_enabled(m.stat)) {
        print_metric(metric, config.progress.bar_width);
    }

    println!();
    if meals.is_empty() {
        println!("No meals logged.");
    }
    for (category, group) in group_by_category(&meals) {
        let names: Vec<&str> = group.iter().map(|m| m.name.as_str()).collect();
        println!(
            "{} {} ({}): {}",
            category.emoji(),
            category,
            group.len(),
            names.join(", ")
        );
    }

    if let Some(path) = workouts_path {
        let workouts = import::load_workouts(&path)?;
        let activity = daily_activity(&workouts);
        let today = activity.get(&day).copied().unwrap_or_default();

        println!();
        if store.is_enabled(StatKey::Workouts) {
            println!("Workouts: {}", today.workouts);
        }
        if store.is_enabled(StatKey::Exercises) {
            println!("Exercises: {}", today.exercises);
        }
        if store.is_enabled(StatKey::Streak) {
            let metric = store.streak_metric();
            println!(
                "Streak ({}): {} days, best {}",
                metric,
                current_streak(&activity, metric, day),
                longest_streak(&activity, metric)
            );
        }
    }

    Ok(())
}

async fn cmd_prefs<B: PreferenceBackend>(
    mut store: GoalPreferenceStore<B>,
    action: PrefsAction,
) -> Result<()> {
    store.load().await?;
    store.subscribe(|snapshot| {
        tracing::info!(
            "Settings changed: streak metric {}, {} stats shown",
            snapshot.streak_metric,
            snapshot.enabled_stats.len()
        );
    });

    match action {
        PrefsAction::List => {
            for stat in StatKey::ALL {
                let mark = if store.is_enabled(stat) { "x" } else { " " };
                println!("[{}] {}", mark, stat);
            }
            println!("Streak metric: {}", store.streak_metric());
        }
        PrefsAction::Toggle { stat } => {
            let stat: StatKey = stat.parse()?;
            let shown = store.toggle(stat, store.is_enabled(stat)).await?;
            println!("✓ {} {}", stat, if shown { "shown" } else { "hidden" });
        }
        PrefsAction::Streak { metric } => {
            store.set_streak_metric(&metric).await?;
            println!("✓ Streak metric set to {}", store.streak_metric());
        }
    }

    Ok(())
}

fn print_metric(metric: &MetricProgress, bar_width: f64) {
    let unit = if metric.stat == StatKey::Calories { "kcal" } else { "g" };
    println!(
        "  {:<9} {:<16} {} {:>3}% {:<9} {}",
        capitalize(metric.stat.as_str()),
        format_progress_text(metric.actual, metric.goal, unit),
        render_bar(metric.actual, metric.goal, bar_width),
        metric.progress.percentage,
        metric.progress.status,
        if metric.met { "✓ met" } else { "" }
    );
}

fn render_bar(actual: f64, goal: f64, bar_width: f64) -> String {
    let total = bar_width.round() as usize;
    let filled = (progress_bar_width(actual, goal, bar_width).round() as usize).min(total);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(total - filled))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
