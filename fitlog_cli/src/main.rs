use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use fitlog_core::aggregate::{day_breakdown, DayBreakdown};
use fitlog_core::calendar::{
    format_long_date, history_days, is_within_history, parse_date_key, resolve_view_date,
    short_day_name, MAX_WINDOW_DAYS,
};
use fitlog_core::*;
use std::path::{Path, PathBuf};

const BAR_WIDTH: f64 = 30.0;

#[derive(Parser)]
#[command(name = "fitlog")]
#[command(about = "Daily exercise log with calorie estimates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use a specific config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true, value_parser = parse_date_arg)]
    today: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a day's exercises, calories and the recent graph (default)
    Day {
        /// Day to show (YYYY-MM-DD), defaults to today
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
    },

    /// Log a quantity (reps, or km for walk) for an exercise
    Log {
        /// Exercise key (see `fitlog exercises`)
        exercise: String,

        /// Repetitions, or kilometers for walking
        #[arg(allow_negative_numbers = true)]
        quantity: f64,

        /// Day to log on (YYYY-MM-DD), defaults to today
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
    },

    /// Graph daily calories over a longer window ending today
    Graph {
        /// Window length in days
        #[arg(long, value_parser = parse_window_arg)]
        days: Option<u32>,
    },

    /// Month-to-date streak, best day, distance and calories
    Stats,

    /// Show or update weight and height
    Profile {
        #[arg(long)]
        weight: Option<f64>,

        #[arg(long)]
        height: Option<f64>,
    },

    /// Export daily records to CSV
    Export {
        #[arg(long)]
        output: PathBuf,

        /// Number of days ending today
        #[arg(long, value_parser = parse_window_arg)]
        days: Option<u32>,
    },

    /// List the exercise catalog
    Exercises,
}

fn parse_date_arg(s: &str) -> std::result::Result<NaiveDate, String> {
    parse_date_key(s).map_err(|e| e.to_string())
}

fn parse_window_arg(s: &str) -> std::result::Result<u32, String> {
    let days: u32 = s.parse().map_err(|e| format!("'{}': {}", s, e))?;
    if days == 0 || days > MAX_WINDOW_DAYS {
        return Err(format!("must be between 1 and {} days", MAX_WINDOW_DAYS));
    }
    Ok(days)
}

fn main() -> Result<()> {
    fitlog_core::logging::init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(dir) = cli.data_dir {
        config.data.data_dir = dir;
    }

    let today = cli
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    tracing::debug!(
        "Using data dir {:?}, today is {}",
        config.data.data_dir,
        today
    );

    let catalog = get_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    match cli.command {
        Some(Commands::Day { date }) => cmd_day(&config, catalog, today, date),
        Some(Commands::Log {
            exercise,
            quantity,
            date,
        }) => cmd_log(&config, catalog, today, &exercise, quantity, date),
        Some(Commands::Graph { days }) => cmd_graph(&config, catalog, today, days),
        Some(Commands::Stats) => cmd_stats(&config, catalog, today),
        Some(Commands::Profile { weight, height }) => cmd_profile(&config, weight, height),
        Some(Commands::Export { output, days }) => {
            cmd_export(&config, catalog, today, &output, days)
        }
        Some(Commands::Exercises) => {
            display_catalog(catalog);
            Ok(())
        }
        None => cmd_day(&config, catalog, today, None),
    }
}

fn cmd_day(
    config: &Config,
    catalog: &Catalog,
    today: NaiveDate,
    date: Option<NaiveDate>,
) -> Result<()> {
    let date = match date {
        Some(requested) => {
            let resolved = resolve_view_date(requested, today, config.history.max_days_back);
            if resolved != requested {
                eprintln!(
                    "{} is outside the last {} days, showing today.",
                    requested, config.history.max_days_back
                );
            }
            resolved
        }
        None => today,
    };
    tracing::debug!("Showing day {}", date);

    let records = JsonFileStore::new(config.records_path()).get_all()?;
    let profile = UserProfile::load(&config.profile_path())?;
    let ctx = StatsContext::new(catalog, &profile).with_model(config.energy_model());

    display_day(&day_breakdown(&records, date, &ctx));
    display_history_days(&history_days(today, config.history.max_days_back), date);

    println!("  Last {} days", config.graph.day_window_days);
    let series = series_energy(&records, date, config.graph.day_window_days, &ctx);
    display_series(&series);

    if is_fully_complete(records.get(&date), catalog) {
        println!("  ★ All exercises done!");
    }
    Ok(())
}

fn cmd_log(
    config: &Config,
    catalog: &Catalog,
    today: NaiveDate,
    exercise: &str,
    quantity: f64,
    date: Option<NaiveDate>,
) -> Result<()> {
    let date = date.unwrap_or(today);
    if !is_within_history(date, today, config.history.max_days_back) {
        tracing::warn!("Refusing to log {} on {}, outside history window", exercise, date);
        return Err(Error::DateOutOfRange(format!(
            "{} is not within the last {} days",
            date, config.history.max_days_back
        )));
    }

    let exercise = exercise.to_lowercase();
    let mut store = JsonFileStore::new(config.records_path());
    let before = store.get(date)?;
    let record = set_quantity(&mut store, catalog, date, &exercise, quantity)?;

    let records = store.get_all()?;
    let profile = UserProfile::load(&config.profile_path())?;
    let ctx = StatsContext::new(catalog, &profile).with_model(config.energy_model());
    let total = daily_total_energy(&records, date, &ctx);

    let kind = catalog
        .get(&exercise)
        .map(|e| e.kind)
        .ok_or_else(|| Error::UnknownExercise(exercise.clone()))?;
    println!(
        "✓ Logged {} {} on {}",
        format_quantity(quantity, &kind),
        exercise,
        date
    );
    println!("  Day total: {} cal", round_kcal(total));

    if !is_fully_complete(before.as_ref(), catalog) && is_fully_complete(Some(&record), catalog) {
        tracing::info!("All exercises complete on {}", date);
        println!();
        println!("  ★ All {} exercises done! Great work!", catalog.len());
    }
    Ok(())
}

fn cmd_graph(config: &Config, catalog: &Catalog, today: NaiveDate, days: Option<u32>) -> Result<()> {
    let days = days.unwrap_or(config.graph.detail_window_days);
    tracing::debug!("Graphing {} days ending {}", days, today);

    let records = JsonFileStore::new(config.records_path()).get_all()?;
    let profile = UserProfile::load(&config.profile_path())?;
    let ctx = StatsContext::new(catalog, &profile).with_model(config.energy_model());

    println!("\n  Last {} days", days);
    display_series(&series_energy(&records, today, days, &ctx));
    Ok(())
}

fn cmd_stats(config: &Config, catalog: &Catalog, today: NaiveDate) -> Result<()> {
    let records = JsonFileStore::new(config.records_path()).get_all()?;
    let profile = UserProfile::load(&config.profile_path())?;
    let ctx = StatsContext::new(catalog, &profile).with_model(config.energy_model());

    let streak = monthly_streak(&records, today, catalog);
    let summary = monthly_summary(&records, today, &ctx);
    tracing::debug!(
        "Month to date: streak {}, best {:.2} kcal, total {:.2} kcal",
        streak,
        summary.best_day_kcal,
        summary.total_kcal
    );

    println!("\n  THIS MONTH");
    println!(
        "  Streak:    {} DAY{}",
        streak,
        if streak == 1 { "" } else { "S" }
    );
    println!("  Best day:  {} CAL", round_kcal(summary.best_day_kcal));
    println!(
        "  Distance:  {:.1} KM",
        (summary.total_distance_km * 10.0).round() / 10.0
    );
    println!("  Calories:  {} CAL", round_kcal(summary.total_kcal));
    println!();
    Ok(())
}

fn cmd_profile(config: &Config, weight: Option<f64>, height: Option<f64>) -> Result<()> {
    let path = config.profile_path();
    let profile = if weight.is_none() && height.is_none() {
        UserProfile::load(&path)?
    } else {
        let updated = UserProfile::update(&path, |p| {
            if let Some(w) = weight {
                p.weight_kg = w;
            }
            if let Some(h) = height {
                p.height_cm = h;
            }
            Ok(())
        })?;
        tracing::info!(
            "Profile updated: {} kg, {} cm",
            updated.weight_kg,
            updated.height_cm
        );
        println!("✓ Profile saved");
        updated
    };

    println!("  Weight: {} kg", profile.weight_kg);
    println!("  Height: {} cm", profile.height_cm);
    Ok(())
}

fn cmd_export(
    config: &Config,
    catalog: &Catalog,
    today: NaiveDate,
    output: &Path,
    days: Option<u32>,
) -> Result<()> {
    let days = days.unwrap_or(config.graph.detail_window_days);
    let records = JsonFileStore::new(config.records_path()).get_all()?;
    let profile = UserProfile::load(&config.profile_path())?;
    let ctx = StatsContext::new(catalog, &profile).with_model(config.energy_model());

    let rows = export_csv(&records, today, days, &ctx, output)?;
    tracing::info!("Exported {} days ending {} to {:?}", rows, today, output);
    println!("✓ Exported {} days to {}", rows, output.display());
    Ok(())
}

fn round_kcal(kcal: f64) -> i64 {
    kcal.round() as i64
}

fn format_quantity(quantity: f64, kind: &ExerciseKind) -> String {
    if quantity <= 0.0 {
        return "0".into();
    }
    match kind {
        ExerciseKind::DistanceBased { .. } => format!("{}KM", quantity),
        ExerciseKind::RepetitionBased { .. } => format!("{}", quantity),
    }
}

fn display_day(day: &DayBreakdown<'_>) {
    let (day_name, date_text) = format_long_date(day.date);
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}  {}", day_name, date_text);
    println!("╰─────────────────────────────────────────╯");
    println!();

    for row in &day.rows {
        println!(
            "  {:<12} {:>8}  {:>5} cal",
            row.exercise.display_name,
            format_quantity(row.quantity, &row.exercise.kind),
            round_kcal(row.estimate.adjusted_kcal)
        );
    }

    println!();
    println!("  Total: {} cal", round_kcal(day.total_kcal));
    println!();
}

/// One line of the days the view can move between, the shown day bracketed
fn display_history_days(days: &[NaiveDate], shown: NaiveDate) {
    let labels: Vec<String> = days
        .iter()
        .map(|&day| {
            let label = format!("{} {}", short_day_name(day), day.day());
            if day == shown {
                format!("[{}]", label)
            } else {
                label
            }
        })
        .collect();
    println!("  {}", labels.join("  "));
    println!();
}

fn display_series(series: &Series) {
    let heights = series.bar_heights(BAR_WIDTH);
    for (point, height) in series.points.iter().zip(heights) {
        println!(
            "  {} {} {:<width$} {}",
            point.date.format("%m-%d"),
            point.label(),
            "█".repeat(height.round() as usize),
            round_kcal(point.total_kcal),
            width = BAR_WIDTH as usize
        );
    }
    println!();
}

fn display_catalog(catalog: &Catalog) {
    println!();
    for exercise in catalog.iter() {
        let detail = match exercise.kind {
            ExerciseKind::RepetitionBased { seconds_per_rep } => {
                format!("{} s/rep", seconds_per_rep)
            }
            ExerciseKind::DistanceBased { walking_speed_kmh } => {
                format!("km at {} km/h", walking_speed_kmh)
            }
        };
        println!(
            "  {:<10} {:<12} MET {:<4} {}",
            exercise.key, exercise.display_name, exercise.energy_factor, detail
        );
    }
    println!();
}
