//! Aggregation engine.
//!
//! Folds per-exercise estimates into per-day totals, graph series and
//! month-to-date statistics. Every function here is a pure read over a
//! records snapshot; a date with no record and a record full of zeros are
//! treated the same.

use crate::calendar::{first_of_month, short_day_name, window_ending};
use crate::estimator::{estimate, EnergyModel};
use crate::{Catalog, DailyRecord, EnergyEstimate, ExerciseDefinition, Records, UserProfile};
use chrono::{Duration, NaiveDate};

/// Everything besides the records that an energy total depends on
#[derive(Clone, Copy, Debug)]
pub struct StatsContext<'a> {
    pub catalog: &'a Catalog,
    pub profile: &'a UserProfile,
    pub model: EnergyModel,
}

impl<'a> StatsContext<'a> {
    pub fn new(catalog: &'a Catalog, profile: &'a UserProfile) -> Self {
        Self {
            catalog,
            profile,
            model: EnergyModel::default(),
        }
    }

    pub fn with_model(mut self, model: EnergyModel) -> Self {
        self.model = model;
        self
    }
}

// ============================================================================
// Single day
// ============================================================================

/// One exercise's contribution to a day
#[derive(Clone, Debug)]
pub struct ExerciseEnergy<'a> {
    pub exercise: &'a ExerciseDefinition,
    pub quantity: f64,
    pub estimate: EnergyEstimate,
}

/// Per-exercise rows for one day, in catalog order
#[derive(Clone, Debug)]
pub struct DayBreakdown<'a> {
    pub date: NaiveDate,
    pub rows: Vec<ExerciseEnergy<'a>>,
    pub total_kcal: f64,
}

/// Whether an exercise has a non-zero quantity on a day
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExerciseStatus {
    pub key: String,
    pub done: bool,
}

fn day_total(record: Option<&DailyRecord>, ctx: &StatsContext<'_>) -> f64 {
    let Some(record) = record else {
        return 0.0;
    };

    ctx.catalog
        .iter()
        .map(|exercise| (exercise, record.quantity(&exercise.key)))
        .filter(|(_, quantity)| *quantity > 0.0)
        .map(|(exercise, quantity)| {
            estimate(exercise, quantity, ctx.profile.weight_kg, &ctx.model).adjusted_kcal
        })
        .sum()
}

/// Total adjusted kcal logged on `date`
pub fn daily_total_energy(records: &Records, date: NaiveDate, ctx: &StatsContext<'_>) -> f64 {
    day_total(records.get(&date), ctx)
}

/// Per-exercise estimates for `date`, including exercises with nothing logged
pub fn day_breakdown<'a>(
    records: &Records,
    date: NaiveDate,
    ctx: &StatsContext<'a>,
) -> DayBreakdown<'a> {
    let record = records.get(&date);
    let rows: Vec<_> = ctx
        .catalog
        .iter()
        .map(|exercise| {
            let quantity = record.map_or(0.0, |r| r.quantity(&exercise.key));
            let estimate = if quantity > 0.0 {
                estimate(exercise, quantity, ctx.profile.weight_kg, &ctx.model)
            } else {
                EnergyEstimate::zero()
            };
            ExerciseEnergy {
                exercise,
                quantity,
                estimate,
            }
        })
        .collect();
    let total_kcal = rows.iter().map(|r| r.estimate.adjusted_kcal).sum();

    DayBreakdown {
        date,
        rows,
        total_kcal,
    }
}

/// True when any catalog exercise has a quantity > 0
pub fn has_activity(record: &DailyRecord, catalog: &Catalog) -> bool {
    catalog.iter().any(|e| record.quantity(&e.key) > 0.0)
}

/// Done/not-done for every catalog exercise, in catalog order
pub fn exercise_status(record: Option<&DailyRecord>, catalog: &Catalog) -> Vec<ExerciseStatus> {
    catalog
        .iter()
        .map(|e| ExerciseStatus {
            key: e.key.clone(),
            done: record.is_some_and(|r| r.quantity(&e.key) > 0.0),
        })
        .collect()
}

/// Every catalog exercise logged on this day
pub fn is_fully_complete(record: Option<&DailyRecord>, catalog: &Catalog) -> bool {
    !catalog.is_empty() && exercise_status(record, catalog).iter().all(|s| s.done)
}

// ============================================================================
// Windows
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub total_kcal: f64,
}

impl SeriesPoint {
    pub fn label(&self) -> String {
        short_day_name(self.date)
    }
}

/// Daily totals over a window, oldest first
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Series {
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Largest daily total, never below 1 so it is safe to divide by
    pub fn max_energy(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.total_kcal)
            .fold(1.0, f64::max)
    }

    /// Bar heights normalised so the largest day reaches `scale`
    pub fn bar_heights(&self, scale: f64) -> Vec<f64> {
        let max = self.max_energy();
        self.points
            .iter()
            .map(|p| p.total_kcal / max * scale)
            .collect()
    }
}

/// Daily totals for `window_days` days ending at `end` inclusive
pub fn series_energy(
    records: &Records,
    end: NaiveDate,
    window_days: u32,
    ctx: &StatsContext<'_>,
) -> Series {
    let points = window_ending(end, window_days)
        .into_iter()
        .map(|date| SeriesPoint {
            date,
            total_kcal: daily_total_energy(records, date, ctx),
        })
        .collect();

    Series { points }
}

// ============================================================================
// Month to date
// ============================================================================

/// Consecutive active days ending at `today`, never reaching into last month
///
/// Stops at the first day without activity; an inactive `today` gives 0.
pub fn monthly_streak(records: &Records, today: NaiveDate, catalog: &Catalog) -> u32 {
    let month_start = first_of_month(today);
    let mut streak = 0;
    let mut day = today;

    while day >= month_start {
        match records.get(&day) {
            Some(record) if has_activity(record, catalog) => {
                streak += 1;
                day -= Duration::days(1);
            }
            _ => break,
        }
    }

    streak
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MonthlySummary {
    pub best_day_kcal: f64,
    pub total_kcal: f64,
    /// Raw kilometers of the distance-based exercise
    pub total_distance_km: f64,
}

/// Best day, energy and distance from the 1st of the month through `today`
pub fn monthly_summary(records: &Records, today: NaiveDate, ctx: &StatsContext<'_>) -> MonthlySummary {
    let mut summary = MonthlySummary::default();

    for (_, record) in records.range(first_of_month(today)..=today) {
        let mut day_kcal = 0.0;

        for exercise in ctx.catalog.iter() {
            let quantity = record.quantity(&exercise.key);
            if quantity <= 0.0 {
                continue;
            }
            day_kcal += estimate(exercise, quantity, ctx.profile.weight_kg, &ctx.model).adjusted_kcal;
            if exercise.kind.is_distance() {
                summary.total_distance_km += quantity;
            }
        }

        if day_kcal > 0.0 {
            summary.total_kcal += day_kcal;
            summary.best_day_kcal = summary.best_day_kcal.max(day_kcal);
        }
    }

    tracing::debug!(
        "Monthly summary through {}: best {:.1} kcal, total {:.1} kcal, {:.1} km",
        today,
        summary.best_day_kcal,
        summary.total_kcal,
        summary.total_distance_km
    );

    summary
}
