//! Energy estimator.
//!
//! Converts one exercise's logged quantity into kilocalories:
//!
//! ```text
//! duration_h = reps * sec_per_rep / 3600      (repetitions)
//! duration_h = km / speed_kmh                 (walking)
//! base_kcal  = MET * weight_kg * duration_h
//! fatigue    = 1 + alpha * ln(1 + reps)       (repetitions only)
//! ```
//!
//! Walking is steady-state work and never gets the fatigue multiplier.
//! Inputs are assumed non-negative and finite; validation happens where
//! values are entered.

use crate::{EnergyEstimate, ExerciseDefinition, ExerciseKind};

/// Operative fatigue constant. The reference table lists 0.06; changing it
/// is a product call, see `[model] fatigue_alpha`.
pub const DEFAULT_FATIGUE_ALPHA: f64 = 0.047;

/// MET for normal-pace walking
pub const WALKING_MET: f64 = 3.5;

pub const DEFAULT_WALKING_SPEED_KMH: f64 = 5.0;

/// Estimator parameters that can be tuned from config
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnergyModel {
    pub fatigue_alpha: f64,
}

impl Default for EnergyModel {
    fn default() -> Self {
        Self {
            fatigue_alpha: DEFAULT_FATIGUE_ALPHA,
        }
    }
}

/// Energy for a repetition-based exercise
pub fn compute_repetition_energy(
    weight_kg: f64,
    repetitions: f64,
    seconds_per_rep: f64,
    energy_factor: f64,
    alpha: f64,
) -> EnergyEstimate {
    if repetitions == 0.0 {
        return EnergyEstimate::zero();
    }

    let duration_hours = repetitions * seconds_per_rep / 3600.0;
    let base_kcal = energy_factor * weight_kg * duration_hours;
    let fatigue_multiplier = 1.0 + alpha * (1.0 + repetitions).ln();
    let adjusted_kcal = base_kcal * fatigue_multiplier;
    let divisor = repetitions.max(1.0);

    EnergyEstimate {
        quantity: repetitions,
        duration_hours,
        base_kcal,
        adjusted_kcal,
        kcal_per_unit: base_kcal / divisor,
        adjusted_kcal_per_unit: adjusted_kcal / divisor,
        fatigue_multiplier,
    }
}

/// Energy for walking `distance_km` at `walking_speed_kmh`
pub fn compute_walking_energy(
    weight_kg: f64,
    distance_km: f64,
    walking_speed_kmh: f64,
) -> EnergyEstimate {
    if distance_km == 0.0 {
        return EnergyEstimate::zero();
    }

    let duration_hours = distance_km / walking_speed_kmh;
    let base_kcal = WALKING_MET * weight_kg * duration_hours;
    let per_km = base_kcal / distance_km;

    EnergyEstimate {
        quantity: distance_km,
        duration_hours,
        base_kcal,
        adjusted_kcal: base_kcal,
        kcal_per_unit: per_km,
        adjusted_kcal_per_unit: per_km,
        fatigue_multiplier: 1.0,
    }
}

/// Estimate one exercise's energy, dispatching on its kind
pub fn estimate(
    exercise: &ExerciseDefinition,
    quantity: f64,
    weight_kg: f64,
    model: &EnergyModel,
) -> EnergyEstimate {
    match exercise.kind {
        ExerciseKind::RepetitionBased { seconds_per_rep } => compute_repetition_energy(
            weight_kg,
            quantity,
            seconds_per_rep,
            exercise.energy_factor,
            model.fatigue_alpha,
        ),
        ExerciseKind::DistanceBased { walking_speed_kmh } => {
            compute_walking_energy(weight_kg, quantity, walking_speed_kmh)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::get_default_catalog;

    const EPS: f64 = 1e-9;

    fn pushups(reps: f64) -> EnergyEstimate {
        compute_repetition_energy(86.0, reps, 2.0, 6.0, DEFAULT_FATIGUE_ALPHA)
    }

    #[test]
    fn test_twenty_pushups() {
        let e = pushups(20.0);
        assert!((e.duration_hours - 20.0 * 2.0 / 3600.0).abs() < EPS);
        assert!((e.base_kcal - 5.733333333).abs() < 1e-6);
        assert!((e.fatigue_multiplier - 1.1430925546).abs() < 1e-6);
        assert!((e.adjusted_kcal - 6.5537306462).abs() < 1e-6);
        assert!((e.kcal_per_unit - e.base_kcal / 20.0).abs() < EPS);
        assert!((e.adjusted_kcal_per_unit - e.adjusted_kcal / 20.0).abs() < EPS);
    }

    #[test]
    fn test_zero_reps_is_all_zero_with_unit_multiplier() {
        let e = pushups(0.0);
        assert_eq!(e.adjusted_kcal, 0.0);
        assert_eq!(e.base_kcal, 0.0);
        assert_eq!(e.duration_hours, 0.0);
        assert_eq!(e.kcal_per_unit, 0.0);
        assert_eq!(e.fatigue_multiplier, 1.0);
    }

    #[test]
    fn test_fatigue_multiplier_strictly_increasing() {
        let mut previous = pushups(1.0).fatigue_multiplier;
        for reps in 2..200 {
            let current = pushups(reps as f64).fatigue_multiplier;
            assert!(current > previous, "not increasing at {} reps", reps);
            previous = current;
        }
    }

    #[test]
    fn test_adjusted_never_below_base() {
        for reps in [1.0, 5.0, 12.0, 50.0, 500.0] {
            let e = pushups(reps);
            assert!(e.adjusted_kcal >= e.base_kcal);
        }
    }

    #[test]
    fn test_two_km_walk() {
        let e = compute_walking_energy(86.0, 2.0, DEFAULT_WALKING_SPEED_KMH);
        assert!((e.duration_hours - 0.4).abs() < EPS);
        assert!((e.base_kcal - 120.4).abs() < 1e-9);
        assert_eq!(e.adjusted_kcal, e.base_kcal);
        assert_eq!(e.fatigue_multiplier, 1.0);
        assert!((e.kcal_per_unit - 60.2).abs() < 1e-9);
    }

    #[test]
    fn test_walking_never_fatigued() {
        for km in [0.1, 1.0, 3.7, 21.1] {
            let e = compute_walking_energy(70.0, km, 5.0);
            assert_eq!(e.adjusted_kcal, e.base_kcal);
        }
    }

    #[test]
    fn test_zero_distance() {
        let e = compute_walking_energy(86.0, 0.0, 5.0);
        assert_eq!(e.adjusted_kcal, 0.0);
        assert_eq!(e.base_kcal, 0.0);
        assert_eq!(e.duration_hours, 0.0);
        assert_eq!(e.kcal_per_unit, 0.0);
        assert_eq!(e.adjusted_kcal_per_unit, 0.0);
        assert_eq!(e.fatigue_multiplier, 1.0);
    }

    #[test]
    fn test_estimate_dispatches_on_kind() {
        let catalog = get_default_catalog();
        let model = EnergyModel::default();

        let walk = estimate(catalog.get("walk").unwrap(), 2.0, 86.0, &model);
        assert!((walk.adjusted_kcal - 120.4).abs() < 1e-9);

        let pushup = estimate(catalog.get("pushup").unwrap(), 20.0, 86.0, &model);
        assert!((pushup.adjusted_kcal - 6.5537306462).abs() < 1e-6);
    }

    #[test]
    fn test_alpha_is_tunable() {
        let model = EnergyModel { fatigue_alpha: 0.06 };
        let pushup = get_default_catalog().get("pushup").unwrap();
        let e = estimate(pushup, 20.0, 86.0, &model);
        assert!((e.fatigue_multiplier - (1.0 + 0.06 * 21f64.ln())).abs() < EPS);
    }
}
