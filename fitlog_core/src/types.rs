//! Core domain types for fitlog.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercise definitions and how their quantity is measured
//! - Daily records of logged quantities
//! - The user's body profile
//! - Derived energy estimates

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Exercise Types
// ============================================================================

/// How an exercise's logged quantity turns into time under work
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExerciseKind {
    /// Discrete repeated movements, quantity is a repetition count
    RepetitionBased { seconds_per_rep: f64 },
    /// Continuous steady-pace movement, quantity is kilometers
    DistanceBased { walking_speed_kmh: f64 },
}

impl ExerciseKind {
    pub fn is_distance(&self) -> bool {
        matches!(self, ExerciseKind::DistanceBased { .. })
    }

    /// Seconds per repetition, 0 for distance-based exercises
    pub fn seconds_per_rep(&self) -> f64 {
        match self {
            ExerciseKind::RepetitionBased { seconds_per_rep } => *seconds_per_rep,
            ExerciseKind::DistanceBased { .. } => 0.0,
        }
    }

    /// Unit suffix used when showing a quantity
    pub fn unit(&self) -> &'static str {
        match self {
            ExerciseKind::RepetitionBased { .. } => "reps",
            ExerciseKind::DistanceBased { .. } => "km",
        }
    }
}

/// An exercise the user can log (e.g., "Pushup")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseDefinition {
    pub key: String,
    pub display_name: String,
    /// MET-equivalent metabolic intensity
    pub energy_factor: f64,
    pub kind: ExerciseKind,
}

// ============================================================================
// Record Types
// ============================================================================

/// Quantities logged on one calendar day, keyed by exercise key
///
/// A missing key means nothing was logged for that exercise.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct DailyRecord {
    pub quantities: BTreeMap<String, f64>,
}

impl DailyRecord {
    /// Logged quantity for an exercise, 0 when absent
    pub fn quantity(&self, key: &str) -> f64 {
        self.quantities.get(key).copied().unwrap_or(0.0)
    }

    /// Replace the quantity for an exercise
    pub fn set(&mut self, key: impl Into<String>, quantity: f64) {
        self.quantities.insert(key.into(), quantity);
    }

    /// Builder-style setter, handy for fixtures
    pub fn with(mut self, key: impl Into<String>, quantity: f64) -> Self {
        self.set(key, quantity);
        self
    }
}

/// Snapshot of every persisted record, keyed by calendar date
pub type Records = BTreeMap<NaiveDate, DailyRecord>;

// ============================================================================
// Profile and Estimate Types
// ============================================================================

pub const DEFAULT_WEIGHT_KG: f64 = 86.0;
pub const DEFAULT_HEIGHT_CM: f64 = 178.0;

/// The user's body measurements
///
/// Height is carried for completeness; the energy model only uses weight.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub weight_kg: f64,
    pub height_cm: f64,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            weight_kg: DEFAULT_WEIGHT_KG,
            height_cm: DEFAULT_HEIGHT_CM,
        }
    }
}

/// Energy expenditure derived for one exercise on one day
///
/// Never persisted; recomputed from the record, profile and catalog.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnergyEstimate {
    /// Repetitions or kilometers
    pub quantity: f64,
    pub duration_hours: f64,
    pub base_kcal: f64,
    pub adjusted_kcal: f64,
    pub kcal_per_unit: f64,
    pub adjusted_kcal_per_unit: f64,
    pub fatigue_multiplier: f64,
}

impl EnergyEstimate {
    /// Estimate for nothing logged
    pub fn zero() -> Self {
        Self {
            quantity: 0.0,
            duration_hours: 0.0,
            base_kcal: 0.0,
            adjusted_kcal: 0.0,
            kcal_per_unit: 0.0,
            adjusted_kcal_per_unit: 0.0,
            fatigue_multiplier: 1.0,
        }
    }
}

// ============================================================================
// Catalog Type
// ============================================================================

/// The fixed set of exercises, in display order
#[derive(Clone, Debug)]
pub struct Catalog {
    pub exercises: Vec<ExerciseDefinition>,
}

impl Catalog {
    pub fn get(&self, key: &str) -> Option<&ExerciseDefinition> {
        self.exercises.iter().find(|e| e.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExerciseDefinition> {
        self.exercises.iter()
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// The single distance-based exercise, if the catalog has one
    pub fn distance_exercise(&self) -> Option<&ExerciseDefinition> {
        self.exercises.iter().find(|e| e.kind.is_distance())
    }
}
