//! Default catalog of exercises.
//!
//! Five exercises: four repetition-based movements and walking, the only
//! distance-based one.

use crate::estimator::{DEFAULT_WALKING_SPEED_KMH, WALKING_MET};
use crate::types::*;
use once_cell::sync::Lazy;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

fn repetition(key: &str, name: &str, energy_factor: f64, seconds_per_rep: f64) -> ExerciseDefinition {
    ExerciseDefinition {
        key: key.into(),
        display_name: name.into(),
        energy_factor,
        kind: ExerciseKind::RepetitionBased { seconds_per_rep },
    }
}

/// Builds the default catalog
///
/// **Note**: prefer `get_default_catalog()` which returns the cached
/// reference. This is kept for tests and custom catalogs.
pub fn build_default_catalog() -> Catalog {
    let exercises = vec![
        repetition("pushup", "PUSHUP", 6.0, 2.0),
        repetition("pullup", "PULLUP", 7.0, 3.0),
        repetition("situp", "SITUP", 2.8, 2.0),
        repetition("bicepcurl", "BICEP CURL", 3.5, 3.0),
        ExerciseDefinition {
            key: "walk".into(),
            display_name: "WALK".into(),
            energy_factor: WALKING_MET,
            kind: ExerciseKind::DistanceBased {
                walking_speed_kmh: DEFAULT_WALKING_SPEED_KMH,
            },
        },
    ];

    Catalog { exercises }
}

impl Catalog {
    /// Validate the catalog for consistency
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (i, exercise) in self.exercises.iter().enumerate() {
            if exercise.key.is_empty() {
                errors.push(format!("Exercise #{} has empty key", i));
            }
            if exercise.display_name.is_empty() {
                errors.push(format!("Exercise '{}' has empty name", exercise.key));
            }
            if self.exercises[..i].iter().any(|e| e.key == exercise.key) {
                errors.push(format!("Duplicate exercise key '{}'", exercise.key));
            }
            if !(exercise.energy_factor > 0.0 && exercise.energy_factor.is_finite()) {
                errors.push(format!(
                    "Exercise '{}': energy factor {} must be positive",
                    exercise.key, exercise.energy_factor
                ));
            }

            match exercise.kind {
                ExerciseKind::RepetitionBased { seconds_per_rep } => {
                    if !(seconds_per_rep > 0.0 && seconds_per_rep.is_finite()) {
                        errors.push(format!(
                            "Exercise '{}': seconds per rep {} must be positive",
                            exercise.key, seconds_per_rep
                        ));
                    }
                }
                ExerciseKind::DistanceBased { walking_speed_kmh } => {
                    if !(walking_speed_kmh > 0.0 && walking_speed_kmh.is_finite()) {
                        errors.push(format!(
                            "Exercise '{}': walking speed {} must be positive",
                            exercise.key, walking_speed_kmh
                        ));
                    }
                }
            }
        }

        let distance_count = self.exercises.iter().filter(|e| e.kind.is_distance()).count();
        if distance_count != 1 {
            errors.push(format!(
                "Catalog must have exactly one distance-based exercise, found {}",
                distance_count
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_loads() {
        let catalog = build_default_catalog();
        assert_eq!(catalog.len(), 5);
        let keys: Vec<_> = catalog.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["pushup", "pullup", "situp", "bicepcurl", "walk"]);
    }

    #[test]
    fn test_walk_is_the_only_distance_exercise() {
        let catalog = build_default_catalog();
        let walk = catalog.distance_exercise().unwrap();
        assert_eq!(walk.key, "walk");
        assert_eq!(walk.kind.seconds_per_rep(), 0.0);

        for exercise in catalog.iter().filter(|e| e.key != "walk") {
            assert!(!exercise.kind.is_distance());
            assert!(exercise.kind.seconds_per_rep() > 0.0);
        }
    }

    #[test]
    fn test_pushup_constants() {
        let pushup = get_default_catalog().get("pushup").unwrap();
        assert_eq!(pushup.energy_factor, 6.0);
        assert_eq!(pushup.kind.seconds_per_rep(), 2.0);
    }

    #[test]
    fn test_default_catalog_validates() {
        let errors = build_default_catalog().validate();
        assert!(
            errors.is_empty(),
            "Default catalog has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_second_distance_exercise_rejected() {
        let mut catalog = build_default_catalog();
        let mut run = catalog.get("walk").unwrap().clone();
        run.key = "run".into();
        catalog.exercises.push(run);

        let errors = catalog.validate();
        assert!(errors.iter().any(|e| e.contains("exactly one distance-based")));
    }

    #[test]
    fn test_zero_seconds_per_rep_rejected() {
        let mut catalog = build_default_catalog();
        catalog.exercises[0].kind = ExerciseKind::RepetitionBased {
            seconds_per_rep: 0.0,
        };

        let errors = catalog.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("pushup"));
    }
}
