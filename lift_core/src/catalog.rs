//! Default catalog of workout programs.
//!
//! The built-in catalog is a four-day split (two upper, two lower days
//! per week). Programs are kept in registration order so listings and
//! tie-breaking stay deterministic.

use crate::error::{Error, Result};
use crate::types::*;
use once_cell::sync::Lazy;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<ProgramCatalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static ProgramCatalog {
    &DEFAULT_CATALOG
}

/// Static registry of program definitions, in registration order.
#[derive(Clone, Debug, Default)]
pub struct ProgramCatalog {
    programs: Vec<ProgramDefinition>,
}

impl ProgramCatalog {
    pub fn new(programs: Vec<ProgramDefinition>) -> Self {
        Self { programs }
    }

    /// Look up a program by key.
    pub fn lookup(&self, key: &str) -> Result<&ProgramDefinition> {
        self.programs
            .iter()
            .find(|p| p.key == key)
            .ok_or_else(|| Error::NotFound(format!("program '{}'", key)))
    }

    /// All programs, in registration order.
    pub fn list(&self) -> &[ProgramDefinition] {
        &self.programs
    }

    /// Registration-ordered program keys. This ordering doubles as the
    /// fixed priority used to break ties in workout recommendations.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.programs.iter().map(|p| p.key.as_str())
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let mut seen_keys = std::collections::HashSet::new();
        for program in &self.programs {
            if program.key.is_empty() {
                errors.push("Program has empty key".to_string());
            }
            if !seen_keys.insert(program.key.as_str()) {
                errors.push(format!("Duplicate program key '{}'", program.key));
            }
            if program.name.is_empty() {
                errors.push(format!("Program '{}' has empty name", program.key));
            }
            if program.exercises.is_empty() {
                errors.push(format!("Program '{}' has no exercises", program.key));
            }

            let mut seen_ids = std::collections::HashSet::new();
            for exercise in &program.exercises {
                if exercise.id.is_empty() {
                    errors.push(format!(
                        "Program '{}' contains an exercise with empty id",
                        program.key
                    ));
                }
                if !seen_ids.insert(exercise.id.as_str()) {
                    errors.push(format!(
                        "Program '{}' repeats exercise '{}'",
                        program.key, exercise.id
                    ));
                }
                if exercise.name.is_empty() {
                    errors.push(format!("Exercise '{}' has empty name", exercise.id));
                }
                if exercise.sets == 0 {
                    errors.push(format!("Exercise '{}' prescribes zero sets", exercise.id));
                }
                if exercise.target_min() > exercise.target_max() {
                    errors.push(format!(
                        "Exercise '{}': target rep min {} > max {}",
                        exercise.id,
                        exercise.target_min(),
                        exercise.target_max()
                    ));
                }
                if exercise.target_min() == 0 {
                    errors.push(format!("Exercise '{}': target rep min is zero", exercise.id));
                }
            }
        }

        errors
    }
}

/// Conservative built-in starting weight for an exercise, used when the
/// lifter supplied no baseline. Bodyweight movements start at zero;
/// unknown ids fall back to an empty bar.
pub fn default_starting_weight(exercise_id: &str) -> f64 {
    match exercise_id {
        "bench" => 95.0,
        "ohp" => 65.0,
        "incline" => 50.0,
        "lateral" => 15.0,
        "dips" => 0.0, // bodyweight
        "deadlift" => 135.0,
        "bbrow" => 75.0,
        "pullups" => 0.0, // bodyweight
        "cablerow" => 60.0,
        "curls" => 25.0,
        "squat" => 115.0,
        "rdl" => 95.0,
        "bss" => 25.0,
        "gobletsquat" => 35.0,
        "calves" => 50.0,
        "tricepext" => 30.0,
        "hipthrust" => 95.0,
        "hamcurl" => 40.0,
        "sldl" => 85.0,
        "glutebridge" => 0.0, // bodyweight
        _ => 45.0,
    }
}

fn exercise(
    id: &str,
    name: &str,
    sets: u32,
    target_reps: [u32; 2],
    rest_seconds: u32,
    class: MovementClass,
) -> ExerciseDefinition {
    ExerciseDefinition {
        id: id.into(),
        name: name.into(),
        sets,
        target_reps,
        rest_seconds,
        class,
    }
}

/// Builds the default four-day split catalog
///
/// **Note**: For production use, prefer `get_default_catalog()` which
/// returns a cached reference. This function is retained for testing
/// and custom catalog creation.
pub fn build_default_catalog() -> ProgramCatalog {
    use MovementClass::{Compound, Isolation};

    let programs = vec![
        ProgramDefinition {
            key: "upper1".into(),
            name: "Upper 1".into(),
            description: "Chest, Back, Shoulders".into(),
            exercises: vec![
                exercise("bench", "Bench Press", 3, [6, 8], 150, Compound),
                exercise("bbrow", "Barbell Rows", 3, [6, 8], 150, Compound),
                exercise("ohp", "Overhead Press", 3, [8, 10], 120, Compound),
                exercise("pullups", "Pull-ups/Lat Pulldowns", 3, [8, 12], 90, Compound),
                exercise("dips", "Dips", 3, [10, 15], 90, Compound),
            ],
        },
        ProgramDefinition {
            key: "lower1".into(),
            name: "Lower 1".into(),
            description: "Quads, Glutes, Calves".into(),
            exercises: vec![
                exercise("squat", "Squat", 4, [6, 8], 150, Compound),
                exercise("rdl", "Romanian Deadlift", 3, [8, 10], 120, Compound),
                exercise("bss", "Bulgarian Split Squats", 3, [10, 12], 90, Compound),
                exercise("gobletsquat", "Goblet Squats", 3, [12, 15], 90, Compound),
                exercise("calves", "Calf Raises", 4, [15, 20], 60, Isolation),
            ],
        },
        ProgramDefinition {
            key: "upper2".into(),
            name: "Upper 2".into(),
            description: "Arms, Shoulders, Back".into(),
            exercises: vec![
                exercise("incline", "Incline Dumbbell Press", 3, [8, 12], 120, Compound),
                exercise("cablerow", "Cable Rows", 3, [10, 12], 90, Isolation),
                exercise("lateral", "Lateral Raises", 3, [12, 15], 60, Isolation),
                exercise("curls", "Barbell Curls", 3, [10, 12], 60, Isolation),
                exercise("tricepext", "Tricep Extensions", 3, [10, 12], 60, Isolation),
            ],
        },
        ProgramDefinition {
            key: "lower2".into(),
            name: "Lower 2".into(),
            description: "Hamstrings, Glutes, Posterior".into(),
            exercises: vec![
                exercise("deadlift", "Deadlift", 4, [5, 6], 180, Compound),
                exercise("hipthrust", "Hip Thrusts", 3, [8, 12], 90, Compound),
                exercise("hamcurl", "Hamstring Curls", 3, [12, 15], 60, Isolation),
                exercise("sldl", "Stiff Leg Deadlift", 3, [10, 12], 90, Compound),
                exercise("glutebridge", "Single-Leg Glute Bridge", 3, [12, 15], 60, Isolation),
            ],
        },
    ];

    ProgramCatalog::new(programs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_loads() {
        let catalog = build_default_catalog();
        assert_eq!(catalog.list().len(), 4);
    }

    #[test]
    fn test_registration_order() {
        let catalog = build_default_catalog();
        let keys: Vec<_> = catalog.keys().collect();
        assert_eq!(keys, vec!["upper1", "lower1", "upper2", "lower2"]);
    }

    #[test]
    fn test_lookup_known_program() {
        let catalog = build_default_catalog();
        let program = catalog.lookup("lower1").unwrap();
        assert_eq!(program.name, "Lower 1");
        assert_eq!(program.exercises.len(), 5);
        assert_eq!(program.exercises[0].sets, 4);
    }

    #[test]
    fn test_lookup_unknown_program_fails() {
        let catalog = build_default_catalog();
        let err = catalog.lookup("push_day").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_default_catalog_validates() {
        let catalog = build_default_catalog();
        let errors = catalog.validate();
        assert!(
            errors.is_empty(),
            "Default catalog has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_validate_flags_bad_rep_range() {
        let catalog = ProgramCatalog::new(vec![ProgramDefinition {
            key: "bad".into(),
            name: "Bad".into(),
            description: String::new(),
            exercises: vec![exercise(
                "x",
                "X",
                3,
                [10, 8],
                60,
                MovementClass::Compound,
            )],
        }]);
        let errors = catalog.validate();
        assert!(errors.iter().any(|e| e.contains("min 10 > max 8")));
    }

    #[test]
    fn test_bodyweight_defaults_are_zero() {
        assert_eq!(default_starting_weight("dips"), 0.0);
        assert_eq!(default_starting_weight("pullups"), 0.0);
        assert_eq!(default_starting_weight("glutebridge"), 0.0);
    }

    #[test]
    fn test_unknown_exercise_falls_back_to_bar() {
        assert_eq!(default_starting_weight("mystery_lift"), 45.0);
    }
}
