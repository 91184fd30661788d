//! Core domain types for the liftlog system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercises and programs
//! - Set records and per-exercise session state
//! - Session status and history entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

// ============================================================================
// Exercise and Program Types
// ============================================================================

/// Movement class of an exercise, used to pick a percentage band
/// when adjusting weight (compounds move in smaller steps).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MovementClass {
    Compound,
    Isolation,
}

/// An exercise definition (e.g., "Bench Press"), immutable after startup.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseDefinition {
    pub id: String,
    pub name: String,
    /// Number of working sets prescribed per session.
    pub sets: u32,
    /// Target rep range `[min, max]`.
    pub target_reps: [u32; 2],
    /// Prescribed rest between sets, in seconds.
    pub rest_seconds: u32,
    pub class: MovementClass,
}

impl ExerciseDefinition {
    pub fn target_min(&self) -> u32 {
        self.target_reps[0]
    }

    pub fn target_max(&self) -> u32 {
        self.target_reps[1]
    }

    pub fn is_compound(&self) -> bool {
        self.class == MovementClass::Compound
    }
}

/// An ordered sequence of exercises making up one workout day.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgramDefinition {
    pub key: String,
    pub name: String,
    pub description: String,
    pub exercises: Vec<ExerciseDefinition>,
}

// ============================================================================
// Session Types
// ============================================================================

/// One performed set. The target rep range is snapshotted at the time
/// the set was performed and never recomputed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SetRecord {
    pub weight: f64,
    pub reps: u32,
    #[serde(rename = "targetReps")]
    pub target_reps: [u32; 2],
}

/// How the starting weight for an exercise compares to the prior session.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionDirection {
    Increased,
    Decreased,
    Maintained,
    /// No prior session for this exercise.
    New,
}

/// A within-session weight change applied after a recorded set.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeightChange {
    pub direction: ProgressionDirection,
    /// Absolute size of the change, already rounded to the quantum.
    pub amount: f64,
    /// True when the increase percentage was doubled because the set
    /// overshot the rep ceiling.
    pub doubled: bool,
}

/// Transient per-exercise state while a session is in progress.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseSessionState {
    /// Weight prescribed for the next set of this exercise.
    pub target_weight: f64,
    /// Sets recorded so far, oldest first. Length never exceeds the
    /// exercise's set count.
    pub sets: Vec<SetRecord>,
    /// Set when the lifter overrode the prescribed weight by hand.
    pub manually_adjusted: bool,
    /// First-set weight of the most recent prior session, if any.
    pub last_weight: Option<f64>,
    /// How the starting weight compares to `last_weight`.
    pub progression: ProgressionDirection,
    /// Most recent in-session adjustment, if one fired.
    pub last_change: Option<WeightChange>,
}

/// Lifecycle of a workout session.
///
/// `NotStarted → InProgress → {Complete, Ended}`; both `Complete` and
/// `Ended` are terminal.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    NotStarted,
    InProgress,
    /// Every exercise has exactly its prescribed number of sets recorded.
    Complete,
    /// Aborted via `end`.
    Ended,
}

// ============================================================================
// History Types
// ============================================================================

/// Finalized per-exercise result stored in history.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseHistory {
    #[serde(rename = "targetWeight")]
    pub target_weight: f64,
    pub sets: Vec<SetRecord>,
}

/// A finished (or aborted-with-save) workout session. Immutable once
/// created; owned by the history store after hand-off.
///
/// Field names follow the persisted wire shape:
/// `{ date, workoutType, exercises: { id: { targetWeight, sets } } }`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutHistoryEntry {
    pub id: Uuid,
    #[serde(rename = "date")]
    pub completed_at: DateTime<Utc>,
    #[serde(rename = "workoutType")]
    pub program_key: String,
    pub exercises: HashMap<String, ExerciseHistory>,
}

impl WorkoutHistoryEntry {
    /// Total number of sets recorded across all exercises.
    pub fn total_sets(&self) -> usize {
        self.exercises.values().map(|e| e.sets.len()).sum()
    }
}

/// Lifter-supplied starting weights, keyed by exercise id. Used only
/// when no prior session history exists for an exercise.
pub type BaselineWeights = HashMap<String, f64>;

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> WorkoutHistoryEntry {
        let mut exercises = HashMap::new();
        exercises.insert(
            "bench".to_string(),
            ExerciseHistory {
                target_weight: 100.0,
                sets: vec![
                    SetRecord {
                        weight: 95.0,
                        reps: 8,
                        target_reps: [6, 8],
                    },
                    SetRecord {
                        weight: 100.0,
                        reps: 7,
                        target_reps: [6, 8],
                    },
                ],
            },
        );
        WorkoutHistoryEntry {
            id: Uuid::new_v4(),
            completed_at: Utc::now(),
            program_key: "upper1".into(),
            exercises,
        }
    }

    #[test]
    fn test_history_entry_roundtrip() {
        let entry = sample_entry();
        let json = serde_json::to_string(&entry).unwrap();
        let reloaded: WorkoutHistoryEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, reloaded);
    }

    #[test]
    fn test_history_entry_wire_shape() {
        let entry = sample_entry();
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"date\""));
        assert!(json.contains("\"workoutType\":\"upper1\""));
        assert!(json.contains("\"targetWeight\""));
        assert!(json.contains("\"targetReps\":[6,8]"));
    }

    #[test]
    fn test_total_sets() {
        let entry = sample_entry();
        assert_eq!(entry.total_sets(), 2);
    }
}
