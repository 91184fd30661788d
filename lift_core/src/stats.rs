//! Derived training statistics.
//!
//! Everything here is a read-only view computed from the history store;
//! nothing is persisted.

use crate::catalog::ProgramCatalog;
use crate::error::Result;
use crate::history::HistoryStore;

/// Summary of training progress across all programs.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkoutStats {
    /// 1-based week number: `floor(total / cycle_length) + 1`.
    pub week: u32,
    /// Sessions completed within the current cycle.
    pub workouts_this_week: u32,
    pub total_workouts: u32,
    /// Completion count per program key, in catalog registration order.
    pub counts: Vec<(String, u32)>,
    /// Program with the fewest completions; ties go to the earliest
    /// registered program.
    pub next_program: Option<String>,
}

impl WorkoutStats {
    pub fn count_for(&self, program_key: &str) -> u32 {
        self.counts
            .iter()
            .find(|(key, _)| key == program_key)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}

/// Compute completion counts, the current week, and the recommended
/// next program from stored history.
pub fn workout_stats(
    history: &dyn HistoryStore,
    catalog: &ProgramCatalog,
    cycle_length: u32,
) -> Result<WorkoutStats> {
    let entries = history.query_all()?;

    let counts: Vec<(String, u32)> = catalog
        .keys()
        .map(|key| {
            let n = entries.iter().filter(|e| e.program_key == key).count() as u32;
            (key.to_string(), n)
        })
        .collect();

    let total_workouts = entries.len() as u32;
    let cycle = cycle_length.max(1);

    let next_program = counts
        .iter()
        .min_by_key(|(_, n)| *n)
        .map(|(key, _)| key.clone());

    Ok(WorkoutStats {
        week: total_workouts / cycle + 1,
        workouts_this_week: total_workouts % cycle,
        total_workouts,
        counts,
        next_program,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::build_default_catalog;
    use crate::history::MemoryHistoryStore;
    use crate::types::WorkoutHistoryEntry;
    use chrono::{Duration, Utc};
    use std::collections::HashMap;
    use uuid::Uuid;

    fn entry(program_key: &str, days_ago: i64) -> WorkoutHistoryEntry {
        WorkoutHistoryEntry {
            id: Uuid::new_v4(),
            completed_at: Utc::now() - Duration::days(days_ago),
            program_key: program_key.into(),
            exercises: HashMap::new(),
        }
    }

    #[test]
    fn test_empty_history() {
        let history = MemoryHistoryStore::new();
        let stats = workout_stats(&history, &build_default_catalog(), 4).unwrap();

        assert_eq!(stats.week, 1);
        assert_eq!(stats.workouts_this_week, 0);
        assert_eq!(stats.total_workouts, 0);
        // Ties at zero resolve to the first registered program.
        assert_eq!(stats.next_program.as_deref(), Some("upper1"));
    }

    #[test]
    fn test_counts_follow_registration_order() {
        let mut history = MemoryHistoryStore::new();
        history.append(&entry("lower1", 3)).unwrap();
        history.append(&entry("upper1", 2)).unwrap();
        history.append(&entry("upper1", 1)).unwrap();

        let stats = workout_stats(&history, &build_default_catalog(), 4).unwrap();
        let keys: Vec<_> = stats.counts.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["upper1", "lower1", "upper2", "lower2"]);
        assert_eq!(stats.count_for("upper1"), 2);
        assert_eq!(stats.count_for("lower1"), 1);
        assert_eq!(stats.count_for("upper2"), 0);
    }

    #[test]
    fn test_week_advances_per_cycle() {
        let mut history = MemoryHistoryStore::new();
        for key in ["upper1", "lower1", "upper2", "lower2", "upper1"] {
            history.append(&entry(key, 0)).unwrap();
        }

        let stats = workout_stats(&history, &build_default_catalog(), 4).unwrap();
        assert_eq!(stats.total_workouts, 5);
        assert_eq!(stats.week, 2);
        assert_eq!(stats.workouts_this_week, 1);
    }

    #[test]
    fn test_recommendation_is_least_completed() {
        let mut history = MemoryHistoryStore::new();
        for key in ["upper1", "lower1", "upper2"] {
            history.append(&entry(key, 0)).unwrap();
        }

        let stats = workout_stats(&history, &build_default_catalog(), 4).unwrap();
        assert_eq!(stats.next_program.as_deref(), Some("lower2"));
    }

    #[test]
    fn test_recommendation_tie_breaks_by_priority() {
        let mut history = MemoryHistoryStore::new();
        // upper1 and lower1 done once; upper2/lower2 untouched and tied.
        history.append(&entry("upper1", 1)).unwrap();
        history.append(&entry("lower1", 0)).unwrap();

        let stats = workout_stats(&history, &build_default_catalog(), 4).unwrap();
        assert_eq!(stats.next_program.as_deref(), Some("upper2"));
    }
}
