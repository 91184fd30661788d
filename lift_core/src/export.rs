//! CSV export of workout history.
//!
//! Flattens history entries into one row per recorded set so the data
//! can be taken into a spreadsheet. The output file is rewritten in
//! full and fsynced before the function returns.

use crate::error::Result;
use crate::history::HistoryStore;
use std::path::Path;

/// One set, flattened for CSV.
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    date: String,
    workout_type: String,
    exercise: String,
    set: usize,
    weight: f64,
    reps: u32,
    target_min: u32,
    target_max: u32,
}

/// Write every stored set to `csv_path`, newest session first.
/// Returns the number of rows written.
pub fn export_history(history: &dyn HistoryStore, csv_path: &Path) -> Result<usize> {
    let entries = history.query_all()?;

    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::File::create(csv_path)?;
    let mut writer = csv::Writer::from_writer(file);
    let mut rows = 0;

    for entry in &entries {
        // Deterministic row order within an entry.
        let mut exercise_ids: Vec<_> = entry.exercises.keys().collect();
        exercise_ids.sort();

        for exercise_id in exercise_ids {
            let exercise = &entry.exercises[exercise_id];
            for (i, set) in exercise.sets.iter().enumerate() {
                writer.serialize(CsvRow {
                    date: entry.completed_at.to_rfc3339(),
                    workout_type: entry.program_key.clone(),
                    exercise: exercise_id.clone(),
                    set: i + 1,
                    weight: set.weight,
                    reps: set.reps,
                    target_min: set.target_reps[0],
                    target_max: set.target_reps[1],
                })?;
                rows += 1;
            }
        }
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("exported {} set rows to {}", rows, csv_path.display());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{HistoryStore, MemoryHistoryStore};
    use crate::types::{ExerciseHistory, SetRecord, WorkoutHistoryEntry};
    use chrono::Utc;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn entry_with_sets(program_key: &str, sets: usize) -> WorkoutHistoryEntry {
        let mut exercises = HashMap::new();
        exercises.insert(
            "bench".to_string(),
            ExerciseHistory {
                target_weight: 100.0,
                sets: (0..sets)
                    .map(|_| SetRecord {
                        weight: 95.0,
                        reps: 8,
                        target_reps: [6, 8],
                    })
                    .collect(),
            },
        );
        WorkoutHistoryEntry {
            id: Uuid::new_v4(),
            completed_at: Utc::now(),
            program_key: program_key.into(),
            exercises,
        }
    }

    #[test]
    fn test_export_writes_one_row_per_set() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("history.csv");

        let mut history = MemoryHistoryStore::new();
        history.append(&entry_with_sets("upper1", 3)).unwrap();
        history.append(&entry_with_sets("lower1", 2)).unwrap();

        let rows = export_history(&history, &csv_path).unwrap();
        assert_eq!(rows, 5);

        let reader = csv::Reader::from_path(&csv_path).unwrap();
        assert_eq!(reader.into_records().count(), 5);
    }

    #[test]
    fn test_export_empty_history_creates_empty_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("history.csv");

        let history = MemoryHistoryStore::new();
        let rows = export_history(&history, &csv_path).unwrap();
        assert_eq!(rows, 0);
        assert!(csv_path.exists());
    }

    #[test]
    fn test_export_overwrites_previous_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("history.csv");

        let mut history = MemoryHistoryStore::new();
        history.append(&entry_with_sets("upper1", 3)).unwrap();
        export_history(&history, &csv_path).unwrap();
        export_history(&history, &csv_path).unwrap();

        let reader = csv::Reader::from_path(&csv_path).unwrap();
        assert_eq!(reader.into_records().count(), 3);
    }
}
