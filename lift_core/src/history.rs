//! Workout history persistence.
//!
//! History entries are appended to a JSONL (JSON Lines) file with file
//! locking to ensure safe concurrent access. Read paths recover from
//! individual corrupted lines rather than failing wholesale.
//!
//! Store failures surface as [`Error::Store`] and never touch in-memory
//! session state; a failed append can simply be retried.

use crate::error::{Error, Result};
use crate::types::WorkoutHistoryEntry;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Abstract store that owns finished sessions.
pub trait HistoryStore {
    /// Append a finished entry. The entry is immutable once handed off.
    fn append(&mut self, entry: &WorkoutHistoryEntry) -> Result<()>;

    /// Most recent entry for the given program key, by timestamp.
    fn query_latest(&self, program_key: &str) -> Result<Option<WorkoutHistoryEntry>>;

    /// All entries, newest first.
    fn query_all(&self) -> Result<Vec<WorkoutHistoryEntry>>;
}

/// JSONL-backed history store with file locking.
pub struct JsonlHistoryStore {
    path: PathBuf,
}

impl JsonlHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent_dir(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    fn append_inner(&self, entry: &WorkoutHistoryEntry) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(entry)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        file.unlock()?;

        tracing::debug!("appended workout {} to {}", entry.id, self.path.display());
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<WorkoutHistoryEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;

        let reader = BufReader::new(&file);
        let mut entries = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<WorkoutHistoryEntry>(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::warn!("skipping unreadable history line {}: {}", line_num + 1, e);
                }
            }
        }

        file.unlock()?;
        Ok(entries)
    }
}

impl HistoryStore for JsonlHistoryStore {
    fn append(&mut self, entry: &WorkoutHistoryEntry) -> Result<()> {
        self.append_inner(entry)
            .map_err(|e| Error::Store(format!("append to {}: {}", self.path.display(), e)))
    }

    fn query_latest(&self, program_key: &str) -> Result<Option<WorkoutHistoryEntry>> {
        let entries = self
            .read_all()
            .map_err(|e| Error::Store(format!("read {}: {}", self.path.display(), e)))?;
        Ok(latest_for_program(entries, program_key))
    }

    fn query_all(&self) -> Result<Vec<WorkoutHistoryEntry>> {
        let mut entries = self
            .read_all()
            .map_err(|e| Error::Store(format!("read {}: {}", self.path.display(), e)))?;
        entries.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        Ok(entries)
    }
}

/// In-memory history store for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    entries: Vec<WorkoutHistoryEntry>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn append(&mut self, entry: &WorkoutHistoryEntry) -> Result<()> {
        self.entries.push(entry.clone());
        Ok(())
    }

    fn query_latest(&self, program_key: &str) -> Result<Option<WorkoutHistoryEntry>> {
        Ok(latest_for_program(self.entries.clone(), program_key))
    }

    fn query_all(&self) -> Result<Vec<WorkoutHistoryEntry>> {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        Ok(entries)
    }
}

fn latest_for_program(
    entries: Vec<WorkoutHistoryEntry>,
    program_key: &str,
) -> Option<WorkoutHistoryEntry> {
    entries
        .into_iter()
        .filter(|e| e.program_key == program_key)
        .max_by_key(|e| e.completed_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExerciseHistory, SetRecord};
    use chrono::{Duration, Utc};
    use std::collections::HashMap;
    use uuid::Uuid;

    fn entry(program_key: &str, days_ago: i64) -> WorkoutHistoryEntry {
        let mut exercises = HashMap::new();
        exercises.insert(
            "bench".to_string(),
            ExerciseHistory {
                target_weight: 100.0,
                sets: vec![SetRecord {
                    weight: 100.0,
                    reps: 8,
                    target_reps: [6, 8],
                }],
            },
        );
        WorkoutHistoryEntry {
            id: Uuid::new_v4(),
            completed_at: Utc::now() - Duration::days(days_ago),
            program_key: program_key.into(),
            exercises,
        }
    }

    #[test]
    fn test_append_and_query_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonlHistoryStore::new(temp_dir.path().join("history.jsonl"));

        let original = entry("upper1", 0);
        store.append(&original).unwrap();

        let all = store.query_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], original);
    }

    #[test]
    fn test_query_latest_picks_most_recent_for_program() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonlHistoryStore::new(temp_dir.path().join("history.jsonl"));

        let old = entry("upper1", 7);
        let recent = entry("upper1", 1);
        let other_program = entry("lower1", 0);
        store.append(&old).unwrap();
        store.append(&recent).unwrap();
        store.append(&other_program).unwrap();

        let latest = store.query_latest("upper1").unwrap().unwrap();
        assert_eq!(latest.id, recent.id);
    }

    #[test]
    fn test_query_latest_none_for_unseen_program() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonlHistoryStore::new(temp_dir.path().join("history.jsonl"));
        assert!(store.query_latest("upper1").unwrap().is_none());
    }

    #[test]
    fn test_query_all_newest_first() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonlHistoryStore::new(temp_dir.path().join("history.jsonl"));

        store.append(&entry("upper1", 5)).unwrap();
        store.append(&entry("lower1", 1)).unwrap();
        store.append(&entry("upper2", 3)).unwrap();

        let all = store.query_all().unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].program_key, "lower1");
        assert_eq!(all[2].program_key, "upper1");
    }

    #[test]
    fn test_corrupted_line_is_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("history.jsonl");
        let mut store = JsonlHistoryStore::new(&path);

        store.append(&entry("upper1", 2)).unwrap();
        {
            let mut file = OpenOptions::new().append(true).open(&path).unwrap();
            writeln!(file, "{{ not json").unwrap();
        }
        store.append(&entry("lower1", 1)).unwrap();

        let all = store.query_all().unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_memory_store_matches_trait_contract() {
        let mut store = MemoryHistoryStore::new();
        store.append(&entry("upper1", 3)).unwrap();
        store.append(&entry("upper1", 1)).unwrap();

        assert_eq!(store.len(), 2);
        let latest = store.query_latest("upper1").unwrap().unwrap();
        let all = store.query_all().unwrap();
        assert_eq!(all[0].id, latest.id);
    }
}
