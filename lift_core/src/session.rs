//! Workout session state machine.
//!
//! A [`WorkoutSession`] owns one active workout's transient state: the
//! program being run, set/exercise cursors, per-exercise weights and
//! records, plus the rest countdown and wake lock collaborators. It is
//! single-threaded and cooperative - one operation runs to completion
//! before the next begins.
//!
//! Lifecycle: created by [`WorkoutSession::start`] (status goes
//! straight to `InProgress`), mutated only through the methods here,
//! and discarded after [`WorkoutSession::complete`] or
//! [`WorkoutSession::end`] hands the finished data to a
//! [`HistoryStore`]. A failed store append leaves the session intact so
//! the hand-off can be retried.

use crate::catalog::ProgramCatalog;
use crate::error::{Error, Result};
use crate::history::HistoryStore;
use crate::policy::ProgressionPolicy;
use crate::progression::{inter_session_weight, intra_session_adjustment, IntraAdjustment};
use crate::timer::{RestTimer, WakeLock};
use crate::types::*;
use chrono::Utc;
use std::collections::HashMap;
use uuid::Uuid;

/// Where the cursor moved after a recorded set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// More sets remain for the current exercise.
    NextSet,
    /// Moved to the first set of the next exercise.
    NextExercise,
    /// That was the final set; the session is now `Complete`.
    SessionComplete,
}

/// Everything that happened in one `record_set` call.
#[derive(Clone, Debug, PartialEq)]
pub struct SetOutcome {
    pub record: SetRecord,
    pub adjustment: IntraAdjustment,
    pub advance: Advance,
}

/// One active workout session.
pub struct WorkoutSession {
    program_key: String,
    program: ProgramDefinition,
    policy: ProgressionPolicy,
    status: SessionStatus,
    exercise_idx: usize,
    set_idx: usize,
    // Invariant: exactly one entry per exercise of the active program.
    exercises: HashMap<String, ExerciseSessionState>,
    timer: Box<dyn RestTimer>,
    wake: Box<dyn WakeLock>,
    handed_off: bool,
}

impl WorkoutSession {
    /// Start a session for `program_key`.
    ///
    /// Seeds every exercise with its session-to-session weight, derived
    /// from the most recent prior entry for the program (or the
    /// baseline/built-in default when there is none), and records how
    /// each starting weight compares to the prior session.
    #[allow(clippy::too_many_arguments)]
    pub fn start(
        catalog: &ProgramCatalog,
        program_key: &str,
        policy: ProgressionPolicy,
        history: &dyn HistoryStore,
        baseline: &BaselineWeights,
        timer: Box<dyn RestTimer>,
        mut wake: Box<dyn WakeLock>,
    ) -> Result<Self> {
        let program = catalog.lookup(program_key)?.clone();
        let prior_session = history.query_latest(program_key)?;

        let mut exercises = HashMap::with_capacity(program.exercises.len());
        for exercise in &program.exercises {
            let prior = prior_session
                .as_ref()
                .and_then(|entry| entry.exercises.get(&exercise.id));
            let weight = inter_session_weight(exercise, &policy, prior, baseline);
            let last_weight = prior.and_then(|p| p.sets.first()).map(|s| s.weight);

            let progression = match last_weight {
                None => ProgressionDirection::New,
                Some(last) if weight > last => ProgressionDirection::Increased,
                Some(last) if weight < last => ProgressionDirection::Decreased,
                Some(_) => ProgressionDirection::Maintained,
            };

            exercises.insert(
                exercise.id.clone(),
                ExerciseSessionState {
                    target_weight: weight,
                    sets: Vec::with_capacity(exercise.sets as usize),
                    manually_adjusted: false,
                    last_weight,
                    progression,
                    last_change: None,
                },
            );
        }

        wake.acquire();
        tracing::info!(program = %program_key, "workout session started");

        Ok(Self {
            program_key: program_key.to_string(),
            program,
            policy,
            status: SessionStatus::InProgress,
            exercise_idx: 0,
            set_idx: 0,
            exercises,
            timer,
            wake,
            handed_off: false,
        })
    }

    /// Record the reps just completed at the current target weight.
    ///
    /// Appends a snapshot record, applies any within-session weight
    /// adjustment for the next set, starts the rest countdown (unless
    /// the cursor leaves the exercise), and advances the cursor. The
    /// session transitions to `Complete` exactly once, on the final
    /// set.
    pub fn record_set(&mut self, reps_completed: u32) -> Result<SetOutcome> {
        self.require_in_progress("record_set")?;

        let exercise = self.program.exercises[self.exercise_idx].clone();
        let is_last_set = self.set_idx + 1 == exercise.sets as usize;

        let state = self
            .exercises
            .get_mut(&exercise.id)
            .ok_or_else(|| Error::InvalidState(format!("no state for exercise '{}'", exercise.id)))?;

        let record = SetRecord {
            weight: state.target_weight,
            reps: reps_completed,
            target_reps: exercise.target_reps,
        };
        state.sets.push(record.clone());

        let adjustment = intra_session_adjustment(
            &exercise,
            &self.policy,
            state.target_weight,
            reps_completed,
            is_last_set,
        );
        if adjustment.changed() {
            state.target_weight = adjustment.weight;
            state.last_change = Some(WeightChange {
                direction: adjustment.direction,
                amount: adjustment.delta,
                doubled: adjustment.doubled,
            });
        }

        let advance = if !is_last_set {
            self.set_idx += 1;
            self.timer.start(exercise.rest_seconds);
            Advance::NextSet
        } else if self.exercise_idx + 1 < self.program.exercises.len() {
            self.exercise_idx += 1;
            self.set_idx = 0;
            self.timer.cancel();
            Advance::NextExercise
        } else {
            self.status = SessionStatus::Complete;
            self.timer.cancel();
            tracing::info!(program = %self.program_key, "all sets recorded, session complete");
            Advance::SessionComplete
        };

        Ok(SetOutcome {
            record,
            adjustment,
            advance,
        })
    }

    /// Whether `go_back` would move the cursor.
    pub fn can_go_back(&self) -> bool {
        self.status == SessionStatus::InProgress && (self.set_idx > 0 || self.exercise_idx > 0)
    }

    /// Step the cursor back one set, removing the record it produced,
    /// and cancel any running rest countdown. A no-op (returning false)
    /// at the very first set.
    ///
    /// Any weight adjustment the removed set triggered is deliberately
    /// left in place; back-navigation restores sequencing, not weights.
    pub fn go_back(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }

        if self.set_idx > 0 {
            self.set_idx -= 1;
        } else {
            self.exercise_idx -= 1;
            let previous = &self.program.exercises[self.exercise_idx];
            self.set_idx = previous.sets as usize - 1;
        }

        let exercise_id = self.program.exercises[self.exercise_idx].id.clone();
        if let Some(state) = self.exercises.get_mut(&exercise_id) {
            state.sets.pop();
        }

        self.timer.cancel();
        true
    }

    /// Manually adjust the current exercise's target weight by `delta`,
    /// clamped at the policy floor. Marks the exercise as manually
    /// adjusted.
    pub fn adjust_weight(&mut self, delta: f64) -> Result<f64> {
        self.require_in_progress("adjust_weight")?;

        let exercise_id = self.program.exercises[self.exercise_idx].id.clone();
        let floor = self.policy.floor;
        let state = self
            .exercises
            .get_mut(&exercise_id)
            .ok_or_else(|| Error::InvalidState(format!("no state for exercise '{}'", exercise_id)))?;

        state.target_weight = (state.target_weight + delta).max(floor);
        state.manually_adjusted = true;
        Ok(state.target_weight)
    }

    /// Hand the finished session to the history store and finish it.
    ///
    /// Requires every set to have been recorded (`Complete`). A store
    /// failure is returned as-is with the session untouched, so the
    /// caller can retry.
    pub fn complete(&mut self, history: &mut dyn HistoryStore) -> Result<WorkoutHistoryEntry> {
        if self.handed_off {
            return Err(Error::InvalidState(
                "session already handed off to history".into(),
            ));
        }
        if self.status != SessionStatus::Complete {
            return Err(Error::InvalidState(format!(
                "complete() requires all sets recorded, status is {:?}",
                self.status
            )));
        }

        let entry = self.build_entry();
        history.append(&entry)?;

        self.handed_off = true;
        self.wake.release();
        tracing::info!(program = %self.program_key, id = %entry.id, "workout saved");
        Ok(entry)
    }

    /// Abort the session. With `persist`, whatever sets were recorded
    /// so far are saved as a partial entry; without it the session data
    /// is discarded. Transitions to `Ended`.
    pub fn end(
        &mut self,
        persist: bool,
        history: &mut dyn HistoryStore,
    ) -> Result<Option<WorkoutHistoryEntry>> {
        if self.handed_off || self.status == SessionStatus::Ended {
            return Err(Error::InvalidState("session already finished".into()));
        }

        self.timer.cancel();

        let entry = if persist {
            let entry = self.build_entry();
            history.append(&entry)?;
            self.handed_off = true;
            tracing::info!(program = %self.program_key, "partial workout saved on exit");
            Some(entry)
        } else {
            tracing::info!(program = %self.program_key, "workout discarded on exit");
            None
        };

        self.status = SessionStatus::Ended;
        self.wake.release();
        Ok(entry)
    }

    /// Re-acquire the wake lock after returning from the background.
    pub fn resume(&mut self) {
        if self.status == SessionStatus::InProgress {
            self.wake.acquire();
        }
    }

    fn build_entry(&self) -> WorkoutHistoryEntry {
        let exercises = self
            .exercises
            .iter()
            .map(|(id, state)| {
                (
                    id.clone(),
                    ExerciseHistory {
                        target_weight: state.target_weight,
                        sets: state.sets.clone(),
                    },
                )
            })
            .collect();

        WorkoutHistoryEntry {
            id: Uuid::new_v4(),
            completed_at: Utc::now(),
            program_key: self.program_key.clone(),
            exercises,
        }
    }

    fn require_in_progress(&self, operation: &str) -> Result<()> {
        if self.status != SessionStatus::InProgress {
            return Err(Error::InvalidState(format!(
                "{} requires an in-progress session, status is {:?}",
                operation, self.status
            )));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read-only views
    // ------------------------------------------------------------------

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn program(&self) -> &ProgramDefinition {
        &self.program
    }

    pub fn program_key(&self) -> &str {
        &self.program_key
    }

    pub fn exercise_index(&self) -> usize {
        self.exercise_idx
    }

    pub fn set_index(&self) -> usize {
        self.set_idx
    }

    /// The exercise the cursor currently points at.
    pub fn current_exercise(&self) -> &ExerciseDefinition {
        &self.program.exercises[self.exercise_idx]
    }

    /// Session state for the exercise the cursor points at.
    pub fn current_exercise_state(&self) -> &ExerciseSessionState {
        &self.exercises[&self.program.exercises[self.exercise_idx].id]
    }

    pub fn exercise_state(&self, exercise_id: &str) -> Option<&ExerciseSessionState> {
        self.exercises.get(exercise_id)
    }

    /// Target weight for the next set of the current exercise.
    pub fn current_target_weight(&self) -> f64 {
        self.current_exercise_state().target_weight
    }

    /// Seconds left on the rest countdown, if one is running.
    pub fn rest_remaining(&self) -> Option<u32> {
        self.timer.remaining()
    }

    /// Total sets recorded so far across all exercises.
    pub fn total_sets_recorded(&self) -> usize {
        self.exercises.values().map(|s| s.sets.len()).sum()
    }
}
