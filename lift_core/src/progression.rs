//! Progressive-overload weight calculations.
//!
//! Pure functions over immutable inputs; no hidden state. Three entry
//! points cover the exercise lifecycle:
//! - `initial_weight` for a first-ever session
//! - `inter_session_weight` between sessions (the "2-for-2 rule")
//! - `intra_session_adjustment` between sets of one session
//!
//! Every computed change is rounded to the policy quantum with a
//! minimum of one quantum, and decreases clamp at the policy floor.

use crate::catalog::default_starting_weight;
use crate::policy::ProgressionPolicy;
use crate::types::{
    BaselineWeights, ExerciseDefinition, ExerciseHistory, ProgressionDirection,
};

/// Round a raw weight delta to the nearest quantum, with a minimum of
/// one quantum. A change that fires always moves the bar by something
/// loadable.
pub fn quantize_delta(raw: f64, quantum: f64) -> f64 {
    let rounded = (raw / quantum).round() * quantum;
    rounded.max(quantum)
}

/// Starting weight for an exercise with no prior history: the lifter's
/// baseline if one was entered, else a conservative built-in default.
pub fn initial_weight(exercise: &ExerciseDefinition, baseline: &BaselineWeights) -> f64 {
    baseline
        .get(&exercise.id)
        .copied()
        .unwrap_or_else(|| default_starting_weight(&exercise.id))
}

/// Result of a within-session adjustment check.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntraAdjustment {
    /// Weight for the next set.
    pub weight: f64,
    /// Absolute size of the change; zero when maintained.
    pub delta: f64,
    pub direction: ProgressionDirection,
    /// True when the increase percentage was doubled.
    pub doubled: bool,
}

impl IntraAdjustment {
    fn maintained(weight: f64) -> Self {
        Self {
            weight,
            delta: 0.0,
            direction: ProgressionDirection::Maintained,
            doubled: false,
        }
    }

    pub fn changed(&self) -> bool {
        self.direction != ProgressionDirection::Maintained
    }
}

/// Compute the session-to-session working weight for an exercise.
///
/// Uses the first-set weight of the prior session as the base:
/// - every prior set at or above the rep ceiling, or trigger-matching
///   sets on a majority of sets, earns an increase;
/// - a majority of sets under the rep minimum earns a decrease,
///   clamped at the policy floor;
/// - anything else keeps the base weight.
///
/// A prior session that recorded no sets for this exercise yields that
/// session's target weight; no prior session at all yields
/// `initial_weight`.
pub fn inter_session_weight(
    exercise: &ExerciseDefinition,
    policy: &ProgressionPolicy,
    prior: Option<&ExerciseHistory>,
    baseline: &BaselineWeights,
) -> f64 {
    let Some(prior) = prior else {
        return initial_weight(exercise, baseline);
    };

    let Some(first_set) = prior.sets.first() else {
        // Session was saved before this exercise got any sets; keep the
        // weight the lifter last saw prescribed.
        return prior.target_weight;
    };

    let base = first_set.weight;
    let target_max = exercise.target_max();
    let target_min = exercise.target_min();
    let n = prior.sets.len();
    let majority = n.div_ceil(2);

    let all_at_or_above_max = prior.sets.iter().all(|s| s.reps >= target_max);
    let at_max_count = prior
        .sets
        .iter()
        .filter(|s| policy.increase_trigger.matches(s.reps, target_max))
        .count();

    if all_at_or_above_max || at_max_count >= majority {
        let percentage = policy.inter_increase.for_class(exercise.class);
        let delta = quantize_delta(base * percentage, policy.quantum);
        tracing::debug!(
            exercise = %exercise.id,
            base,
            delta,
            "inter-session increase (2-for-2 rule)"
        );
        return base + delta;
    }

    let below_min_count = prior.sets.iter().filter(|s| s.reps < target_min).count();
    if below_min_count >= majority {
        let percentage = policy.inter_decrease.for_class(exercise.class);
        let delta = quantize_delta(base * percentage, policy.quantum);
        tracing::debug!(exercise = %exercise.id, base, delta, "inter-session decrease");
        return (base - delta).max(policy.floor);
    }

    base
}

/// Compute the weight for the next set after `reps_completed` were
/// performed at `current_weight`.
///
/// No adjustment fires on the final set of an exercise - there is no
/// next set to adjust. Overshooting the rep ceiling doubles the
/// increase percentage when the policy allows, to correct an
/// under-loaded weight faster.
pub fn intra_session_adjustment(
    exercise: &ExerciseDefinition,
    policy: &ProgressionPolicy,
    current_weight: f64,
    reps_completed: u32,
    is_last_set: bool,
) -> IntraAdjustment {
    if is_last_set {
        return IntraAdjustment::maintained(current_weight);
    }

    let target_max = exercise.target_max();
    let target_min = exercise.target_min();

    if reps_completed >= target_max {
        let mut percentage = policy.intra_increase.for_class(exercise.class);
        let doubled = policy.double_on_overflow && reps_completed > target_max;
        if doubled {
            percentage *= 2.0;
        }
        let delta = quantize_delta(current_weight * percentage, policy.quantum);
        tracing::debug!(
            exercise = %exercise.id,
            current_weight,
            delta,
            doubled,
            "within-session increase"
        );
        return IntraAdjustment {
            weight: current_weight + delta,
            delta,
            direction: ProgressionDirection::Increased,
            doubled,
        };
    }

    if reps_completed < target_min {
        let percentage = policy.intra_decrease.for_class(exercise.class);
        let delta = quantize_delta(current_weight * percentage, policy.quantum);
        tracing::debug!(exercise = %exercise.id, current_weight, delta, "within-session decrease");
        return IntraAdjustment {
            weight: (current_weight - delta).max(policy.floor),
            delta,
            direction: ProgressionDirection::Decreased,
            doubled: false,
        };
    }

    IntraAdjustment::maintained(current_weight)
}
