//! Progression policy configuration.
//!
//! Observed training programs disagree on the rounding quantum, on
//! whether a within-session increase doubles when the lifter overshoots
//! the rep ceiling, and on the comparator that counts a set toward an
//! increase. All of those knobs live here as per-program configuration
//! rather than hard-coded constants.

use crate::types::MovementClass;
use serde::{Deserialize, Serialize};

/// Comparator used when counting prior sets toward a weight increase.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IncreaseTrigger {
    /// A set counts when `reps >= target_max`.
    AtOrAbove,
    /// A set counts only when `reps > target_max`.
    Above,
}

impl IncreaseTrigger {
    pub fn matches(self, reps: u32, target_max: u32) -> bool {
        match self {
            IncreaseTrigger::AtOrAbove => reps >= target_max,
            IncreaseTrigger::Above => reps > target_max,
        }
    }
}

/// Percentage band split by movement class.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct PercentBand {
    pub compound: f64,
    pub isolation: f64,
}

impl PercentBand {
    pub fn for_class(&self, class: MovementClass) -> f64 {
        match class {
            MovementClass::Compound => self.compound,
            MovementClass::Isolation => self.isolation,
        }
    }
}

/// Numeric policy governing all weight computations for one program.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProgressionPolicy {
    /// Smallest increment all weight changes are rounded to.
    #[serde(default = "default_quantum")]
    pub quantum: f64,

    /// Minimum allowed working weight.
    #[serde(default = "default_floor")]
    pub floor: f64,

    /// Session-to-session increase band (the aggressive end).
    #[serde(default = "default_inter_increase")]
    pub inter_increase: PercentBand,

    /// Session-to-session decrease band (conservative).
    #[serde(default = "default_inter_decrease")]
    pub inter_decrease: PercentBand,

    /// Within-session increase band (conservative end).
    #[serde(default = "default_intra_increase")]
    pub intra_increase: PercentBand,

    /// Within-session decrease band.
    #[serde(default = "default_intra_decrease")]
    pub intra_decrease: PercentBand,

    /// Double the within-session increase percentage when reps exceed
    /// the target ceiling (the weight was clearly too light).
    #[serde(default = "default_double_on_overflow")]
    pub double_on_overflow: bool,

    /// Comparator for counting prior-session sets toward an increase.
    #[serde(default = "default_increase_trigger")]
    pub increase_trigger: IncreaseTrigger,
}

fn default_quantum() -> f64 {
    5.0
}

fn default_floor() -> f64 {
    25.0
}

fn default_inter_increase() -> PercentBand {
    PercentBand {
        compound: 0.05,
        isolation: 0.10,
    }
}

fn default_inter_decrease() -> PercentBand {
    PercentBand {
        compound: 0.025,
        isolation: 0.05,
    }
}

fn default_intra_increase() -> PercentBand {
    PercentBand {
        compound: 0.025,
        isolation: 0.05,
    }
}

fn default_intra_decrease() -> PercentBand {
    PercentBand {
        compound: 0.025,
        isolation: 0.05,
    }
}

fn default_double_on_overflow() -> bool {
    true
}

fn default_increase_trigger() -> IncreaseTrigger {
    IncreaseTrigger::AtOrAbove
}

impl Default for ProgressionPolicy {
    fn default() -> Self {
        Self {
            quantum: default_quantum(),
            floor: default_floor(),
            inter_increase: default_inter_increase(),
            inter_decrease: default_inter_decrease(),
            intra_increase: default_intra_increase(),
            intra_decrease: default_intra_decrease(),
            double_on_overflow: default_double_on_overflow(),
            increase_trigger: default_increase_trigger(),
        }
    }
}

impl ProgressionPolicy {
    /// Validate numeric sanity. Returns findings, empty when valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.quantum <= 0.0 {
            errors.push(format!("quantum must be positive, got {}", self.quantum));
        }
        if self.floor < 0.0 {
            errors.push(format!("floor must be non-negative, got {}", self.floor));
        }
        for (name, band) in [
            ("inter_increase", &self.inter_increase),
            ("inter_decrease", &self.inter_decrease),
            ("intra_increase", &self.intra_increase),
            ("intra_decrease", &self.intra_decrease),
        ] {
            if band.compound <= 0.0 || band.isolation <= 0.0 {
                errors.push(format!("{} percentages must be positive", name));
            }
        }
        errors
    }
}
