#![forbid(unsafe_code)]

//! Core domain model and business logic for the liftlog
//! progressive-overload strength tracker.
//!
//! This crate provides:
//! - Domain types (exercises, programs, sessions, history entries)
//! - The program catalog
//! - The progression engine (inter- and intra-session weight rules)
//! - The workout session state machine
//! - Persistence (history JSONL, baseline JSON, CSV export)
//! - Configuration and progression policies

pub mod types;
pub mod error;
pub mod catalog;
pub mod policy;
pub mod config;
pub mod logging;
pub mod progression;
pub mod session;
pub mod timer;
pub mod history;
pub mod baseline;
pub mod stats;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog, ProgramCatalog};
pub use policy::{IncreaseTrigger, PercentBand, ProgressionPolicy};
pub use config::Config;
pub use progression::{
    initial_weight, inter_session_weight, intra_session_adjustment, IntraAdjustment,
};
pub use session::{Advance, SetOutcome, WorkoutSession};
pub use timer::{ManualTimer, NoopWakeLock, RestTimer, SystemTimer, WakeLock};
pub use history::{HistoryStore, JsonlHistoryStore, MemoryHistoryStore};
pub use baseline::{BaselineStore, JsonBaselineStore};
pub use stats::{workout_stats, WorkoutStats};
pub use export::export_history;
