//! The Stride progression engine.
//!
//! One generic engine drives both progression graph families: adaptive
//! learning paths and micro-task breakdowns. Completing a unit records the
//! outcome, propagates unlocks through the owner's prerequisite graph,
//! recomputes the completion rollup, and feeds the score into the adaptive
//! difficulty controller.

#![warn(missing_docs)]

pub mod error;
pub mod propagator;
pub mod mastery;
pub mod difficulty;
pub mod aggregator;
pub mod engine;

pub use aggregator::ProgressAggregator;
pub use difficulty::{Adjustment, DifficultyController};
pub use engine::ProgressionEngine;
pub use error::{EngineError, Result};
pub use mastery::MasteryRecorder;
pub use propagator::UnlockPropagator;
