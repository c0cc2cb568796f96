//! Stride core data models.
//!
//! This crate defines the data structures shared by both progression graph
//! instantiations: adaptive learning paths of concept nodes, and micro-task
//! breakdowns of larger assignments.

#![warn(missing_docs)]

// Core identities
mod id;

// Unit and owner state machines
mod status;

// Capability traits shared by both graph families
mod graph;

// The two concrete families
mod path;
mod breakdown;

// Timeline events
mod event;

// Re-exports
pub use id::*;

pub use status::{OwnerStatus, UnitStatus};

pub use graph::{initial_status, Outcome, ProgressOwner, ProgressUnit, WeightedUnit, MAX_SCORE};

pub use path::{LearningPath, PathNode};

pub use breakdown::{MicroTask, TaskBreakdown, TaskDifficulty};

pub use event::{Event, EventAction};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
