//! Capability traits shared by both progression graph families.
//!
//! The engine is written once against [`ProgressOwner`] and [`ProgressUnit`]
//! and instantiated for learning paths (concept nodes) and task breakdowns
//! (micro-tasks). Unit-specific metadata (mastery vs. duration) stays behind
//! [`ProgressUnit::record_attempt`].

use crate::id::UnitId;
use crate::status::{OwnerStatus, UnitStatus};
use crate::Time;
use serde::{Deserialize, Serialize};

/// Highest accepted mastery score.
pub const MAX_SCORE: u8 = 100;

/// A recorded result for one attempt at a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Mastery score, 0-100
    pub score: u8,

    /// Minutes spent on the attempt
    pub minutes_spent: u32,
}

impl Outcome {
    /// Create a new outcome.
    pub fn new(score: u8, minutes_spent: u32) -> Self {
        Self {
            score,
            minutes_spent,
        }
    }
}

/// Initial status for a unit at graph construction time.
///
/// Units with no prerequisites are born `Unlocked`; everything else waits
/// `Locked` until the propagator releases it.
pub fn initial_status(prerequisites: &[UnitId]) -> UnitStatus {
    if prerequisites.is_empty() {
        UnitStatus::Unlocked
    } else {
        UnitStatus::Locked
    }
}

/// One progression graph instance: a learning path or a task breakdown.
pub trait ProgressOwner: Clone + Send + Sync + 'static {
    /// Identifier type for this owner family.
    type Id: Copy + Eq + std::hash::Hash + std::fmt::Display + Send + Sync + 'static;

    /// Owner identifier.
    fn id(&self) -> Self::Id;

    /// What the graph covers (subject or task description).
    fn label(&self) -> &str;

    /// Adaptive difficulty scalar, 1-10.
    fn difficulty_level(&self) -> u8;

    /// Set the adaptive difficulty scalar. Only the difficulty controller and
    /// initial generation call this.
    fn set_difficulty_level(&mut self, level: u8);

    /// Derived completion percentage, 0-100.
    fn completion_percentage(&self) -> f32;

    /// Set the completion percentage. Only the progress aggregator calls this.
    fn set_completion_percentage(&mut self, percentage: f32);

    /// Owner lifecycle status.
    fn status(&self) -> OwnerStatus;

    /// Set the owner lifecycle status.
    fn set_status(&mut self, status: OwnerStatus);

    /// How many times the difficulty controller has adjusted this owner.
    fn adaptation_count(&self) -> u32;

    /// Count one difficulty adjustment.
    fn bump_adaptation_count(&mut self);

    /// The unit the student is currently working on, if any.
    fn current_unit(&self) -> Option<UnitId>;

    /// Track or clear the unit currently being worked on.
    fn set_current_unit(&mut self, unit: Option<UnitId>);

    /// Record a modification time.
    fn touch(&mut self, at: Time);
}

/// One gated work item inside an owner's graph.
pub trait ProgressUnit: Clone + Send + Sync + 'static {
    /// Identifier type of the owning graph.
    type OwnerId: Copy + Eq + std::hash::Hash + std::fmt::Display + Send + Sync + 'static;

    /// Unit identifier, unique within the owner.
    fn id(&self) -> UnitId;

    /// Identifier of the owning graph.
    fn owner_id(&self) -> Self::OwnerId;

    /// Stable display ordering. Never used for dependency logic.
    fn sequence(&self) -> u32;

    /// Units (same owner) that must be completed or skipped first.
    fn prerequisites(&self) -> &[UnitId];

    /// Current status.
    fn status(&self) -> UnitStatus;

    /// Set the current status.
    fn set_status(&mut self, status: UnitStatus);

    /// How many outcomes have been recorded against this unit.
    fn attempts_count(&self) -> u32;

    /// Latest recorded mastery score, if any.
    fn mastery_score(&self) -> Option<u8>;

    /// When the unit completed, if it has.
    fn completed_at(&self) -> Option<Time>;

    /// Apply one attempt's outcome: count the attempt, store the score
    /// (latest attempt wins) and fold in unit-specific metadata such as time
    /// spent. Does not change status.
    fn record_attempt(&mut self, outcome: &Outcome);

    /// Transition into `Completed` and stamp `completed_at` (first completion
    /// only; the timestamp is never overwritten).
    fn mark_completed(&mut self, at: Time) {
        self.set_status(UnitStatus::Completed);
        if self.completed_at().is_none() {
            self.set_completed_at(at);
        }
    }

    /// Store the completion timestamp.
    fn set_completed_at(&mut self, at: Time);
}

/// Units carrying a fixed difficulty tier that contributes to the owner's
/// static difficulty score.
pub trait WeightedUnit: ProgressUnit {
    /// Tier weight used for the rounded-mean aggregate.
    fn difficulty_weight(&self) -> u8;
}
