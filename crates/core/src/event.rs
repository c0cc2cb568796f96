//! Event model - facts emitted by the engine for external collaborators.
//!
//! The gamification ledger and notification services consume these records;
//! the engine itself never awards points.

use crate::id::EventId;
use crate::Time;
use serde::{Deserialize, Serialize};

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventAction {
    /// A unit was completed with a recorded outcome
    UnitCompleted,
    /// A unit was explicitly skipped
    UnitSkipped,
    /// The difficulty controller stepped the owner's scalar
    DifficultyAdjusted,
    /// The owner reached 100% completion
    OwnerCompleted,
}

impl EventAction {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnitCompleted => "unit_completed",
            Self::UnitSkipped => "unit_skipped",
            Self::DifficultyAdjusted => "difficulty_adjusted",
            Self::OwnerCompleted => "owner_completed",
        }
    }
}

/// An event is an atomic fact that happened at a specific time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier
    pub id: EventId,

    /// When it happened
    pub timestamp: Time,

    /// What happened
    pub action: EventAction,

    /// Owner the fact concerns (display form of its id)
    pub owner: String,

    /// Unit the fact concerns, if any
    pub unit: Option<String>,

    /// Structured payload for consumers (scores, difficulty steps, ...)
    pub detail: serde_json::Value,
}

impl Event {
    /// Create a new event stamped with the current time.
    pub fn new(
        action: EventAction,
        owner: impl Into<String>,
        unit: Option<String>,
        detail: serde_json::Value,
    ) -> Self {
        Self {
            id: EventId::new(),
            timestamp: chrono::Utc::now(),
            action,
            owner: owner.into(),
            unit,
            detail,
        }
    }
}
