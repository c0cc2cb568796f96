//! Task breakdown model: a larger assignment split into gated micro-tasks.

use crate::graph::{Outcome, ProgressOwner, ProgressUnit, WeightedUnit};
use crate::id::{BreakdownId, StudentId, UnitId};
use crate::status::{OwnerStatus, UnitStatus};
use crate::Time;
use serde::{Deserialize, Serialize};

/// Difficulty tier of a micro-task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskDifficulty {
    /// Quick, low-effort step
    Easy,
    /// Typical step
    Medium,
    /// The heavy lifting
    Hard,
}

impl TaskDifficulty {
    /// Tier weight feeding the breakdown's static difficulty score.
    pub fn weight(&self) -> u8 {
        match self {
            Self::Easy => 3,
            Self::Medium => 5,
            Self::Hard => 8,
        }
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "EASY",
            Self::Medium => "MEDIUM",
            Self::Hard => "HARD",
        }
    }
}

/// A breakdown of one assignment into micro-tasks for one student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskBreakdown {
    /// Unique identifier
    pub id: BreakdownId,

    /// External reference to the assignment that was broken down
    pub original_task_id: String,

    /// The student this breakdown belongs to
    pub student_id: StudentId,

    /// What the assignment is
    pub description: String,

    /// Sum of the micro-tasks' estimated minutes
    pub total_estimated_minutes: u32,

    /// Static difficulty score, 1-10: rounded mean of the micro-task tier
    /// weights. Recomputed when the unit set changes, never from mastery.
    pub difficulty_score: u8,

    /// Adaptive difficulty scalar, 1-10, driven by mastery outcomes
    pub difficulty_level: u8,

    /// Derived completion percentage, 0-100
    pub completion_percentage: f32,

    /// Lifecycle status
    pub status: OwnerStatus,

    /// Number of difficulty adjustments applied so far
    pub adaptation_count: u32,

    /// Micro-task the student is currently working on
    pub current_unit: Option<UnitId>,

    /// Generator's explanation of the split
    pub rationale: String,

    /// When the breakdown was generated
    pub generated_at: Time,

    /// Last modification timestamp
    pub updated_at: Time,
}

impl TaskBreakdown {
    /// Create a new active breakdown. Totals and the static difficulty score
    /// are filled in by the engine once the unit set is known.
    pub fn new(
        original_task_id: impl Into<String>,
        student_id: StudentId,
        description: impl Into<String>,
        rationale: impl Into<String>,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: BreakdownId::new(),
            original_task_id: original_task_id.into(),
            student_id,
            description: description.into(),
            total_estimated_minutes: 0,
            difficulty_score: 5,
            difficulty_level: 5,
            completion_percentage: 0.0,
            status: OwnerStatus::Active,
            adaptation_count: 0,
            current_unit: None,
            rationale: rationale.into(),
            generated_at: now,
            updated_at: now,
        }
    }
}

impl ProgressOwner for TaskBreakdown {
    type Id = BreakdownId;

    fn id(&self) -> BreakdownId {
        self.id
    }

    fn label(&self) -> &str {
        &self.description
    }

    fn difficulty_level(&self) -> u8 {
        self.difficulty_level
    }

    fn set_difficulty_level(&mut self, level: u8) {
        self.difficulty_level = level;
    }

    fn completion_percentage(&self) -> f32 {
        self.completion_percentage
    }

    fn set_completion_percentage(&mut self, percentage: f32) {
        self.completion_percentage = percentage;
    }

    fn status(&self) -> OwnerStatus {
        self.status
    }

    fn set_status(&mut self, status: OwnerStatus) {
        self.status = status;
    }

    fn adaptation_count(&self) -> u32 {
        self.adaptation_count
    }

    fn bump_adaptation_count(&mut self) {
        self.adaptation_count += 1;
    }

    fn current_unit(&self) -> Option<UnitId> {
        self.current_unit
    }

    fn set_current_unit(&mut self, unit: Option<UnitId>) {
        self.current_unit = unit;
    }

    fn touch(&mut self, at: Time) {
        self.updated_at = at;
    }
}

/// One micro-task within a breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MicroTask {
    /// Unique identifier
    pub id: UnitId,

    /// Owning breakdown
    pub breakdown_id: BreakdownId,

    /// Display order within the breakdown
    pub sequence: u32,

    /// Short imperative title
    pub title: String,

    /// What to do
    pub description: String,

    /// Estimated minutes for the step
    pub estimated_minutes: u32,

    /// Minutes recorded across attempts
    pub actual_minutes: u32,

    /// Difficulty tier
    pub difficulty: TaskDifficulty,

    /// Same-breakdown micro-tasks that must be completed or skipped first
    pub prerequisites: Vec<UnitId>,

    /// Current status
    pub status: UnitStatus,

    /// Helpful links or resource references
    pub resources: Vec<String>,

    /// Latest mastery score, set on attempt/completion
    pub mastery_score: Option<u8>,

    /// Number of recorded attempts
    pub attempts_count: u32,

    /// When the micro-task completed
    pub completed_at: Option<Time>,
}

impl ProgressUnit for MicroTask {
    type OwnerId = BreakdownId;

    fn id(&self) -> UnitId {
        self.id
    }

    fn owner_id(&self) -> BreakdownId {
        self.breakdown_id
    }

    fn sequence(&self) -> u32 {
        self.sequence
    }

    fn prerequisites(&self) -> &[UnitId] {
        &self.prerequisites
    }

    fn status(&self) -> UnitStatus {
        self.status
    }

    fn set_status(&mut self, status: UnitStatus) {
        self.status = status;
    }

    fn attempts_count(&self) -> u32 {
        self.attempts_count
    }

    fn mastery_score(&self) -> Option<u8> {
        self.mastery_score
    }

    fn completed_at(&self) -> Option<Time> {
        self.completed_at
    }

    fn record_attempt(&mut self, outcome: &Outcome) {
        self.attempts_count += 1;
        self.mastery_score = Some(outcome.score);
        self.actual_minutes += outcome.minutes_spent;
    }

    fn set_completed_at(&mut self, at: Time) {
        self.completed_at = Some(at);
    }
}

impl WeightedUnit for MicroTask {
    fn difficulty_weight(&self) -> u8 {
        self.difficulty.weight()
    }
}
