//! Learning path model: an adaptive sequence of concept nodes.

use crate::graph::{Outcome, ProgressOwner, ProgressUnit};
use crate::id::{PathId, StudentId, UnitId};
use crate::status::{OwnerStatus, UnitStatus};
use crate::Time;
use serde::{Deserialize, Serialize};

/// An adaptive learning path for one student and subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningPath {
    /// Unique identifier
    pub id: PathId,

    /// The student this path belongs to
    pub student_id: StudentId,

    /// Subject the path covers
    pub subject: String,

    /// Adaptive difficulty scalar, 1-10
    pub difficulty_level: u8,

    /// Derived completion percentage, 0-100
    pub completion_percentage: f32,

    /// Lifecycle status
    pub status: OwnerStatus,

    /// Number of difficulty adjustments applied so far
    pub adaptation_count: u32,

    /// Node the student is currently working on
    pub current_unit: Option<UnitId>,

    /// When the path was generated
    pub started_at: Time,

    /// Projected finish, from the nodes' estimated durations
    pub estimated_completion: Time,

    /// Last modification timestamp
    pub updated_at: Time,
}

impl LearningPath {
    /// Create a new active path. `estimated_minutes` is the sum of the
    /// generated nodes' estimated durations.
    pub fn new(
        student_id: StudentId,
        subject: impl Into<String>,
        difficulty_level: u8,
        estimated_minutes: u32,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: PathId::new(),
            student_id,
            subject: subject.into(),
            difficulty_level,
            completion_percentage: 0.0,
            status: OwnerStatus::Active,
            adaptation_count: 0,
            current_unit: None,
            started_at: now,
            estimated_completion: now + chrono::Duration::minutes(i64::from(estimated_minutes)),
            updated_at: now,
        }
    }
}

impl ProgressOwner for LearningPath {
    type Id = PathId;

    fn id(&self) -> PathId {
        self.id
    }

    fn label(&self) -> &str {
        &self.subject
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

/// One concept node within a learning path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathNode {
    /// Unique identifier
    pub id: UnitId,

    /// Owning path
    pub path_id: PathId,

    /// Display order within the path
    pub sequence: u32,

    /// Concept this node teaches
    pub concept: String,

    /// Per-node difficulty, 1-10
    pub difficulty: u8,

    /// Estimated time to master, in minutes
    pub estimated_minutes: u32,

    /// Minutes recorded across attempts
    pub minutes_spent: u32,

    /// Same-path nodes that must be completed or skipped first
    pub prerequisites: Vec<UnitId>,

    /// Current status
    pub status: UnitStatus,

    /// Latest mastery score, set on attempt/completion
    pub mastery_score: Option<u8>,

    /// Number of recorded attempts
    pub attempts_count: u32,

    /// When the node completed
    pub completed_at: Option<Time>,
}

impl ProgressUnit for PathNode {
    type OwnerId = PathId;

    fn id(&self) -> UnitId {
        self.id
    }

    fn owner_id(&self) -> PathId {
        self.path_id
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
        self.minutes_spent += outcome.minutes_spent;
    }

    fn set_completed_at(&mut self, at: Time) {
        self.completed_at = Some(at);
    }
}
