//! State machines for progress units and their owners.

use serde::{Deserialize, Serialize};

/// Status of a single progress unit.
///
/// The forward chain is `Locked → Unlocked → InProgress → Completed`, with
/// `Skipped` as an alternate terminal reachable from `Unlocked` or
/// `InProgress`. A skipped unit satisfies downstream prerequisite checks
/// exactly like a completed one, so a skip can never dead-end the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitStatus {
    /// Gated behind unmet prerequisites
    Locked,
    /// Prerequisites satisfied, ready to attempt
    Unlocked,
    /// Student is actively working on it
    InProgress,
    /// Finished with a recorded outcome
    Completed,
    /// Explicitly bypassed by the student
    Skipped,
}

impl UnitStatus {
    /// Whether this unit counts as "done" for dependents' prerequisite checks.
    pub fn satisfies_prerequisites(&self) -> bool {
        matches!(self, Self::Completed | Self::Skipped)
    }

    /// Whether this unit counts toward the owner's completion percentage.
    ///
    /// Same rule as [`satisfies_prerequisites`](Self::satisfies_prerequisites):
    /// skip-counts-as-done is the single rule everywhere.
    pub fn counts_as_progress(&self) -> bool {
        self.satisfies_prerequisites()
    }

    /// Whether an outcome (completion or attempt) may be recorded now.
    pub fn can_record_outcome(&self) -> bool {
        matches!(self, Self::Unlocked | Self::InProgress)
    }

    /// Whether the unit may be started.
    pub fn can_start(&self) -> bool {
        matches!(self, Self::Unlocked)
    }

    /// Whether the unit may be skipped.
    pub fn can_skip(&self) -> bool {
        matches!(self, Self::Unlocked | Self::InProgress)
    }

    /// Whether the unit has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Skipped)
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Locked => "LOCKED",
            Self::Unlocked => "UNLOCKED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Skipped => "SKIPPED",
        }
    }
}

impl std::fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a progression graph owner (a learning path or a task breakdown).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OwnerStatus {
    /// Units are being worked through
    Active,
    /// Paused by the student; resumable
    Paused,
    /// Every unit is completed or skipped
    Completed,
}

impl OwnerStatus {
    /// Whether the owner may be paused. Pausing is client-controlled and only
    /// valid while work is ongoing.
    pub fn can_pause(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Whether the owner may be resumed.
    pub fn can_resume(&self) -> bool {
        matches!(self, Self::Paused)
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Paused => "PAUSED",
            Self::Completed => "COMPLETED",
        }
    }
}

impl std::fmt::Display for OwnerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skipped_and_completed_both_satisfy_prerequisites() {
        assert!(UnitStatus::Completed.satisfies_prerequisites());
        assert!(UnitStatus::Skipped.satisfies_prerequisites());
        assert!(!UnitStatus::Unlocked.satisfies_prerequisites());
        assert!(!UnitStatus::InProgress.satisfies_prerequisites());
        assert!(!UnitStatus::Locked.satisfies_prerequisites());
    }

    #[test]
    fn outcome_recording_requires_unlocked_or_in_progress() {
        assert!(UnitStatus::Unlocked.can_record_outcome());
        assert!(UnitStatus::InProgress.can_record_outcome());
        assert!(!UnitStatus::Locked.can_record_outcome());
        assert!(!UnitStatus::Completed.can_record_outcome());
        assert!(!UnitStatus::Skipped.can_record_outcome());
    }

    #[test]
    fn terminal_states_cannot_be_skipped_again() {
        assert!(!UnitStatus::Completed.can_skip());
        assert!(!UnitStatus::Skipped.can_skip());
        assert!(UnitStatus::InProgress.can_skip());
    }

    #[test]
    fn owner_pause_resume_guards() {
        assert!(OwnerStatus::Active.can_pause());
        assert!(!OwnerStatus::Paused.can_pause());
        assert!(!OwnerStatus::Completed.can_pause());
        assert!(OwnerStatus::Paused.can_resume());
        assert!(!OwnerStatus::Active.can_resume());
    }
}
