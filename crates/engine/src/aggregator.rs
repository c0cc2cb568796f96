//! Owner-level progress rollup.

use stride_core::{OwnerStatus, ProgressOwner, ProgressUnit};

/// Recomputes an owner's completion percentage from its unit statuses.
pub struct ProgressAggregator;

impl ProgressAggregator {
    /// Completion percentage for a unit set: terminal units (completed or
    /// skipped) over total. An owner with no units is 0% complete.
    pub fn completion_percentage<U: ProgressUnit>(units: &[U]) -> f32 {
        if units.is_empty() {
            return 0.0;
        }
        let done = units.iter().filter(|u| u.status().counts_as_progress()).count();
        (done as f32 / units.len() as f32) * 100.0
    }

    /// Recompute the owner's percentage from current unit statuses and flip
    /// the owner to `Completed` exactly when it reaches 100. Returns whether
    /// the owner newly completed on this call.
    ///
    /// Derivation from current state makes this idempotent: recomputing
    /// yields the same result regardless of call order or repetition.
    pub fn apply<O: ProgressOwner, U: ProgressUnit>(owner: &mut O, units: &[U]) -> bool {
        let percentage = Self::completion_percentage(units);
        owner.set_completion_percentage(percentage);

        if percentage >= 100.0 && owner.status() != OwnerStatus::Completed {
            owner.set_status(OwnerStatus::Completed);
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stride_core::{LearningPath, PathId, PathNode, StudentId, UnitId, UnitStatus};

    fn node(path_id: PathId, sequence: u32, status: UnitStatus) -> PathNode {
        PathNode {
            id: UnitId::new(),
            path_id,
            sequence,
            concept: format!("concept-{}", sequence),
            difficulty: 5,
            estimated_minutes: 30,
            minutes_spent: 0,
            prerequisites: vec![],
            status,
            mastery_score: None,
            attempts_count: 0,
            completed_at: None,
        }
    }

    #[test]
    fn percentage_counts_completed_and_skipped() {
        let id = PathId::new();
        let units = vec![
            node(id, 1, UnitStatus::Completed),
            node(id, 2, UnitStatus::Skipped),
            node(id, 3, UnitStatus::Unlocked),
        ];
        let pct = ProgressAggregator::completion_percentage(&units);
        assert!((pct - 66.666).abs() < 0.01);
    }

    #[test]
    fn empty_owner_is_zero_percent() {
        let units: Vec<PathNode> = vec![];
        assert_eq!(ProgressAggregator::completion_percentage(&units), 0.0);
    }

    #[test]
    fn owner_flips_to_completed_exactly_at_full_completion() {
        let mut path = LearningPath::new(StudentId::new(), "algebra", 5, 60);
        let id = path.id;

        let partial = vec![
            node(id, 1, UnitStatus::Completed),
            node(id, 2, UnitStatus::Unlocked),
        ];
        assert!(!ProgressAggregator::apply(&mut path, &partial));
        assert_eq!(path.status, OwnerStatus::Active);
        assert!((path.completion_percentage - 50.0).abs() < f32::EPSILON);

        let full = vec![
            node(id, 1, UnitStatus::Completed),
            node(id, 2, UnitStatus::Completed),
        ];
        assert!(ProgressAggregator::apply(&mut path, &full));
        assert_eq!(path.status, OwnerStatus::Completed);
        assert_eq!(path.completion_percentage, 100.0);

        // Re-applying is a no-op: already completed, no new flip.
        assert!(!ProgressAggregator::apply(&mut path, &full));
        assert_eq!(path.status, OwnerStatus::Completed);
    }

    #[test]
    fn paused_owner_still_completes_at_one_hundred() {
        let mut path = LearningPath::new(StudentId::new(), "algebra", 5, 30);
        path.status = OwnerStatus::Paused;
        let id = path.id;

        let full = vec![node(id, 1, UnitStatus::Skipped)];
        assert!(ProgressAggregator::apply(&mut path, &full));
        assert_eq!(path.status, OwnerStatus::Completed);
    }
}
