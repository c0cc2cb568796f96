//! Adaptive difficulty control.
//!
//! Two unrelated scalars live near each other and must not be conflated:
//! the *adaptive* difficulty level, stepped by a bang-bang controller from
//! each completion's mastery score, and the *static* difficulty score a
//! breakdown carries, which is a rounded mean of its micro-task tiers and
//! never feeds back from mastery.

use stride_core::{ProgressOwner, WeightedUnit};

/// Result of one controller evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// Difficulty stepped up to this level
    Raised(u8),
    /// Difficulty stepped down to this level
    Lowered(u8),
    /// Score fell in the neutral band, or the bound was already reached
    Unchanged,
}

/// Bang-bang difficulty controller.
pub struct DifficultyController;

impl DifficultyController {
    /// Scores below this step the difficulty down.
    pub const LOWER_THRESHOLD: u8 = 60;

    /// Scores above this step the difficulty up.
    pub const UPPER_THRESHOLD: u8 = 90;

    /// Difficulty floor.
    pub const MIN_LEVEL: u8 = 1;

    /// Difficulty ceiling.
    pub const MAX_LEVEL: u8 = 10;

    /// Evaluate one mastery score against the owner's current difficulty
    /// and apply at most one step, clamped to [1, 10]. The asymmetric
    /// 60/90 thresholds leave a wide neutral band, so near-average
    /// performance does not oscillate the level. Each actual change bumps
    /// the owner's adaptation count; a no-change evaluation does not.
    pub fn adjust<O: ProgressOwner>(owner: &mut O, score: u8) -> Adjustment {
        let current = owner.difficulty_level();

        let target = if score < Self::LOWER_THRESHOLD {
            current.saturating_sub(1).max(Self::MIN_LEVEL)
        } else if score > Self::UPPER_THRESHOLD {
            (current + 1).min(Self::MAX_LEVEL)
        } else {
            current
        };

        if target == current {
            return Adjustment::Unchanged;
        }

        owner.set_difficulty_level(target);
        owner.bump_adaptation_count();

        if target > current {
            Adjustment::Raised(target)
        } else {
            Adjustment::Lowered(target)
        }
    }

    /// Static difficulty score for a unit set: the rounded mean of the
    /// units' tier weights (EASY=3, MEDIUM=5, HARD=8). Defaults to the
    /// mid-scale 5 for an empty set.
    pub fn static_score<U: WeightedUnit>(units: &[U]) -> u8 {
        if units.is_empty() {
            return 5;
        }
        let sum: u32 = units.iter().map(|u| u32::from(u.difficulty_weight())).sum();
        let mean = sum as f32 / units.len() as f32;
        mean.round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stride_core::{
        BreakdownId, MicroTask, StudentId, TaskBreakdown, TaskDifficulty, UnitId, UnitStatus,
    };

    fn owner(level: u8) -> TaskBreakdown {
        let mut b = TaskBreakdown::new("task-1", StudentId::new(), "essay", "steps");
        b.difficulty_level = level;
        b
    }

    fn micro_task(breakdown_id: BreakdownId, difficulty: TaskDifficulty) -> MicroTask {
        MicroTask {
            id: UnitId::new(),
            breakdown_id,
            sequence: 1,
            title: "step".to_string(),
            description: "do it".to_string(),
            estimated_minutes: 10,
            actual_minutes: 0,
            difficulty,
            prerequisites: vec![],
            status: UnitStatus::Unlocked,
            resources: vec![],
            mastery_score: None,
            attempts_count: 0,
            completed_at: None,
        }
    }

    #[test]
    fn low_score_steps_down_and_counts_the_adaptation() {
        let mut o = owner(5);
        assert_eq!(DifficultyController::adjust(&mut o, 40), Adjustment::Lowered(4));
        assert_eq!(o.difficulty_level, 4);
        assert_eq!(o.adaptation_count, 1);
    }

    #[test]
    fn high_score_steps_up() {
        let mut o = owner(5);
        assert_eq!(DifficultyController::adjust(&mut o, 95), Adjustment::Raised(6));
        assert_eq!(o.difficulty_level, 6);
        assert_eq!(o.adaptation_count, 1);
    }

    #[test]
    fn neutral_band_changes_nothing() {
        let mut o = owner(5);
        for score in [60, 75, 90] {
            assert_eq!(DifficultyController::adjust(&mut o, score), Adjustment::Unchanged);
        }
        assert_eq!(o.difficulty_level, 5);
        assert_eq!(o.adaptation_count, 0);
    }

    #[test]
    fn difficulty_is_clamped_at_both_bounds() {
        let mut floor = owner(1);
        assert_eq!(DifficultyController::adjust(&mut floor, 10), Adjustment::Unchanged);
        assert_eq!(floor.difficulty_level, 1);
        assert_eq!(floor.adaptation_count, 0);

        let mut ceiling = owner(10);
        assert_eq!(DifficultyController::adjust(&mut ceiling, 100), Adjustment::Unchanged);
        assert_eq!(ceiling.difficulty_level, 10);
        assert_eq!(ceiling.adaptation_count, 0);
    }

    #[test]
    fn difficulty_stays_in_bounds_over_any_sequence() {
        let mut o = owner(5);
        let scores = [10, 5, 0, 20, 15, 3, 99, 95, 100, 92, 97, 94, 91, 96, 98, 93, 50, 0, 100];
        for score in scores {
            DifficultyController::adjust(&mut o, score);
            assert!((1..=10).contains(&o.difficulty_level));
        }
    }

    #[test]
    fn static_score_is_the_rounded_tier_mean() {
        let id = BreakdownId::new();
        // Original five-step template: 3+3+5+5+3 = 19, mean 3.8, rounds to 4.
        let units = vec![
            micro_task(id, TaskDifficulty::Easy),
            micro_task(id, TaskDifficulty::Easy),
            micro_task(id, TaskDifficulty::Medium),
            micro_task(id, TaskDifficulty::Medium),
            micro_task(id, TaskDifficulty::Easy),
        ];
        assert_eq!(DifficultyController::static_score(&units), 4);

        let hard = vec![micro_task(id, TaskDifficulty::Hard)];
        assert_eq!(DifficultyController::static_score(&hard), 8);

        let empty: Vec<MicroTask> = vec![];
        assert_eq!(DifficultyController::static_score(&empty), 5);
    }

    #[test]
    fn static_score_ignores_mastery_entirely() {
        let id = BreakdownId::new();
        let mut unit = micro_task(id, TaskDifficulty::Medium);
        unit.mastery_score = Some(100);
        unit.status = UnitStatus::Completed;
        assert_eq!(DifficultyController::static_score(&[unit]), 5);
    }
}
