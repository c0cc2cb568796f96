//! Outcome recording and unit state transitions.

use crate::error::{EngineError, Result};
use stride_core::{Outcome, ProgressUnit, Time, UnitStatus, MAX_SCORE};

/// Applies attempt outcomes and the one-way completion transition.
///
/// All methods are pure state transitions on an in-memory unit; persistence
/// and follow-on propagation belong to the engine.
pub struct MasteryRecorder;

impl MasteryRecorder {
    /// Reject scores outside 0-100.
    pub fn validate_score(outcome: &Outcome) -> Result<()> {
        if outcome.score > MAX_SCORE {
            return Err(EngineError::InvalidScore(outcome.score));
        }
        Ok(())
    }

    /// Record a completion outcome: the unit must be `Unlocked` or
    /// `InProgress`. Counts the attempt, stores the score (latest attempt
    /// wins) and completes the unit. Completion is one-way; calling this on
    /// an already-completed unit is a client error, not a re-attempt.
    pub fn complete<U: ProgressUnit>(unit: &mut U, outcome: &Outcome, at: Time) -> Result<()> {
        Self::validate_score(outcome)?;
        if !unit.status().can_record_outcome() {
            return Err(EngineError::InvalidTransition {
                from: unit.status(),
                action: "complete",
            });
        }
        unit.record_attempt(outcome);
        unit.mark_completed(at);
        Ok(())
    }

    /// Record a non-completing attempt (a failed or partial try). Counts the
    /// attempt and overwrites the stored score without changing status.
    pub fn attempt<U: ProgressUnit>(unit: &mut U, outcome: &Outcome) -> Result<()> {
        Self::validate_score(outcome)?;
        if !unit.status().can_record_outcome() {
            return Err(EngineError::InvalidTransition {
                from: unit.status(),
                action: "record an attempt against",
            });
        }
        unit.record_attempt(outcome);
        Ok(())
    }

    /// Move an `Unlocked` unit to `InProgress`.
    pub fn start<U: ProgressUnit>(unit: &mut U) -> Result<()> {
        if !unit.status().can_start() {
            return Err(EngineError::InvalidTransition {
                from: unit.status(),
                action: "start",
            });
        }
        unit.set_status(UnitStatus::InProgress);
        Ok(())
    }

    /// Explicitly bypass an `Unlocked` or `InProgress` unit. Skips carry no
    /// score, so attempts and mastery are untouched.
    pub fn skip<U: ProgressUnit>(unit: &mut U) -> Result<()> {
        if !unit.status().can_skip() {
            return Err(EngineError::InvalidTransition {
                from: unit.status(),
                action: "skip",
            });
        }
        unit.set_status(UnitStatus::Skipped);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stride_core::{PathId, PathNode, UnitId};

    fn unit(status: UnitStatus) -> PathNode {
        PathNode {
            id: UnitId::new(),
            path_id: PathId::new(),
            sequence: 1,
            concept: "fractions".to_string(),
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
    fn completing_an_unlocked_unit_records_everything() {
        let mut u = unit(UnitStatus::Unlocked);
        MasteryRecorder::complete(&mut u, &Outcome::new(85, 25), chrono::Utc::now()).unwrap();

        assert_eq!(u.status, UnitStatus::Completed);
        assert_eq!(u.mastery_score, Some(85));
        assert_eq!(u.attempts_count, 1);
        assert!(u.completed_at.is_some());
    }

    #[test]
    fn completing_a_locked_unit_is_rejected() {
        let mut u = unit(UnitStatus::Locked);
        let err =
            MasteryRecorder::complete(&mut u, &Outcome::new(85, 25), chrono::Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidTransition {
                from: UnitStatus::Locked,
                ..
            }
        ));
        assert_eq!(u.status, UnitStatus::Locked);
        assert_eq!(u.attempts_count, 0);
    }

    #[test]
    fn duplicate_completion_is_rejected_without_side_effects() {
        let mut u = unit(UnitStatus::Unlocked);
        MasteryRecorder::complete(&mut u, &Outcome::new(85, 25), chrono::Utc::now()).unwrap();
        let completed_at = u.completed_at;

        let err =
            MasteryRecorder::complete(&mut u, &Outcome::new(95, 5), chrono::Utc::now()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidTransition { .. }));
        assert_eq!(u.attempts_count, 1);
        assert_eq!(u.mastery_score, Some(85));
        assert_eq!(u.completed_at, completed_at);
    }

    #[test]
    fn out_of_range_score_is_rejected_before_any_change() {
        let mut u = unit(UnitStatus::Unlocked);
        let err =
            MasteryRecorder::complete(&mut u, &Outcome::new(101, 5), chrono::Utc::now()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidScore(101)));
        assert_eq!(u.status, UnitStatus::Unlocked);
        assert_eq!(u.attempts_count, 0);
    }

    #[test]
    fn attempts_overwrite_score_without_completing() {
        let mut u = unit(UnitStatus::InProgress);
        MasteryRecorder::attempt(&mut u, &Outcome::new(40, 15)).unwrap();
        MasteryRecorder::attempt(&mut u, &Outcome::new(55, 10)).unwrap();

        assert_eq!(u.status, UnitStatus::InProgress);
        assert_eq!(u.attempts_count, 2);
        assert_eq!(u.mastery_score, Some(55));
        assert!(u.completed_at.is_none());
    }

    #[test]
    fn start_requires_unlocked() {
        let mut u = unit(UnitStatus::Unlocked);
        MasteryRecorder::start(&mut u).unwrap();
        assert_eq!(u.status, UnitStatus::InProgress);

        let mut locked = unit(UnitStatus::Locked);
        assert!(MasteryRecorder::start(&mut locked).is_err());

        let mut in_progress = unit(UnitStatus::InProgress);
        assert!(MasteryRecorder::start(&mut in_progress).is_err());
    }

    #[test]
    fn skip_leaves_attempts_and_mastery_untouched() {
        let mut u = unit(UnitStatus::InProgress);
        MasteryRecorder::skip(&mut u).unwrap();
        assert_eq!(u.status, UnitStatus::Skipped);
        assert_eq!(u.attempts_count, 0);
        assert_eq!(u.mastery_score, None);

        let mut done = unit(UnitStatus::Completed);
        assert!(MasteryRecorder::skip(&mut done).is_err());
    }
}
