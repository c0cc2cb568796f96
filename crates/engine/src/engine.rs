//! The progression engine - orchestrates recording, propagation, aggregation
//! and difficulty control per owner.

use crate::aggregator::ProgressAggregator;
use crate::difficulty::{Adjustment, DifficultyController};
use crate::error::{EngineError, Result};
use crate::mastery::MasteryRecorder;
use crate::propagator::UnlockPropagator;
use std::collections::HashMap;
use std::sync::Arc;
use stride_core::{
    Event, EventAction, LearningPath, MicroTask, Outcome, OwnerStatus, PathNode, ProgressOwner,
    ProgressUnit, StudentId, TaskBreakdown, Time, UnitId,
};
use stride_generation::UnitGenerator;
use stride_storage::{
    BreakdownStore, GraphStore, OwnerIdOf, PathStore, Storage, StorageError,
};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Difficulty level a freshly generated learning path starts at.
const DEFAULT_DIFFICULTY: u8 = 5;

/// The progression engine for one graph family.
///
/// Operations on different owners run fully in parallel; operations on the
/// same owner are serialized behind a per-owner mutex, because the
/// propagator's read-scan-then-write is not safe under interleaving (two
/// racing completions could each read a stale unit set and both fail to
/// unlock a dependent that their combination satisfies).
pub struct ProgressionEngine<G: GraphStore> {
    store: G,
    generator: Arc<dyn UnitGenerator>,
    propagator: UnlockPropagator,
    locks: Mutex<HashMap<OwnerIdOf<G>, Arc<Mutex<()>>>>,
}

impl<G: GraphStore> ProgressionEngine<G> {
    /// Create an engine over a graph store and a unit generator.
    pub fn new(store: G, generator: Arc<dyn UnitGenerator>) -> Self {
        Self {
            store,
            generator,
            propagator: UnlockPropagator::new(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Get a reference to the underlying graph store.
    pub fn store(&self) -> &G {
        &self.store
    }

    async fn owner_lock(&self, owner: OwnerIdOf<G>) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(owner)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn load_owner_required(&self, owner: OwnerIdOf<G>) -> Result<G::Owner> {
        self.store
            .load_owner(owner)
            .await?
            .ok_or_else(|| EngineError::OwnerNotFound(owner.to_string()))
    }

    async fn load_unit_required(&self, unit: UnitId) -> Result<G::Unit> {
        self.store
            .load_unit(unit)
            .await?
            .ok_or(EngineError::UnitNotFound(unit))
    }

    /// Read-only owner lookup.
    pub async fn get_owner(&self, owner: OwnerIdOf<G>) -> Result<G::Owner> {
        self.load_owner_required(owner).await
    }

    /// Read-only unit listing, in sequence order.
    pub async fn get_units(&self, owner: OwnerIdOf<G>) -> Result<Vec<G::Unit>> {
        self.load_owner_required(owner).await?;
        Ok(self.store.list_units(owner).await?)
    }

    /// List a student's owners, most recent first.
    pub async fn owners_for_student(&self, student: StudentId) -> Result<Vec<G::Owner>> {
        Ok(self.store.list_owners(student).await?)
    }

    /// Record a completion outcome against a unit and run the full
    /// follow-up: unlock propagation, progress aggregation, then the
    /// difficulty controller, synchronously in that order.
    ///
    /// Once the unit's completion is durable it is never rolled back; if
    /// any follow-on step fails the call returns
    /// [`EngineError::FollowUpRequired`] and [`repair`](Self::repair)
    /// finishes the job.
    pub async fn complete_unit(&self, unit_id: UnitId, outcome: Outcome) -> Result<G::Unit> {
        MasteryRecorder::validate_score(&outcome)?;

        let probe = self.load_unit_required(unit_id).await?;
        let owner_id = probe.owner_id();
        let lock = self.owner_lock(owner_id).await;
        let _guard = lock.lock().await;

        // Re-read under the lock; the probe may be stale.
        let mut unit = self.load_unit_required(unit_id).await?;
        let mut owner = self.load_owner_required(owner_id).await?;

        let now = chrono::Utc::now();
        MasteryRecorder::complete(&mut unit, &outcome, now)?;
        self.store.save_unit(&unit).await?;
        info!(
            "unit {} completed with score {} (owner {})",
            unit_id, outcome.score, owner_id
        );

        self.follow_up(&mut owner, &unit, Some(outcome.score), EventAction::UnitCompleted, now)
            .await
            .map_err(|source| EngineError::FollowUpRequired {
                owner: owner_id.to_string(),
                unit: unit_id,
                source,
            })?;

        Ok(unit)
    }

    /// Explicitly bypass a unit. The skip satisfies downstream prerequisites
    /// and counts toward completion, but carries no score: attempts, mastery
    /// and the difficulty controller are untouched.
    pub async fn skip_unit(&self, unit_id: UnitId) -> Result<G::Unit> {
        let probe = self.load_unit_required(unit_id).await?;
        let owner_id = probe.owner_id();
        let lock = self.owner_lock(owner_id).await;
        let _guard = lock.lock().await;

        let mut unit = self.load_unit_required(unit_id).await?;
        let mut owner = self.load_owner_required(owner_id).await?;

        let now = chrono::Utc::now();
        MasteryRecorder::skip(&mut unit)?;
        self.store.save_unit(&unit).await?;
        info!("unit {} skipped (owner {})", unit_id, owner_id);

        self.follow_up(&mut owner, &unit, None, EventAction::UnitSkipped, now)
            .await
            .map_err(|source| EngineError::FollowUpRequired {
                owner: owner_id.to_string(),
                unit: unit_id,
                source,
            })?;

        Ok(unit)
    }

    /// Move an unlocked unit to in-progress and point the owner's current
    /// unit at it.
    pub async fn start_unit(&self, unit_id: UnitId) -> Result<G::Unit> {
        let probe = self.load_unit_required(unit_id).await?;
        let owner_id = probe.owner_id();
        let lock = self.owner_lock(owner_id).await;
        let _guard = lock.lock().await;

        let mut unit = self.load_unit_required(unit_id).await?;
        let mut owner = self.load_owner_required(owner_id).await?;

        MasteryRecorder::start(&mut unit)?;
        self.store.save_unit(&unit).await?;

        owner.set_current_unit(Some(unit_id));
        owner.touch(chrono::Utc::now());
        self.store.save_owner(&owner).await?;

        Ok(unit)
    }

    /// Record a non-completing attempt: counts the attempt and overwrites
    /// the stored score, leaving status and the rest of the engine alone.
    pub async fn record_attempt(&self, unit_id: UnitId, outcome: Outcome) -> Result<G::Unit> {
        MasteryRecorder::validate_score(&outcome)?;

        let probe = self.load_unit_required(unit_id).await?;
        let owner_id = probe.owner_id();
        let lock = self.owner_lock(owner_id).await;
        let _guard = lock.lock().await;

        let mut unit = self.load_unit_required(unit_id).await?;
        MasteryRecorder::attempt(&mut unit, &outcome)?;
        self.store.save_unit(&unit).await?;
        debug!(
            "attempt {} recorded against unit {} (owner {})",
            unit.attempts_count(),
            unit_id,
            owner_id
        );

        Ok(unit)
    }

    /// Pause an active owner. Client-controlled; the engine only flips
    /// owners to completed.
    pub async fn pause(&self, owner_id: OwnerIdOf<G>) -> Result<G::Owner> {
        let lock = self.owner_lock(owner_id).await;
        let _guard = lock.lock().await;

        let mut owner = self.load_owner_required(owner_id).await?;
        if !owner.status().can_pause() {
            return Err(EngineError::InvalidOwnerTransition {
                from: owner.status(),
                action: "pause",
            });
        }
        owner.set_status(OwnerStatus::Paused);
        owner.touch(chrono::Utc::now());
        self.store.save_owner(&owner).await?;
        Ok(owner)
    }

    /// Resume a paused owner.
    pub async fn resume(&self, owner_id: OwnerIdOf<G>) -> Result<G::Owner> {
        let lock = self.owner_lock(owner_id).await;
        let _guard = lock.lock().await;

        let mut owner = self.load_owner_required(owner_id).await?;
        if !owner.status().can_resume() {
            return Err(EngineError::InvalidOwnerTransition {
                from: owner.status(),
                action: "resume",
            });
        }
        owner.set_status(OwnerStatus::Active);
        owner.touch(chrono::Utc::now());
        self.store.save_owner(&owner).await?;
        Ok(owner)
    }

    /// Re-run the propagation-and-aggregation phase for an owner, without
    /// re-recording any mastery. This is the repair path after
    /// [`EngineError::FollowUpRequired`]; both phases recompute from
    /// current persisted state, so running it again is always safe.
    pub async fn repair(&self, owner_id: OwnerIdOf<G>) -> Result<G::Owner> {
        let lock = self.owner_lock(owner_id).await;
        let _guard = lock.lock().await;

        let mut owner = self.load_owner_required(owner_id).await?;

        let unlocked = self.propagator.propagate(&self.store, owner_id).await?;
        if !unlocked.is_empty() {
            info!("repair unlocked {} unit(s) for owner {}", unlocked.len(), owner_id);
        }

        let units = self.store.list_units(owner_id).await?;
        let newly_completed = ProgressAggregator::apply(&mut owner, &units);

        owner.touch(chrono::Utc::now());
        self.store.save_owner(&owner).await?;

        if newly_completed {
            self.record_owner_completed(&owner).await?;
        }
        Ok(owner)
    }

    /// Everything that follows a durable terminal unit write: the completion
    /// fact, unlock propagation, the progress rollup, the difficulty signal,
    /// and the owner write.
    async fn follow_up(
        &self,
        owner: &mut G::Owner,
        unit: &G::Unit,
        score: Option<u8>,
        action: EventAction,
        now: Time,
    ) -> std::result::Result<(), StorageError> {
        let owner_id = owner.id();

        self.store
            .record_event(&Event::new(
                action,
                owner_id.to_string(),
                Some(unit.id().to_string()),
                serde_json::json!({
                    "score": score,
                    "attempts": unit.attempts_count(),
                }),
            ))
            .await?;

        let unlocked = self.propagator.propagate(&self.store, owner_id).await?;
        if !unlocked.is_empty() {
            debug!("completion of {} unlocked {:?}", unit.id(), unlocked);
        }

        let units = self.store.list_units(owner_id).await?;
        let newly_completed = ProgressAggregator::apply(owner, &units);

        let adjustment = match score {
            Some(score) => DifficultyController::adjust(owner, score),
            None => Adjustment::Unchanged,
        };

        if owner.current_unit() == Some(unit.id()) {
            owner.set_current_unit(None);
        }

        owner.touch(now);
        self.store.save_owner(owner).await?;

        // Facts about the owner go out only once the owner write is durable.
        match adjustment {
            Adjustment::Raised(level) | Adjustment::Lowered(level) => {
                info!("difficulty for owner {} now {}", owner_id, level);
                self.store
                    .record_event(&Event::new(
                        EventAction::DifficultyAdjusted,
                        owner_id.to_string(),
                        Some(unit.id().to_string()),
                        serde_json::json!({
                            "level": level,
                            "score": score,
                        }),
                    ))
                    .await?;
            }
            Adjustment::Unchanged => {}
        }

        if newly_completed {
            self.record_owner_completed(owner).await?;
        }
        Ok(())
    }

    async fn record_owner_completed(
        &self,
        owner: &G::Owner,
    ) -> std::result::Result<(), StorageError> {
        info!("owner {} reached full completion", owner.id());
        self.store
            .record_event(&Event::new(
                EventAction::OwnerCompleted,
                owner.id().to_string(),
                None,
                serde_json::json!({
                    "adaptations": owner.adaptation_count(),
                }),
            ))
            .await
    }
}

impl<S: Storage + 'static> ProgressionEngine<PathStore<S>> {
    /// Generate and persist a new learning path for a student and subject.
    /// Nodes with no prerequisites are born unlocked; everything else waits
    /// locked for the propagator.
    pub async fn create_path(
        &self,
        student_id: StudentId,
        subject: &str,
    ) -> Result<LearningPath> {
        let plan = self.generator.generate(subject).await?;
        plan.validate()?;

        let path = LearningPath::new(
            student_id,
            subject,
            DEFAULT_DIFFICULTY,
            plan.total_estimated_minutes(),
        );

        let ids: Vec<UnitId> = plan.units.iter().map(|_| UnitId::new()).collect();
        let nodes: Vec<PathNode> = plan
            .units
            .iter()
            .enumerate()
            .map(|(index, draft)| {
                let prerequisites: Vec<UnitId> =
                    draft.prerequisites.iter().map(|&i| ids[i]).collect();
                PathNode {
                    id: ids[index],
                    path_id: path.id,
                    sequence: (index + 1) as u32,
                    concept: draft.title.clone(),
                    difficulty: draft.difficulty.weight(),
                    estimated_minutes: draft.estimated_minutes,
                    minutes_spent: 0,
                    status: stride_core::initial_status(&prerequisites),
                    prerequisites,
                    mastery_score: None,
                    attempts_count: 0,
                    completed_at: None,
                }
            })
            .collect();

        self.store.save_owner(&path).await?;
        for node in &nodes {
            self.store.save_unit(node).await?;
        }
        info!("created learning path {} with {} nodes", path.id, nodes.len());

        Ok(path)
    }
}

impl<S: Storage + 'static> ProgressionEngine<BreakdownStore<S>> {
    /// Generate and persist a new breakdown of an assignment into
    /// micro-tasks. The breakdown's static difficulty score is the rounded
    /// mean of the generated tiers; the adaptive level starts from the same
    /// value and diverges from there.
    pub async fn create_breakdown(
        &self,
        original_task_id: &str,
        student_id: StudentId,
        description: &str,
    ) -> Result<TaskBreakdown> {
        let plan = self.generator.generate(description).await?;
        plan.validate()?;

        let mut breakdown = TaskBreakdown::new(
            original_task_id,
            student_id,
            description,
            plan.rationale.clone(),
        );

        let ids: Vec<UnitId> = plan.units.iter().map(|_| UnitId::new()).collect();
        let tasks: Vec<MicroTask> = plan
            .units
            .iter()
            .enumerate()
            .map(|(index, draft)| {
                let prerequisites: Vec<UnitId> =
                    draft.prerequisites.iter().map(|&i| ids[i]).collect();
                MicroTask {
                    id: ids[index],
                    breakdown_id: breakdown.id,
                    sequence: (index + 1) as u32,
                    title: draft.title.clone(),
                    description: draft.description.clone(),
                    estimated_minutes: draft.estimated_minutes,
                    actual_minutes: 0,
                    difficulty: draft.difficulty,
                    status: stride_core::initial_status(&prerequisites),
                    prerequisites,
                    resources: draft.resources.clone(),
                    mastery_score: None,
                    attempts_count: 0,
                    completed_at: None,
                }
            })
            .collect();

        breakdown.total_estimated_minutes = plan.total_estimated_minutes();
        breakdown.difficulty_score = DifficultyController::static_score(&tasks);
        breakdown.difficulty_level = breakdown.difficulty_score;

        self.store.save_owner(&breakdown).await?;
        for task in &tasks {
            self.store.save_unit(task).await?;
        }
        info!(
            "created breakdown {} with {} micro-tasks (difficulty score {})",
            breakdown.id,
            tasks.len(),
            breakdown.difficulty_score
        );

        Ok(breakdown)
    }
}
