//! Engine error taxonomy.

use stride_core::{OwnerStatus, UnitId, UnitStatus, MAX_SCORE};
use stride_generation::GenerationError;
use stride_storage::StorageError;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by the progression engine.
///
/// Not-found and invalid-transition variants are client errors and not
/// retryable. Storage failures are transient: every engine step is
/// idempotent or safely re-runnable from the current persisted state.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Unknown owner id
    #[error("owner not found: {0}")]
    OwnerNotFound(String),

    /// Unknown unit id
    #[error("unit not found: {0}")]
    UnitNotFound(UnitId),

    /// The unit's current status does not permit the requested action
    #[error("cannot {action} a {from} unit")]
    InvalidTransition {
        /// Current unit status
        from: UnitStatus,
        /// What the caller tried to do
        action: &'static str,
    },

    /// The owner's current status does not permit the requested action
    #[error("cannot {action} a {from} owner")]
    InvalidOwnerTransition {
        /// Current owner status
        from: OwnerStatus,
        /// What the caller tried to do
        action: &'static str,
    },

    /// Mastery score outside 0-100
    #[error("mastery score {0} is out of range (0-{MAX_SCORE})")]
    InvalidScore(u8),

    /// Transient storage failure; the operation may be retried
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Generation or plan validation failed during owner creation
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// The unit's completion is durable but a follow-on step (propagation,
    /// aggregation or the owner write) failed. Run `repair` on the owner to
    /// finish; the completed unit is never rolled back.
    #[error(
        "unit {unit} completed but follow-up work for owner {owner} failed, repair required: {source}"
    )]
    FollowUpRequired {
        /// Owner whose propagation/aggregation must be re-run
        owner: String,
        /// The durably completed (or skipped) unit
        unit: UnitId,
        /// The underlying storage failure
        source: StorageError,
    },
}

impl EngineError {
    /// Whether the caller may retry (directly, or via `repair` for
    /// [`EngineError::FollowUpRequired`]).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::FollowUpRequired { .. })
    }
}
