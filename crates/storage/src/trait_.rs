//! Storage trait abstraction.

use async_trait::async_trait;
use stride_core::{
    BreakdownId, Event, LearningPath, MicroTask, PathId, PathNode, StudentId, TaskBreakdown,
    UnitId,
};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Storage abstraction for Stride data.
///
/// This trait allows different storage backends to be plugged in. Loads
/// return `Ok(None)` for unknown ids; callers decide whether that is an
/// error.
#[async_trait]
pub trait Storage: Send + Sync {
    // === Learning path operations ===

    /// Save a learning path (create or update).
    async fn save_path(&mut self, path: &LearningPath) -> Result<()>;

    /// Load a learning path by ID.
    async fn load_path(&self, id: PathId) -> Result<Option<LearningPath>>;

    /// List a student's learning paths, most recently started first.
    async fn list_paths(&self, student_id: StudentId) -> Result<Vec<LearningPath>>;

    // === Path node operations ===

    /// Save a path node (create or update).
    async fn save_node(&mut self, node: &PathNode) -> Result<()>;

    /// Load a path node by ID.
    async fn load_node(&self, id: UnitId) -> Result<Option<PathNode>>;

    /// List all nodes of a path, in sequence order.
    async fn list_nodes(&self, path_id: PathId) -> Result<Vec<PathNode>>;

    // === Task breakdown operations ===

    /// Save a task breakdown (create or update).
    async fn save_breakdown(&mut self, breakdown: &TaskBreakdown) -> Result<()>;

    /// Load a task breakdown by ID.
    async fn load_breakdown(&self, id: BreakdownId) -> Result<Option<TaskBreakdown>>;

    /// List a student's breakdowns, most recently generated first.
    async fn list_breakdowns(&self, student_id: StudentId) -> Result<Vec<TaskBreakdown>>;

    // === Micro-task operations ===

    /// Save a micro-task (create or update).
    async fn save_micro_task(&mut self, task: &MicroTask) -> Result<()>;

    /// Load a micro-task by ID.
    async fn load_micro_task(&self, id: UnitId) -> Result<Option<MicroTask>>;

    /// List all micro-tasks of a breakdown, in sequence order.
    async fn list_micro_tasks(&self, breakdown_id: BreakdownId) -> Result<Vec<MicroTask>>;

    // === Event operations ===

    /// Save an event.
    async fn save_event(&mut self, event: &Event) -> Result<()>;

    /// List all events, oldest first.
    async fn list_events(&self) -> Result<Vec<Event>>;
}
