//! In-memory storage implementation.
//!
//! Backs unit and engine tests, and works as a scratch backend for callers
//! that do not need durability.

use super::{Result, Storage};
use std::collections::HashMap;
use stride_core::{
    BreakdownId, Event, EventId, LearningPath, MicroTask, PathId, PathNode, StudentId,
    TaskBreakdown, UnitId,
};

/// Non-durable storage backend holding everything in process memory.
#[derive(Default)]
pub struct MemoryStorage {
    paths: HashMap<PathId, LearningPath>,
    nodes: HashMap<UnitId, PathNode>,
    breakdowns: HashMap<BreakdownId, TaskBreakdown>,
    micro_tasks: HashMap<UnitId, MicroTask>,
    events: HashMap<EventId, Event>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn save_path(&mut self, path: &LearningPath) -> Result<()> {
        self.paths.insert(path.id, path.clone());
        Ok(())
    }

    async fn load_path(&self, id: PathId) -> Result<Option<LearningPath>> {
        Ok(self.paths.get(&id).cloned())
    }

    async fn list_paths(&self, student_id: StudentId) -> Result<Vec<LearningPath>> {
        let mut paths: Vec<_> = self
            .paths
            .values()
            .filter(|p| p.student_id == student_id)
            .cloned()
            .collect();
        paths.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(paths)
    }

    async fn save_node(&mut self, node: &PathNode) -> Result<()> {
        self.nodes.insert(node.id, node.clone());
        Ok(())
    }

    async fn load_node(&self, id: UnitId) -> Result<Option<PathNode>> {
        Ok(self.nodes.get(&id).cloned())
    }

    async fn list_nodes(&self, path_id: PathId) -> Result<Vec<PathNode>> {
        let mut nodes: Vec<_> = self
            .nodes
            .values()
            .filter(|n| n.path_id == path_id)
            .cloned()
            .collect();
        nodes.sort_by_key(|n| n.sequence);
        Ok(nodes)
    }

    async fn save_breakdown(&mut self, breakdown: &TaskBreakdown) -> Result<()> {
        self.breakdowns.insert(breakdown.id, breakdown.clone());
        Ok(())
    }

    async fn load_breakdown(&self, id: BreakdownId) -> Result<Option<TaskBreakdown>> {
        Ok(self.breakdowns.get(&id).cloned())
    }

    async fn list_breakdowns(&self, student_id: StudentId) -> Result<Vec<TaskBreakdown>> {
        let mut breakdowns: Vec<_> = self
            .breakdowns
            .values()
            .filter(|b| b.student_id == student_id)
            .cloned()
            .collect();
        breakdowns.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
        Ok(breakdowns)
    }

    async fn save_micro_task(&mut self, task: &MicroTask) -> Result<()> {
        self.micro_tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn load_micro_task(&self, id: UnitId) -> Result<Option<MicroTask>> {
        Ok(self.micro_tasks.get(&id).cloned())
    }

    async fn list_micro_tasks(&self, breakdown_id: BreakdownId) -> Result<Vec<MicroTask>> {
        let mut tasks: Vec<_> = self
            .micro_tasks
            .values()
            .filter(|t| t.breakdown_id == breakdown_id)
            .cloned()
            .collect();
        tasks.sort_by_key(|t| t.sequence);
        Ok(tasks)
    }

    async fn save_event(&mut self, event: &Event) -> Result<()> {
        self.events.insert(event.id, event.clone());
        Ok(())
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        let mut events: Vec<_> = self.events.values().cloned().collect();
        events.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(events)
    }
}
