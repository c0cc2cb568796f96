//! JSON file storage implementation.
//!
//! Stores one pretty-printed JSON file per record under a root directory.
//! Prerequisite sets persist inside the unit records as JSON id arrays;
//! there is no separate edge table.

use super::{Result, Storage, StorageError};
use std::path::Path;
use stride_core::{
    BreakdownId, Event, LearningPath, MicroTask, PathId, PathNode, StudentId, TaskBreakdown,
    UnitId,
};
use tokio::fs;

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: std::path::PathBuf,
}

impl JsonStorage {
    /// Create storage, ensuring the per-entity subdirectories exist.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(root.join("paths")).await?;
        fs::create_dir_all(root.join("nodes")).await?;
        fs::create_dir_all(root.join("breakdowns")).await?;
        fs::create_dir_all(root.join("micro_tasks")).await?;
        fs::create_dir_all(root.join("events")).await?;

        tracing::debug!("json storage ready at {}", root.display());
        Ok(Self { root })
    }

    fn path_path(&self, id: PathId) -> std::path::PathBuf {
        self.root.join("paths").join(format!("{}.json", id))
    }
    fn node_path(&self, id: UnitId) -> std::path::PathBuf {
        self.root.join("nodes").join(format!("{}.json", id))
    }
    fn breakdown_path(&self, id: BreakdownId) -> std::path::PathBuf {
        self.root.join("breakdowns").join(format!("{}.json", id))
    }
    fn micro_task_path(&self, id: UnitId) -> std::path::PathBuf {
        self.root.join("micro_tasks").join(format!("{}.json", id))
    }
    fn event_path(&self, id: stride_core::EventId) -> std::path::PathBuf {
        self.root.join("events").join(format!("{}.json", id))
    }

    async fn write_json<T: serde::Serialize>(
        &self,
        path: &std::path::Path,
        value: &T,
    ) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        fs::write(path, json.as_bytes()).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn save_path(&mut self, path: &LearningPath) -> Result<()> {
        self.write_json(&self.path_path(path.id), path).await
    }

    async fn load_path(&self, id: PathId) -> Result<Option<LearningPath>> {
        read_json(&self.path_path(id)).await
    }

    async fn list_paths(&self, student_id: StudentId) -> Result<Vec<LearningPath>> {
        let mut paths: Vec<LearningPath> = list_dir(&self.root.join("paths")).await?;
        paths.retain(|p| p.student_id == student_id);
        paths.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(paths)
    }

    async fn save_node(&mut self, node: &PathNode) -> Result<()> {
        self.write_json(&self.node_path(node.id), node).await
    }

    async fn load_node(&self, id: UnitId) -> Result<Option<PathNode>> {
        read_json(&self.node_path(id)).await
    }

    async fn list_nodes(&self, path_id: PathId) -> Result<Vec<PathNode>> {
        let mut nodes: Vec<PathNode> = list_dir(&self.root.join("nodes")).await?;
        nodes.retain(|n| n.path_id == path_id);
        nodes.sort_by_key(|n| n.sequence);
        Ok(nodes)
    }

    async fn save_breakdown(&mut self, breakdown: &TaskBreakdown) -> Result<()> {
        self.write_json(&self.breakdown_path(breakdown.id), breakdown)
            .await
    }

    async fn load_breakdown(&self, id: BreakdownId) -> Result<Option<TaskBreakdown>> {
        read_json(&self.breakdown_path(id)).await
    }

    async fn list_breakdowns(&self, student_id: StudentId) -> Result<Vec<TaskBreakdown>> {
        let mut breakdowns: Vec<TaskBreakdown> = list_dir(&self.root.join("breakdowns")).await?;
        breakdowns.retain(|b| b.student_id == student_id);
        breakdowns.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
        Ok(breakdowns)
    }

    async fn save_micro_task(&mut self, task: &MicroTask) -> Result<()> {
        self.write_json(&self.micro_task_path(task.id), task).await
    }

    async fn load_micro_task(&self, id: UnitId) -> Result<Option<MicroTask>> {
        read_json(&self.micro_task_path(id)).await
    }

    async fn list_micro_tasks(&self, breakdown_id: BreakdownId) -> Result<Vec<MicroTask>> {
        let mut tasks: Vec<MicroTask> = list_dir(&self.root.join("micro_tasks")).await?;
        tasks.retain(|t| t.breakdown_id == breakdown_id);
        tasks.sort_by_key(|t| t.sequence);
        Ok(tasks)
    }

    async fn save_event(&mut self, event: &Event) -> Result<()> {
        self.write_json(&self.event_path(event.id), event).await
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = list_dir(&self.root.join("events")).await?;
        events.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(events)
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &std::path::Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn list_dir<T: serde::de::DeserializeOwned>(dir: &std::path::Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        if entry.path().extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        if let Ok(Some(item)) = read_json(&entry.path()).await {
            items.push(item);
        }
    }
    Ok(items)
}
