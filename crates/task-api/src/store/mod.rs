//! Storage layer for task persistence.

mod collection;
mod file;
mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::error::{StoreError, StoreResult};
use crate::models::{NewTask, Task, TaskId, TaskPatch};

pub use file::FileStore;
pub use memory::MemoryStore;

/// Task persistence contract. One collection, keyed by `id`.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Stores a new task and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] when the title is missing or blank.
    async fn insert(&self, new_task: NewTask) -> StoreResult<Task>;

    /// Snapshot of every task in insertion order.
    async fn list_all(&self) -> StoreResult<Vec<Task>>;

    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no task has `id`.
    async fn get_by_id(&self, id: &TaskId) -> StoreResult<Task>;

    /// Applies the supplied fields only.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no task has `id`, or
    /// [`StoreError::Validation`] when the patch carries a blank title.
    async fn update(&self, id: &TaskId, patch: TaskPatch) -> StoreResult<Task>;

    /// Flips `completed`.
    async fn toggle_completed(&self, id: &TaskId) -> StoreResult<Task>;

    /// Hard-deletes the task.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no task has `id`.
    async fn delete_by_id(&self, id: &TaskId) -> StoreResult<()>;

    /// Release the backing resource. Later calls fail with
    /// [`StoreError::Unavailable`]; closing twice is a no-op.
    async fn close(&self) -> StoreResult<()>;
}

/// Open the store named by a connection target.
///
/// Supported targets:
/// - `memory://` for an in-process collection
/// - `file://<path>` or a bare filesystem path for a JSON document file
pub async fn connect(target: &str) -> StoreResult<Arc<dyn TaskStore>> {
    let target = target.trim();

    if target == "memory://" || target.eq_ignore_ascii_case("memory") {
        info!("Using in-memory task store");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let path = match target.strip_prefix("file://") {
        Some(path) => path,
        None if target.contains("://") => {
            return Err(StoreError::UnsupportedTarget(target.to_string()));
        }
        None => target,
    };

    let store = FileStore::open(path).await?;
    info!(path = %path, "Connected to file task store");
    Ok(Arc::new(store))
}
