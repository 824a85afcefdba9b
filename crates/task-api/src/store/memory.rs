//! In-memory store implementation.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::collection::Collection;
use super::TaskStore;
use crate::error::{StoreError, StoreResult};
use crate::models::{NewTask, Task, TaskId, TaskPatch};

/// Process-local store. Contents are lost when the process exits.
#[derive(Debug)]
pub struct MemoryStore {
    /// `None` once closed
    inner: RwLock<Option<Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Some(Collection::default())),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert(&self, new_task: NewTask) -> StoreResult<Task> {
        let mut guard = self.inner.write().await;
        guard.as_mut().ok_or(StoreError::Unavailable)?.insert(new_task)
    }

    async fn list_all(&self) -> StoreResult<Vec<Task>> {
        let guard = self.inner.read().await;
        Ok(guard.as_ref().ok_or(StoreError::Unavailable)?.tasks().to_vec())
    }

    async fn get_by_id(&self, id: &TaskId) -> StoreResult<Task> {
        let guard = self.inner.read().await;
        guard.as_ref().ok_or(StoreError::Unavailable)?.get(id)
    }

    async fn update(&self, id: &TaskId, patch: TaskPatch) -> StoreResult<Task> {
        let mut guard = self.inner.write().await;
        guard.as_mut().ok_or(StoreError::Unavailable)?.update(id, patch)
    }

    async fn toggle_completed(&self, id: &TaskId) -> StoreResult<Task> {
        let mut guard = self.inner.write().await;
        guard.as_mut().ok_or(StoreError::Unavailable)?.toggle(id)
    }

    async fn delete_by_id(&self, id: &TaskId) -> StoreResult<()> {
        let mut guard = self.inner.write().await;
        guard.as_mut().ok_or(StoreError::Unavailable)?.remove(id)
    }

    async fn close(&self) -> StoreResult<()> {
        self.inner.write().await.take();
        Ok(())
    }
}
