//! JSON-file store implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::debug;

use super::collection::Collection;
use super::TaskStore;
use crate::error::{StoreError, StoreResult};
use crate::models::{NewTask, Task, TaskId, TaskPatch};

/// Store backed by a single JSON document file.
///
/// The whole collection is loaded at open time and rewritten after every
/// successful write (temp file + rename, so readers never see a partial file).
#[derive(Debug)]
pub struct FileStore {
    /// Path to the tasks document
    path: PathBuf,

    /// `None` once closed
    inner: RwLock<Option<Collection>>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty collection.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let tasks = match fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => Vec::new(),
            Ok(content) => serde_json::from_str::<Vec<Task>>(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        debug!(path = %path.display(), count = tasks.len(), "Loaded task documents");

        Ok(Self {
            path,
            inner: RwLock::new(Some(Collection::from_tasks(tasks))),
        })
    }

    async fn persist(&self, collection: &Collection) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_string_pretty(collection.tasks())?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        if let Err(e) = fs::rename(&tmp, &self.path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }

    /// Run a write against a copy of the collection. The copy replaces the
    /// live collection only once it is on disk.
    async fn write<T: Send>(
        &self,
        op: impl FnOnce(&mut Collection) -> StoreResult<T> + Send,
    ) -> StoreResult<T> {
        let mut guard = self.inner.write().await;
        let mut staged = guard.as_ref().ok_or(StoreError::Unavailable)?.clone();
        let result = op(&mut staged)?;
        self.persist(&staged).await?;
        *guard = Some(staged);
        Ok(result)
    }
}

#[async_trait]
impl TaskStore for FileStore {
    async fn insert(&self, new_task: NewTask) -> StoreResult<Task> {
        self.write(|c| c.insert(new_task)).await
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
        self.write(|c| c.update(id, patch)).await
    }

    async fn toggle_completed(&self, id: &TaskId) -> StoreResult<Task> {
        self.write(|c| c.toggle(id)).await
    }

    async fn delete_by_id(&self, id: &TaskId) -> StoreResult<()> {
        self.write(|c| c.remove(id)).await
    }

    async fn close(&self) -> StoreResult<()> {
        let mut guard = self.inner.write().await;
        if let Some(collection) = guard.take() {
            self.persist(&collection).await?;
            debug!(path = %self.path.display(), "Closed task store");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_path(dir: &TempDir) -> PathBuf {
        dir.path().join("data").join("tasks.json")
    }

    #[tokio::test]
    async fn missing_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(store_path(&dir)).await.unwrap();
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn writes_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);

        let store = FileStore::open(&path).await.unwrap();
        let kept = store
            .insert(NewTask::titled("kept").with_description("on disk"))
            .await
            .unwrap();
        let dropped = store.insert(NewTask::titled("dropped")).await.unwrap();
        store.toggle_completed(&kept.id).await.unwrap();
        store.delete_by_id(&dropped.id).await.unwrap();
        store.close().await.unwrap();

        let reopened = FileStore::open(&path).await.unwrap();
        let tasks = reopened.list_all().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, kept.id);
        assert_eq!(tasks[0].description, "on disk");
        assert!(tasks[0].completed);
    }

    #[tokio::test]
    async fn failed_write_is_not_persisted() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);

        let store = FileStore::open(&path).await.unwrap();
        assert!(store.insert(NewTask::titled(" ")).await.is_err());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn failed_flush_leaves_collection_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);

        let store = FileStore::open(&path).await.unwrap();
        let kept = store.insert(NewTask::titled("kept")).await.unwrap();

        // A directory at the temp path makes the next flush fail
        let tmp = path.with_extension("json.tmp");
        std::fs::create_dir_all(&tmp).unwrap();

        assert!(store.insert(NewTask::titled("lost")).await.is_err());
        assert!(store.delete_by_id(&kept.id).await.is_err());
        assert!(store.toggle_completed(&kept.id).await.is_err());

        let tasks = store.list_all().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, kept.id);
        assert!(!tasks[0].completed);

        // Once the path is clear again, only committed writes reach disk
        std::fs::remove_dir(&tmp).unwrap();
        store.insert(NewTask::titled("next")).await.unwrap();
        let reopened = FileStore::open(&path).await.unwrap();
        let titles: Vec<_> = reopened
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, ["kept", "next"]);
    }

    #[tokio::test]
    async fn failed_rename_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);

        let store = FileStore::open(&path).await.unwrap();
        // A non-empty directory at the document path cannot be replaced
        std::fs::create_dir_all(path.join("blocker")).unwrap();

        assert!(matches!(
            store.insert(NewTask::titled("blocked")).await,
            Err(StoreError::Io(_))
        ));
        assert!(!path.with_extension("json.tmp").exists());
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_file_fails_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(&path, "{not json").unwrap();

        let result = FileStore::open(&path).await;
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }

    #[tokio::test]
    async fn closed_store_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(store_path(&dir)).await.unwrap();
        store.close().await.unwrap();
        assert!(matches!(
            store.get_by_id(&TaskId::parse("x")).await,
            Err(StoreError::Unavailable)
        ));
    }
}
