//! In-process document collection shared by the store backends.

use crate::error::{StoreError, StoreResult};
use crate::models::{NewTask, Task, TaskId, TaskPatch};

/// Insertion-ordered task documents.
#[derive(Debug, Clone, Default)]
pub(crate) struct Collection {
    tasks: Vec<Task>,
}

impl Collection {
    pub(crate) fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub(crate) fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub(crate) fn insert(&mut self, new_task: NewTask) -> StoreResult<Task> {
        let mut task = new_task.into_task()?;
        // v4 collisions are not expected, but ids must stay unique
        while self.position(&task.id).is_some() {
            task.id = TaskId::generate();
        }
        self.tasks.push(task.clone());
        Ok(task)
    }

    pub(crate) fn get(&self, id: &TaskId) -> StoreResult<Task> {
        self.tasks
            .iter()
            .find(|t| &t.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    pub(crate) fn update(&mut self, id: &TaskId, patch: TaskPatch) -> StoreResult<Task> {
        let task = self.get_mut(id)?;
        patch.validate()?;
        patch.apply(task);
        Ok(task.clone())
    }

    pub(crate) fn toggle(&mut self, id: &TaskId) -> StoreResult<Task> {
        let task = self.get_mut(id)?;
        TaskPatch {
            completed: Some(!task.completed),
            ..TaskPatch::default()
        }
        .apply(task);
        Ok(task.clone())
    }

    pub(crate) fn remove(&mut self, id: &TaskId) -> StoreResult<()> {
        let index = self.position(id).ok_or_else(|| not_found(id))?;
        self.tasks.remove(index);
        Ok(())
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == id)
    }

    fn get_mut(&mut self, id: &TaskId) -> StoreResult<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: &TaskId) -> StoreError {
    StoreError::NotFound(id.to_string())
}
