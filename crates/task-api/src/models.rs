//! Task document and the inputs accepted by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{StoreError, StoreResult};

/// Store-assigned task identifier.
///
/// Only the store constructs new ids; callers receive them from `insert`
/// and pass them back verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generate a fresh identifier (32 lowercase hex characters).
    pub(crate) fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Wrap an identifier received from a caller.
    pub fn parse(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a task.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Build the document for this input, assigning a fresh id.
    pub(crate) fn into_task(self) -> StoreResult<Task> {
        let title = validate_title(self.title.as_deref())?;
        let now = Utc::now();
        Ok(Task {
            id: TaskId::generate(),
            title,
            description: self.description.unwrap_or_default(),
            completed: self.completed.unwrap_or(false),
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial update; `None` fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// Check the patch before touching the stored document.
    pub(crate) fn validate(&self) -> StoreResult<()> {
        if self.title.is_some() {
            validate_title(self.title.as_deref())?;
        }
        Ok(())
    }

    /// Apply the supplied fields to `task`. Call `validate` first.
    pub(crate) fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        task.updated_at = Utc::now();
    }
}

fn validate_title(title: Option<&str>) -> StoreResult<String> {
    match title.map(str::trim) {
        Some(t) if !t.is_empty() => Ok(t.to_string()),
        Some(_) => Err(StoreError::Validation("Title must not be empty".to_string())),
        None => Err(StoreError::Validation("Title is required".to_string())),
    }
}
