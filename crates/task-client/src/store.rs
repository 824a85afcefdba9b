//! Client-side task store.
//!
//! Holds the last-fetched task list and reconciles it with the service's
//! responses. The list is not authoritative: every mutation goes to the
//! service first and only the server's answer is merged locally.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::{info, warn};

use crate::api::TaskApi;
use crate::error::{ClientError, ClientResult};
use crate::models::{Task, TaskDraft};
use crate::notify::Notification;

/// Observable task list backed by a [`TaskApi`].
pub struct ClientTaskStore<A> {
    api: A,
    tasks: watch::Sender<Vec<Task>>,
    notification: watch::Sender<Option<Notification>>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the request finishes, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<A: TaskApi> ClientTaskStore<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            tasks: watch::Sender::new(Vec::new()),
            notification: watch::Sender::new(None),
            in_flight: AtomicBool::new(false),
        }
    }

    // =========================================================================
    // Service operations
    // =========================================================================

    /// Fetch the full list and replace the local copy.
    pub async fn load(&self) -> ClientResult<()> {
        let _guard = self.begin()?;
        match self.api.list().await {
            Ok(tasks) => {
                info!(count = tasks.len(), "Loaded tasks");
                self.tasks.send_replace(tasks);
                Ok(())
            }
            Err(e) => Err(self.fail("Failed to fetch tasks", e)),
        }
    }

    /// Create a task and append the server's copy.
    pub async fn create(&self, draft: TaskDraft) -> ClientResult<Task> {
        let _guard = self.begin()?;
        match self.api.create(&draft).await {
            Ok(task) => {
                self.add(task.clone());
                self.notify(Notification::success("Task added successfully"));
                Ok(task)
            }
            Err(e) => Err(self.fail("Failed to add task", e)),
        }
    }

    /// Update a task and replace it with the server's copy.
    pub async fn update(&self, id: &str, draft: TaskDraft) -> ClientResult<Task> {
        let _guard = self.begin()?;
        match self.api.update(id, &draft).await {
            Ok(task) => {
                self.replace(task.clone());
                self.notify(Notification::success("Task updated successfully"));
                Ok(task)
            }
            Err(e) => Err(self.fail("Failed to update task", e)),
        }
    }

    /// Flip a task's completion flag on the server.
    pub async fn toggle(&self, id: &str) -> ClientResult<Task> {
        let _guard = self.begin()?;
        match self.api.toggle(id).await {
            Ok(task) => {
                self.replace(task.clone());
                self.notify(Notification::success("Task status updated"));
                Ok(task)
            }
            Err(e) => Err(self.fail("Failed to update task status", e)),
        }
    }

    /// Delete a task and drop it from the local list.
    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        let _guard = self.begin()?;
        match self.api.delete(id).await {
            Ok(()) => {
                self.remove(id);
                self.notify(Notification::success("Task deleted"));
                Ok(())
            }
            Err(e) => Err(self.fail("Failed to delete task", e)),
        }
    }

    // =========================================================================
    // Local list
    // =========================================================================

    pub fn get_all(&self) -> Vec<Task> {
        self.tasks.borrow().clone()
    }

    pub fn get(&self, id: &str) -> Option<Task> {
        self.tasks.borrow().iter().find(|t| t.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }

    /// Append `task`, or replace the entry with the same id.
    pub fn add(&self, task: Task) {
        self.tasks.send_modify(|tasks| {
            if let Some(existing) = tasks.iter_mut().find(|t| t.id == task.id) {
                *existing = task;
            } else {
                tasks.push(task);
            }
        });
    }

    /// Replace the entry with the same id. Returns `false` if absent.
    pub fn replace(&self, task: Task) -> bool {
        self.tasks.send_if_modified(|tasks| {
            match tasks.iter_mut().find(|t| t.id == task.id) {
                Some(existing) => {
                    *existing = task;
                    true
                }
                None => false,
            }
        })
    }

    /// Drop the entry with `id`. Returns `false` if absent.
    pub fn remove(&self, id: &str) -> bool {
        self.tasks.send_if_modified(|tasks| {
            let before = tasks.len();
            tasks.retain(|t| t.id != id);
            tasks.len() != before
        })
    }

    /// Watch the task list.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Task>> {
        self.tasks.subscribe()
    }

    // =========================================================================
    // Notifications & request state
    // =========================================================================

    pub fn notify(&self, notification: Notification) {
        self.notification.send_replace(Some(notification));
    }

    /// Most recent notification, if any.
    pub fn latest_notification(&self) -> Option<Notification> {
        self.notification.borrow().clone()
    }

    pub fn subscribe_notifications(&self) -> watch::Receiver<Option<Notification>> {
        self.notification.subscribe()
    }

    /// Whether a request is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn begin(&self) -> ClientResult<InFlight<'_>> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            self.notify(Notification::warning("Please wait for the current request"));
            return Err(ClientError::Busy);
        }
        Ok(InFlight(&self.in_flight))
    }

    fn fail(&self, message: &str, err: ClientError) -> ClientError {
        warn!(error = %err, "{message}");
        self.notify(Notification::error(message));
        err
    }
}
