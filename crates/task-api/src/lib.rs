//! REST service for the task manager.
//!
//! This crate provides:
//! - The `Task` document and its create/patch inputs
//! - A `TaskStore` persistence seam with in-memory and JSON-file backends
//! - The axum router exposing `/api/tasks` and `/health`
//! - Environment configuration for the `task-api` binary

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod store;

pub use config::Config;
pub use error::{ApiError, StoreError, StoreResult};
pub use models::{NewTask, Task, TaskId, TaskPatch};
pub use store::{connect, FileStore, MemoryStore, TaskStore};
