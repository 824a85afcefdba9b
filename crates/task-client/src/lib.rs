//! Terminal client for the task manager.
//!
//! This crate provides:
//! - `TaskApi`, the HTTP seam to the task service, with a `reqwest` implementation
//! - `ClientTaskStore`, an observable, non-authoritative copy of the task list
//! - A ratatui list view with a shared add/edit form

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod store;
pub mod tui;

pub use api::{HttpTaskApi, TaskApi};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use models::{Task, TaskDraft};
pub use notify::{Notification, NotificationLevel};
pub use store::ClientTaskStore;
