//! Transient user notifications.

use std::time::{Duration, Instant};

/// How long a notification stays on screen.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

/// A message shown to the user after an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub raised_at: Instant,
}

impl Notification {
    fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            raised_at: Instant::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }

    pub fn is_expired(&self) -> bool {
        self.raised_at.elapsed() >= NOTIFICATION_TTL
    }
}
