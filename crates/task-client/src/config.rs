//! Command-line and environment configuration for the client.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Terminal client for the task manager.
#[derive(Debug, Clone, Parser)]
#[command(name = "tasks", version, about = "Terminal client for the task manager")]
pub struct ClientConfig {
    /// Base URL of the task service
    #[arg(long, env = "TASKS_API_URL", default_value = "http://localhost:3303")]
    pub api_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "TASKS_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Write logs to this file (logs are discarded otherwise)
    #[arg(long, env = "TASKS_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
