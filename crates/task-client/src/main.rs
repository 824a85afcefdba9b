//! Terminal client for the task manager.

use std::fs::OpenOptions;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use task_client::{tui, ClientConfig, ClientTaskStore, HttpTaskApi};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before clap reads env-backed flags
    let _ = dotenvy::dotenv();
    let config = ClientConfig::parse();

    // The terminal belongs to the TUI, so logs only go to a file when asked
    if let Some(path) = &config.log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;

        tracing_subscriber::registry()
            .with(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,task_client=debug")),
            )
            .with(fmt::layer().with_writer(Arc::new(file)).with_ansi(false))
            .init();
    }

    tracing::info!(api_url = %config.api_url, "Starting task client");

    let api = HttpTaskApi::new(&config.api_url, config.request_timeout())
        .context("Failed to build HTTP client")?;
    let store = Arc::new(ClientTaskStore::new(api));

    tui::run(store).await
}
