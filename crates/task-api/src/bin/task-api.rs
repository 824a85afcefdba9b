//! Task API service binary.
//!
//! Connects the task store, then serves the REST API until SIGINT/SIGTERM.

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use task_api::{connect, server, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    init_tracing(config.json_logs)?;

    info!("Starting task API v{}", env!("CARGO_PKG_VERSION"));

    let store = connect(&config.store_uri)
        .await
        .with_context(|| format!("Failed to connect to task store at {}", config.store_uri))?;

    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    server::run_server(listener, store, server::shutdown_signal()).await?;

    info!("Task API stopped");
    Ok(())
}

fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,tower_http=info"))?;

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
    Ok(())
}
