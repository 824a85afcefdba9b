//! HTTP server for the task API.
//!
//! Provides REST API endpoints for:
//! - Health checks
//! - Listing, creating, reading, updating, toggling and deleting tasks

use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, Level};

use crate::error::{ApiError, GENERIC_ERROR_MESSAGE};
use crate::models::{NewTask, Task, TaskId, TaskPatch};
use crate::store::TaskStore;

/// Largest accepted request body.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Headers added to every response.
const SECURITY_HEADERS: [(&str, &str); 6] = [
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "SAMEORIGIN"),
    ("referrer-policy", "no-referrer"),
    (
        "strict-transport-security",
        "max-age=15552000; includeSubDomains",
    ),
    ("cross-origin-opener-policy", "same-origin"),
    ("x-dns-prefetch-control", "off"),
];

/// Server state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Task persistence
    pub store: Arc<dyn TaskStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }
}

/// Build the HTTP router.
pub fn build_router(state: AppState) -> Router {
    let security_headers = ServiceBuilder::new()
        .layer(security_header(SECURITY_HEADERS[0]))
        .layer(security_header(SECURITY_HEADERS[1]))
        .layer(security_header(SECURITY_HEADERS[2]))
        .layer(security_header(SECURITY_HEADERS[3]))
        .layer(security_header(SECURITY_HEADERS[4]))
        .layer(security_header(SECURITY_HEADERS[5]));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/api/tasks/{id}/toggle", patch(toggle_task))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_request(DefaultOnRequest::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(CorsLayer::permissive())
                .layer(security_headers)
                .layer(CatchPanicLayer::custom(panic_response))
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES)),
        )
        .with_state(state)
}

/// Serve on `listener` until `shutdown` resolves, then close the store.
///
/// # Errors
///
/// Returns an error if the server fails or the store cannot be closed cleanly.
pub async fn run_server<F>(listener: TcpListener, store: Arc<dyn TaskStore>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(AppState::new(store.clone()));

    if let Ok(addr) = listener.local_addr() {
        info!("Task API listening on {addr}");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    store.close().await?;
    info!("Task store closed");

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully");
        },
        () = terminate => {
            info!("Received SIGTERM, shutting down gracefully");
        },
    }
}

fn security_header((name, value): (&'static str, &'static str)) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(
        HeaderName::from_static(name),
        HeaderValue::from_static(value),
    )
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    error!(panic = %detail, "Request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "application/json")],
        json!({ "error": GENERIC_ERROR_MESSAGE }).to_string(),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state.store.list_all().await?;
    Ok(Json(tasks))
}

async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let task = state.store.get_by_id(&TaskId::parse(id)).await?;
    Ok(Json(task))
}

async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(new_task) = payload.map_err(invalid_body)?;
    let task = state.store.insert(new_task).await?;
    info!(task_id = %task.id, "Created task");
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TaskPatch>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let Json(patch) = payload.map_err(invalid_body)?;
    let task = state.store.update(&TaskId::parse(id), patch).await?;
    info!(task_id = %task.id, "Updated task");
    Ok(Json(task))
}

async fn toggle_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let task = state.store.toggle_completed(&TaskId::parse(id)).await?;
    info!(task_id = %task.id, completed = task.completed, "Toggled task");
    Ok(Json(task))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = TaskId::parse(id);
    state.store.delete_by_id(&id).await?;
    info!(task_id = %id, "Deleted task");
    Ok(Json(json!({ "message": "Task deleted" })))
}

fn invalid_body(rejection: JsonRejection) -> ApiError {
    ApiError::Validation(rejection.body_text())
}
