//! Client store driving a real task service over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use task_api::{server, MemoryStore};
use task_client::{ClientTaskStore, HttpTaskApi, NotificationLevel, TaskDraft};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

async fn spawn_service() -> (SocketAddr, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();

    tokio::spawn(server::run_server(
        listener,
        Arc::new(MemoryStore::new()),
        async move {
            let _ = rx.await;
        },
    ));

    (addr, tx)
}

fn client_store(addr: SocketAddr) -> ClientTaskStore<HttpTaskApi> {
    let api = HttpTaskApi::new(&format!("http://{addr}"), Duration::from_secs(5)).unwrap();
    ClientTaskStore::new(api)
}

#[tokio::test]
async fn full_lifecycle_against_service() {
    let (addr, _shutdown) = spawn_service().await;
    let store = client_store(addr);

    store.load().await.unwrap();
    assert!(store.is_empty());

    let created = store
        .create(TaskDraft::new("Write report", "Quarterly numbers"))
        .await
        .unwrap();
    assert!(!created.id.is_empty());
    assert!(!created.completed);
    assert_eq!(store.len(), 1);

    let toggled = store.toggle(&created.id).await.unwrap();
    assert!(toggled.completed);

    let updated = store
        .update(
            &created.id,
            TaskDraft::new("Write final report", "Quarterly numbers").completed(true),
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Write final report");
    assert_eq!(store.get(&created.id).unwrap().title, "Write final report");

    // A second client sees the server's state, not the first client's cache
    let other = client_store(addr);
    other.load().await.unwrap();
    assert_eq!(other.get_all(), store.get_all());

    store.delete(&created.id).await.unwrap();
    assert!(store.is_empty());

    other.load().await.unwrap();
    assert!(other.is_empty());
}

#[tokio::test]
async fn service_rejection_leaves_local_list_untouched() {
    let (addr, _shutdown) = spawn_service().await;
    let store = client_store(addr);

    let err = store.create(TaskDraft::new("   ", "")).await.unwrap_err();
    assert!(matches!(
        err,
        task_client::ClientError::Status { status: 400, .. }
    ));
    assert!(store.is_empty());

    let notification = store.latest_notification().unwrap();
    assert_eq!(notification.level, NotificationLevel::Error);
    assert_eq!(notification.message, "Failed to add task");
}

#[tokio::test]
async fn deleting_missing_task_reports_failure() {
    let (addr, _shutdown) = spawn_service().await;
    let store = client_store(addr);

    let err = store.delete("does-not-exist").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(
        store.latest_notification().unwrap().message,
        "Failed to delete task"
    );
}

#[tokio::test]
async fn unreachable_service_reports_fetch_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = client_store(addr);
    let err = store.load().await.unwrap_err();

    assert!(matches!(err, task_client::ClientError::Http(_)));
    assert_eq!(
        store.latest_notification().unwrap().message,
        "Failed to fetch tasks"
    );
    assert!(!store.is_busy());
}
