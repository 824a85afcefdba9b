//! HTTP client for the task service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument};

#[cfg(test)]
use mockall::automock;

use crate::error::{ClientError, ClientResult};
use crate::models::{Task, TaskDraft};

/// Path segments of the task collection.
const TASKS_PATH: [&str; 2] = ["api", "tasks"];

/// Calls the client store makes against the task service.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// `GET /api/tasks`
    async fn list(&self) -> ClientResult<Vec<Task>>;

    /// `POST /api/tasks`
    async fn create(&self, draft: &TaskDraft) -> ClientResult<Task>;

    /// `PUT /api/tasks/:id`
    async fn update(&self, id: &str, draft: &TaskDraft) -> ClientResult<Task>;

    /// `PATCH /api/tasks/:id/toggle`
    async fn toggle(&self, id: &str) -> ClientResult<Task>;

    /// `DELETE /api/tasks/:id`
    async fn delete(&self, id: &str) -> ClientResult<()>;
}

/// Error body returned by the service.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// `reqwest`-backed [`TaskApi`].
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTaskApi {
    /// Create a client for the service at `base_url`.
    ///
    /// # Errors
    /// Returns error if `base_url` is not an absolute http(s) URL or the
    /// HTTP client cannot be constructed
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let invalid = |reason: String| {
            ClientError::InvalidInput(format!("Invalid API URL {base_url}: {reason}"))
        };
        let url = Url::parse(base_url.trim_end_matches('/')).map_err(|e| invalid(e.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(invalid("not a base URL".to_string()));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: url,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Collection URL followed by `segments`, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(TASKS_PATH).extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.client.request(method, self.endpoint(segments))
    }

    /// Send the request, turning non-2xx statuses into [`ClientError::Status`].
    async fn send(request: RequestBuilder) -> ClientResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body);
        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> ClientResult<T> {
        let bytes = Self::send(request).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    #[instrument(skip(self))]
    async fn list(&self) -> ClientResult<Vec<Task>> {
        let tasks: Vec<Task> = Self::send_json(self.request(Method::GET, &[])).await?;
        debug!(count = tasks.len(), "Fetched tasks");
        Ok(tasks)
    }

    #[instrument(skip(self, draft))]
    async fn create(&self, draft: &TaskDraft) -> ClientResult<Task> {
        Self::send_json(self.request(Method::POST, &[]).json(draft)).await
    }

    #[instrument(skip(self, draft))]
    async fn update(&self, id: &str, draft: &TaskDraft) -> ClientResult<Task> {
        Self::send_json(self.request(Method::PUT, &[id]).json(draft)).await
    }

    #[instrument(skip(self))]
    async fn toggle(&self, id: &str) -> ClientResult<Task> {
        Self::send_json(self.request(Method::PATCH, &[id, "toggle"])).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> ClientResult<()> {
        Self::send(self.request(Method::DELETE, &[id])).await?;
        Ok(())
    }
}
