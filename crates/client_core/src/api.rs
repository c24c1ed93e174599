//! HTTP seam between the controller and the task backend.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{ApiStatus, Draft, Task, TaskId},
    error::ApiException,
    protocol::{DeleteTaskResponse, TaskListResponse, TaskResponse},
};
use url::Url;

/// Writes succeed on any 2xx status. The echoed task, when the body carries
/// one, is only used for logging.
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn health(&self) -> Result<ApiStatus>;
    async fn list_tasks(&self) -> Result<Vec<Task>>;
    async fn create_task(&self, draft: &Draft) -> Result<Option<Task>>;
    async fn update_task(&self, id: &TaskId, draft: &Draft) -> Result<Option<Task>>;
    async fn toggle_task(&self, id: &TaskId) -> Result<Option<Task>>;
    async fn delete_task(&self, id: &TaskId) -> Result<DeleteTaskResponse>;
}

/// Stand-in used when the configured base URL could not be parsed. Every call
/// fails, which the controller surfaces through its normal failure messages.
pub struct UnreachableTaskApi {
    reason: String,
}

impl UnreachableTaskApi {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl TaskApi for UnreachableTaskApi {
    async fn health(&self) -> Result<ApiStatus> {
        Err(anyhow!("task backend unavailable: {}", self.reason))
    }

    async fn list_tasks(&self) -> Result<Vec<Task>> {
        Err(anyhow!("task backend unavailable: {}", self.reason))
    }

    async fn create_task(&self, _draft: &Draft) -> Result<Option<Task>> {
        Err(anyhow!("task backend unavailable: {}", self.reason))
    }

    async fn update_task(&self, id: &TaskId, _draft: &Draft) -> Result<Option<Task>> {
        Err(anyhow!("task backend unavailable for task {id}: {}", self.reason))
    }

    async fn toggle_task(&self, id: &TaskId) -> Result<Option<Task>> {
        Err(anyhow!("task backend unavailable for task {id}: {}", self.reason))
    }

    async fn delete_task(&self, id: &TaskId) -> Result<DeleteTaskResponse> {
        Err(anyhow!("task backend unavailable for task {id}: {}", self.reason))
    }
}

pub struct HttpTaskApi {
    http: Client,
    base_url: Url,
}

impl HttpTaskApi {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("invalid task api base url '{base_url}'"))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("task api base url '{base_url}' cannot carry a path"));
        }
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    /// Appends `segments` to the base URL path, percent-encoding each one.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("task api base url '{}' cannot carry a path", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn task_endpoint(&self, id: &TaskId) -> Result<Url> {
        self.endpoint(&["api", "tasks", id.as_str()])
    }
}

/// Reads the body and turns a non-2xx status into an [`ApiException`] carrying
/// the backend's own error text.
async fn successful_body(response: Response) -> Result<String> {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if !status.is_success() {
        return Err(ApiException::from_body(status.as_u16(), &body).into());
    }
    Ok(body)
}

async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = successful_body(response).await?;
    Ok(serde_json::from_str(&body)?)
}

fn echoed_task(body: &str) -> Option<Task> {
    serde_json::from_str::<TaskResponse>(body)
        .ok()
        .map(TaskResponse::into_task)
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn health(&self) -> Result<ApiStatus> {
        let url = self.endpoint(&["api", "health"])?;
        let response = self.http.get(url).send().await?;
        decode_response(response)
            .await
            .context("health check returned an unusable response")
    }

    async fn list_tasks(&self) -> Result<Vec<Task>> {
        let url = self.endpoint(&["api", "tasks"])?;
        let response = self.http.get(url).send().await?;
        let listing: TaskListResponse = decode_response(response)
            .await
            .context("task listing returned an unusable response")?;
        Ok(listing.data)
    }

    async fn create_task(&self, draft: &Draft) -> Result<Option<Task>> {
        let url = self.endpoint(&["api", "tasks"])?;
        let response = self.http.post(url).json(draft).send().await?;
        let body = successful_body(response)
            .await
            .context("task creation was rejected")?;
        Ok(echoed_task(&body))
    }

    async fn update_task(&self, id: &TaskId, draft: &Draft) -> Result<Option<Task>> {
        let url = self.task_endpoint(id)?;
        let response = self.http.put(url).json(draft).send().await?;
        let body = successful_body(response)
            .await
            .with_context(|| format!("update of task {id} was rejected"))?;
        Ok(echoed_task(&body))
    }

    async fn toggle_task(&self, id: &TaskId) -> Result<Option<Task>> {
        let url = self.endpoint(&["api", "tasks", id.as_str(), "toggle"])?;
        let response = self.http.patch(url).send().await?;
        let body = successful_body(response)
            .await
            .with_context(|| format!("toggle of task {id} was rejected"))?;
        Ok(echoed_task(&body))
    }

    async fn delete_task(&self, id: &TaskId) -> Result<DeleteTaskResponse> {
        let url = self.task_endpoint(id)?;
        let response = self.http.delete(url).send().await?;
        let body = successful_body(response)
            .await
            .with_context(|| format!("delete of task {id} was rejected"))?;
        // Only the status matters; tolerate empty or non-JSON confirmations.
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }
}
