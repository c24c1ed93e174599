use std::sync::Arc;

use anyhow::Result;
use shared::domain::{ApiStatus, Draft, Task, TaskId};
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

pub mod api;
pub mod config;
pub mod error;

pub use api::{HttpTaskApi, TaskApi, UnreachableTaskApi};
pub use config::{load_settings, ClientSettings};
pub use error::OperationFailure;

/// Everything the task board renders. Cloned out of the controller for every
/// state change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskClientState {
    /// Backend order, replaced wholesale by every successful fetch.
    pub tasks: Vec<Task>,
    pub loading: bool,
    pub error: Option<String>,
    pub api_status: Option<ApiStatus>,
    pub draft: Draft,
    pub editing: Option<TaskId>,
    /// Bumped whenever the controller replaces the draft itself, as opposed
    /// to echoing `update_draft`.
    pub draft_revision: u64,
}

impl TaskClientState {
    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    fn replace_draft(&mut self, draft: Draft) {
        self.draft = draft;
        self.draft_revision = self.draft_revision.wrapping_add(1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Granted,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Self::Granted
        } else {
            Self::Declined
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Nothing was sent: blank title or declined confirmation.
    Skipped,
    /// The backend accepted the change and the list was refetched.
    Applied,
    /// The backend call failed; the error slot holds the message.
    Failed,
}

#[derive(Debug, Clone)]
pub enum ControllerEvent {
    StateChanged(TaskClientState),
}

pub struct TaskController {
    api: Arc<dyn TaskApi>,
    inner: Mutex<TaskClientState>,
    events: broadcast::Sender<ControllerEvent>,
}

impl TaskController {
    pub fn new(api: Arc<dyn TaskApi>) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            api,
            inner: Mutex::new(TaskClientState::default()),
            events,
        })
    }

    /// Controller talking HTTP to `base_url`.
    pub fn connect(base_url: &str) -> Result<Arc<Self>> {
        Ok(Self::new(Arc::new(HttpTaskApi::new(base_url)?)))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> TaskClientState {
        self.inner.lock().await.clone()
    }

    async fn mutate<R>(&self, apply: impl FnOnce(&mut TaskClientState) -> R) -> R {
        let (result, snapshot) = {
            let mut guard = self.inner.lock().await;
            let result = apply(&mut *guard);
            (result, guard.clone())
        };
        let _ = self.events.send(ControllerEvent::StateChanged(snapshot));
        result
    }

    async fn record_failure(&self, failure: OperationFailure, err: &anyhow::Error) {
        warn!(
            operation = failure.operation(),
            "task api request failed: {err:#}"
        );
        self.mutate(|state| state.error = Some(failure.to_string())).await;
    }

    /// Startup sequence: health probe and first fetch run side by side.
    pub async fn initialize(&self) {
        tokio::join!(self.check_health(), self.load_tasks());
    }

    pub async fn check_health(&self) -> ApiStatus {
        let status = match self.api.health().await {
            Ok(status) => status,
            Err(err) => {
                warn!(
                    operation = OperationFailure::Connectivity.operation(),
                    "api health check failed: {err:#}"
                );
                ApiStatus::error(OperationFailure::Connectivity.to_string())
            }
        };
        self.mutate(|state| state.api_status = Some(status.clone())).await;
        status
    }

    pub async fn load_tasks(&self) {
        self.mutate(|state| state.loading = true).await;

        let result = self.api.list_tasks().await;

        match result {
            Ok(tasks) => {
                info!(count = tasks.len(), "task list refreshed");
                self.mutate(|state| {
                    state.tasks = tasks;
                    state.error = None;
                    state.loading = false;
                })
                .await;
            }
            Err(err) => {
                warn!(
                    operation = OperationFailure::Fetch.operation(),
                    "task api request failed: {err:#}"
                );
                self.mutate(|state| {
                    state.error = Some(OperationFailure::Fetch.to_string());
                    state.loading = false;
                })
                .await;
            }
        }
    }

    /// Creates a task, or updates the one being edited. A blank title is a
    /// no-op.
    pub async fn submit(&self, draft: Draft) -> MutationOutcome {
        if !draft.is_submittable() {
            return MutationOutcome::Skipped;
        }

        let editing = self
            .mutate(|state| {
                state.draft = draft.clone();
                state.editing.clone()
            })
            .await;

        let result = match &editing {
            Some(id) => self.api.update_task(id, &draft).await,
            None => self.api.create_task(&draft).await,
        };

        match result {
            Ok(echoed) => {
                let task_id = echoed.map(|task| task.id).or(editing.clone());
                info!(task_id = ?task_id, updated = editing.is_some(), "task saved");
                self.mutate(|state| {
                    state.editing = None;
                    state.replace_draft(Draft::default());
                })
                .await;
                self.load_tasks().await;
                MutationOutcome::Applied
            }
            Err(err) => {
                self.record_failure(OperationFailure::Save, &err).await;
                MutationOutcome::Failed
            }
        }
    }

    pub async fn toggle(&self, id: &TaskId) -> MutationOutcome {
        match self.api.toggle_task(id).await {
            Ok(echoed) => {
                let completed = echoed.map(|task| task.completed);
                info!(task_id = %id, completed = ?completed, "task toggled");
                self.load_tasks().await;
                MutationOutcome::Applied
            }
            Err(err) => {
                self.record_failure(OperationFailure::Toggle, &err).await;
                MutationOutcome::Failed
            }
        }
    }

    /// Deletes `id` once the user has confirmed; declining sends nothing.
    pub async fn delete(&self, id: &TaskId, confirmation: Confirmation) -> MutationOutcome {
        if confirmation != Confirmation::Granted {
            return MutationOutcome::Skipped;
        }

        match self.api.delete_task(id).await {
            Ok(_) => {
                info!(task_id = %id, "task deleted");
                self.load_tasks().await;
                MutationOutcome::Applied
            }
            Err(err) => {
                self.record_failure(OperationFailure::Delete, &err).await;
                MutationOutcome::Failed
            }
        }
    }

    /// Starts editing `task`, discarding whatever draft was in progress.
    pub async fn begin_edit(&self, task: &Task) {
        self.mutate(|state| {
            state.editing = Some(task.id.clone());
            state.replace_draft(Draft::from_task(task));
        })
        .await;
    }

    pub async fn cancel_edit(&self) {
        self.mutate(|state| {
            state.editing = None;
            state.replace_draft(Draft::default());
        })
        .await;
    }

    pub async fn update_draft(&self, draft: Draft) {
        self.mutate(|state| state.draft = draft).await;
    }

    pub async fn dismiss_error(&self) {
        self.mutate(|state| state.error = None).await;
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
