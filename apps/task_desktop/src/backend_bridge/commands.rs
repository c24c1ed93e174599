//! Backend commands queued from UI to backend worker.

use client_core::Confirmation;
use shared::domain::{Draft, Task, TaskId};

#[derive(Debug, Clone)]
pub enum BackendCommand {
    /// Health probe plus full fetch; also used by the refresh button.
    Initialize,
    Submit {
        draft: Draft,
    },
    Toggle {
        task_id: TaskId,
    },
    Delete {
        task_id: TaskId,
        confirmation: Confirmation,
    },
    BeginEdit {
        task: Task,
    },
    CancelEdit,
    UpdateDraft {
        draft: Draft,
    },
    DismissError,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::Submit { .. } => "submit",
            Self::Toggle { .. } => "toggle",
            Self::Delete { .. } => "delete",
            Self::BeginEdit { .. } => "begin_edit",
            Self::CancelEdit => "cancel_edit",
            Self::UpdateDraft { .. } => "update_draft",
            Self::DismissError => "dismiss_error",
        }
    }

    /// Commands that hit the network. These run as their own tasks so a slow
    /// request never holds up form edits queued behind it.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Initialize | Self::Submit { .. } | Self::Toggle { .. } | Self::Delete { .. }
        )
    }
}
