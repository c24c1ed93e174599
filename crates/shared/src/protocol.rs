use serde::{Deserialize, Serialize};

use crate::domain::Task;

/// Envelope returned by `GET /api/tasks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskListResponse {
    pub data: Vec<Task>,
}

/// Body returned by the single-task endpoints. Backends that wrap listings in
/// `{data: ...}` usually wrap single tasks the same way, so accept both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskResponse {
    Wrapped { data: Task },
    Bare(Task),
}

impl TaskResponse {
    pub fn into_task(self) -> Task {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

/// Body returned by `DELETE /api/tasks/{id}`. Backends vary in what they put
/// here, so every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteTaskResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ApiStatus, HealthState, TaskId};

    #[test]
    fn decodes_document_store_task_listing() {
        let raw = r#"{
            "data": [
                {
                    "_id": "65f1c0ffee",
                    "title": "Buy milk",
                    "description": null,
                    "completed": false,
                    "createdAt": "2024-03-01T09:30:00.000Z",
                    "__v": 0
                },
                { "id": "2", "title": "Walk dog", "completed": true },
                { "id": 3, "title": "Water plants", "completed": false }
            ]
        }"#;

        let listing: TaskListResponse = serde_json::from_str(raw).expect("decode listing");
        assert_eq!(listing.data.len(), 3);

        let first = &listing.data[0];
        assert_eq!(first.id, TaskId::new("65f1c0ffee"));
        assert_eq!(first.description, "");
        assert!(!first.completed);
        assert!(first.created_at.is_some());

        let second = &listing.data[1];
        assert_eq!(second.id.as_str(), "2");
        assert!(second.completed);
        assert!(second.created_at.is_none());

        let numeric = &listing.data[2];
        assert_eq!(numeric.id, TaskId::new("3"));
        assert_eq!(
            serde_json::to_value(&numeric.id).expect("encode id"),
            serde_json::json!("3")
        );
    }

    #[test]
    fn single_task_response_may_be_wrapped() {
        let wrapped: TaskResponse = serde_json::from_str(
            r#"{"success":true,"data":{"_id":"1","title":"Buy milk","completed":false}}"#,
        )
        .expect("decode wrapped");
        let bare: TaskResponse =
            serde_json::from_str(r#"{"id":"1","title":"Buy milk","completed":false}"#)
                .expect("decode bare");

        assert_eq!(wrapped.into_task(), bare.into_task());
    }

    #[test]
    fn health_message_is_optional() {
        let status: ApiStatus = serde_json::from_str(r#"{"status":"ok"}"#).expect("decode");
        assert_eq!(status.status, HealthState::Ok);
        assert_eq!(status.message, None);

        let status: ApiStatus =
            serde_json::from_str(r#"{"status":"error","message":"db down"}"#).expect("decode");
        assert!(!status.is_ok());
        assert_eq!(status.message.as_deref(), Some("db down"));
    }

    #[test]
    fn delete_response_tolerates_arbitrary_bodies() {
        let body: DeleteTaskResponse =
            serde_json::from_str(r#"{"success":true}"#).expect("decode");
        assert!(body.message.is_none());
    }
}
