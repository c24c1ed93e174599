use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body a backend may attach to a non-success response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiError {
    pub fn detail(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .filter(|detail| !detail.trim().is_empty())
    }
}

/// A request the backend answered with a non-success status.
#[derive(Debug, Error)]
#[error("backend responded {status}: {message}")]
pub struct ApiException {
    pub status: u16,
    pub message: String,
}

impl ApiException {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Builds the exception from a raw response body, preferring the
    /// backend's own `error`/`message` field when the body is JSON.
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ApiError>(body)
            .ok()
            .and_then(|parsed| parsed.detail().map(str::to_string))
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    "empty response body".to_string()
                } else {
                    trimmed.to_string()
                }
            });
        Self::new(status, message)
    }
}
