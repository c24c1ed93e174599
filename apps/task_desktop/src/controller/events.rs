//! Events flowing from the backend worker to the UI.

use client_core::TaskClientState;

#[derive(Debug, Clone)]
pub enum UiEvent {
    StateChanged(TaskClientState),
    Info(String),
    /// The worker could not start or lost its runtime; nothing will reach the
    /// backend until the app is relaunched.
    BackendUnavailable(String),
}
