use thiserror::Error;

/// User-facing failure for each controller operation. The display text is the
/// exact message shown to the user; transport detail only goes to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OperationFailure {
    #[error("Cannot connect to backend")]
    Connectivity,
    #[error("Failed to fetch tasks. Make sure the backend is running.")]
    Fetch,
    #[error("Failed to save task")]
    Save,
    #[error("Failed to toggle task")]
    Toggle,
    #[error("Failed to delete task")]
    Delete,
}

impl OperationFailure {
    pub fn operation(self) -> &'static str {
        match self {
            Self::Connectivity => "check_health",
            Self::Fetch => "load_tasks",
            Self::Save => "submit",
            Self::Toggle => "toggle",
            Self::Delete => "delete",
        }
    }
}
