//! Error kinds surfaced by the domain layer.

/// Errors returned to the caller of a core operation. Persistence and sync
/// failures are normally logged and swallowed by the coordinators; the
/// variants exist so they can be reported where a caller asks for them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("Local storage failure: {0}")]
    Persistence(String),
    #[error("Remote sync failure: {0}")]
    Sync(String),
}

impl ChoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        ChoreError::Validation(message.into())
    }

    pub fn child_not_found(child_id: &str) -> Self {
        ChoreError::NotFound {
            kind: "Child",
            id: child_id.to_string(),
        }
    }

    pub fn task_not_found(task_id: &str) -> Self {
        ChoreError::NotFound {
            kind: "Task",
            id: task_id.to_string(),
        }
    }
}
