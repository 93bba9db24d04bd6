//! Error types for backend access and local input checks.

use crate::notice::NoticeKind;

/// Anything that goes wrong talking to the backend.
///
/// Every variant is surfaced to the user the same way, as a connection error.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("backend returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed reply: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("request task failed: {0}")]
    Task(String),
}

/// Input rejected before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill in both issue and solution")]
    MissingFields,
}

impl BackendError {
    pub fn kind(&self) -> NoticeKind {
        NoticeKind::Connection
    }
}

impl ValidationError {
    pub fn kind(&self) -> NoticeKind {
        NoticeKind::Validation
    }
}

impl From<tokio::task::JoinError> for BackendError {
    fn from(err: tokio::task::JoinError) -> Self {
        BackendError::Task(err.to_string())
    }
}
