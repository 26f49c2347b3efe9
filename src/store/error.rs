use thiserror::Error;

/// Failure of a persistence call
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("form not found")]
    NotFound,
    #[error("form is not published")]
    NotPublished,
    #[error("this action requires an admin account")]
    Unauthorized,
    #[error("{0}")]
    InvalidInput(String),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored data is malformed: {0}")]
    Serialization(#[from] serde_json::Error),
}
