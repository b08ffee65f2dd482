use thiserror::Error;

/// Error type that captures tracker, storage and exchange failures.
///
/// Malformed dates and prices never surface here; the billing engine clamps them
/// instead so a single bad record cannot block the rest of a collection.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Import rejected: {0}")]
    ImportRejected(String),
    #[error("Subscription not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
