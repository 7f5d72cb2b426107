use thiserror::Error;
use uuid::Uuid;

/// Error type that captures engine and storage failures.
#[derive(Debug, Error)]
pub enum BudgetError {
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("record not found: {0}")]
    NotFound(Uuid),
    #[error("duplicate id: {0}")]
    DuplicateId(Uuid),
    #[error("malformed import: {0}")]
    MalformedImport(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Validation failed: {0}")]
    Validation(String),
}
