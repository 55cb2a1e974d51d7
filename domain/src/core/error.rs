//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("A batch must contain at least one tool call")]
    EmptyBatch,

    #[error("Duplicate call id in batch: {0}")]
    DuplicateCallId(String),
}
