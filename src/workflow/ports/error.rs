//! Errors shared by the workflow store ports.

use crate::workflow::domain::{StatusId, TaskId};
use std::sync::Arc;
use thiserror::Error;

/// Result type for store and transaction operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by store and transaction implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A status with the same identifier already exists.
    #[error("duplicate status identifier: {0}")]
    DuplicateStatus(StatusId),

    /// The status was not found.
    #[error("status not found: {0}")]
    StatusNotFound(StatusId),

    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The transaction was already committed or rolled back.
    #[error("transaction is closed")]
    TransactionClosed,

    /// A concurrent transaction committed conflicting writes first.
    ///
    /// Nothing from this transaction was applied; retrying may succeed.
    #[error("serialization conflict: {0}")]
    Conflict(Arc<dyn std::error::Error + Send + Sync>),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps the cause of a serialization conflict.
    pub fn conflict(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Conflict(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
