//! Service-level errors for catalog and transition operations.

use crate::workflow::{
    domain::{ProjectId, StatusDomainError, StatusId, TaskId},
    ports::StoreError,
};
use thiserror::Error;

/// Coarse error classes an outer layer maps to responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowErrorKind {
    /// The request failed validation.
    InvalidInput,
    /// A referenced project, status, or task is not visible in scope.
    NotFound,
    /// The request contradicts the current catalog state, or lost a race
    /// with a concurrent writer.
    Conflict,
    /// The store failed unexpectedly.
    Internal,
}

/// Errors returned by workflow services.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Domain validation failed.
    #[error(transparent)]
    InvalidInput(#[from] StatusDomainError),

    /// The status does not exist in the project or is deleted.
    #[error("status {status_id} not found in project {project_id}")]
    StatusNotFound {
        /// Project the lookup was scoped to.
        project_id: ProjectId,
        /// Requested status.
        status_id: StatusId,
    },

    /// The task does not exist or is outside the caller's scope.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// Advancing was requested but the project has no ordered status.
    #[error("project {0} has no ordered statuses to advance through")]
    EmptyPipeline(ProjectId),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl WorkflowError {
    /// Returns the error class.
    #[must_use]
    pub const fn kind(&self) -> WorkflowErrorKind {
        match self {
            Self::InvalidInput(_) => WorkflowErrorKind::InvalidInput,
            Self::StatusNotFound { .. }
            | Self::TaskNotFound(_)
            | Self::Store(StoreError::StatusNotFound(_) | StoreError::TaskNotFound(_)) => {
                WorkflowErrorKind::NotFound
            }
            Self::EmptyPipeline(_)
            | Self::Store(
                StoreError::DuplicateStatus(_)
                | StoreError::DuplicateTask(_)
                | StoreError::Conflict(_),
            ) => {
                WorkflowErrorKind::Conflict
            }
            Self::Store(
                StoreError::TransactionClosed
                | StoreError::InvalidPersistedData(_)
                | StoreError::Persistence(_),
            ) => WorkflowErrorKind::Internal,
        }
    }
}

/// Result type for workflow service operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;
