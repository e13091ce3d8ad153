//! Store port for the status-relevant task projection.

use super::StoreResult;
use crate::workflow::domain::{OrganizationId, ProjectId, Task, TaskId};
use async_trait::async_trait;

/// Visibility scope applied to task lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskScope {
    /// Organization the task must belong to.
    pub organization_id: Option<OrganizationId>,
    /// Project the task must belong to.
    pub project_id: Option<ProjectId>,
}

impl TaskScope {
    /// Matches tasks in any organization or project.
    pub const UNSCOPED: Self = Self {
        organization_id: None,
        project_id: None,
    };

    /// Restricts to tasks of one organization.
    #[must_use]
    pub const fn organization(organization_id: OrganizationId) -> Self {
        Self {
            organization_id: Some(organization_id),
            project_id: None,
        }
    }

    /// Returns whether `task` is visible in this scope.
    #[must_use]
    pub fn contains(&self, task: &Task) -> bool {
        self.organization_id
            .is_none_or(|id| task.organization_id() == id)
            && self.project_id.is_none_or(|id| task.project_id() == id)
    }
}

/// Task persistence contract, bound to one unit of work.
#[async_trait]
pub trait TaskStore: Send {
    /// Finds a task visible in `scope`.
    ///
    /// Returns `None` when the task does not exist or lies outside the scope.
    async fn find_task(&mut self, id: TaskId, scope: TaskScope) -> StoreResult<Option<Task>>;

    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`super::StoreError::DuplicateTask`] when the identifier
    /// already exists.
    async fn store_task(&mut self, task: &Task) -> StoreResult<()>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`super::StoreError::TaskNotFound`] when the task does not
    /// exist.
    async fn update_task(&mut self, task: &Task) -> StoreResult<()>;
}
