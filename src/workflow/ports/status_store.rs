//! Store port for project task statuses.

use super::StoreResult;
use crate::workflow::domain::{
    Page, Pagination, ProjectId, ProjectTaskStatus, StatusFilter, StatusId, StatusOrder,
    StatusSort,
};
use async_trait::async_trait;

/// Criteria for fetching a single status.
///
/// Every criterion that is set must match. Deleted statuses are skipped
/// unless [`StatusLookup::with_deleted`] is used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLookup {
    /// Owning project.
    pub project_id: Option<ProjectId>,
    /// Status identifier.
    pub status_id: Option<StatusId>,
    /// Default flag.
    pub is_default: Option<bool>,
    /// Completion flag.
    pub should_set_task_to_completed: Option<bool>,
    /// Whether soft-deleted statuses may match.
    pub include_deleted: bool,
}

impl StatusLookup {
    /// Looks up a status by identifier inside one project.
    #[must_use]
    pub const fn by_id(project_id: ProjectId, status_id: StatusId) -> Self {
        Self {
            project_id: Some(project_id),
            status_id: Some(status_id),
            is_default: None,
            should_set_task_to_completed: None,
            include_deleted: false,
        }
    }

    /// Looks up the default status of a project.
    #[must_use]
    pub const fn default_for(project_id: ProjectId) -> Self {
        Self {
            project_id: Some(project_id),
            status_id: None,
            is_default: Some(true),
            should_set_task_to_completed: None,
            include_deleted: false,
        }
    }

    /// Allows soft-deleted statuses to match.
    #[must_use]
    pub const fn with_deleted(mut self) -> Self {
        self.include_deleted = true;
        self
    }

    /// Returns whether `status` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, status: &ProjectTaskStatus) -> bool {
        (self.include_deleted || !status.is_deleted())
            && self.project_id.is_none_or(|id| status.project_id() == id)
            && self.status_id.is_none_or(|id| status.id() == id)
            && self.is_default.is_none_or(|flag| status.is_default() == flag)
            && self
                .should_set_task_to_completed
                .is_none_or(|flag| status.should_set_task_to_completed() == flag)
    }
}

/// Status persistence contract, bound to one unit of work.
#[async_trait]
pub trait StatusStore: Send {
    /// Finds the first status matching `lookup`.
    ///
    /// Returns `None` when nothing matches.
    async fn find_status(&mut self, lookup: &StatusLookup)
    -> StoreResult<Option<ProjectTaskStatus>>;

    /// Returns every status matching `filter`, sorted by `sort`.
    async fn list_statuses(
        &mut self,
        filter: &StatusFilter,
        sort: StatusSort,
    ) -> StoreResult<Vec<ProjectTaskStatus>>;

    /// Returns one page of statuses matching `filter`.
    async fn paginate_statuses(
        &mut self,
        filter: &StatusFilter,
        sort: StatusSort,
        pagination: Pagination,
    ) -> StoreResult<Page<ProjectTaskStatus>>;

    /// Returns the highest order among the project's live statuses.
    ///
    /// Unordered statuses are ignored; returns `None` when the project has no
    /// ordered status.
    async fn highest_order(&mut self, project_id: ProjectId) -> StoreResult<Option<StatusOrder>>;

    /// Stores a new status.
    ///
    /// # Errors
    ///
    /// Returns [`super::StoreError::DuplicateStatus`] when the identifier
    /// already exists.
    async fn store_status(&mut self, status: &ProjectTaskStatus) -> StoreResult<()>;

    /// Persists changes to an existing status, including soft deletion.
    ///
    /// # Errors
    ///
    /// Returns [`super::StoreError::StatusNotFound`] when the status does not
    /// exist.
    async fn update_status(&mut self, status: &ProjectTaskStatus) -> StoreResult<()>;
}
