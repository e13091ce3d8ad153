//! Status-relevant projection of a task.

use super::{OrganizationId, ProjectId, ProjectTaskStatus, StatusId, TaskId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// The parts of a task that status transitions read and write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    organization_id: OrganizationId,
    project_id: ProjectId,
    status_id: StatusId,
    completed_at: Option<DateTime<Utc>>,
    last_edited_by: Option<UserId>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owning organization.
    pub organization_id: OrganizationId,
    /// Persisted owning project.
    pub project_id: ProjectId,
    /// Persisted current status.
    pub status_id: StatusId,
    /// Persisted completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted last editor.
    pub last_edited_by: Option<UserId>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task placed in the given status.
    #[must_use]
    pub fn new(
        organization_id: OrganizationId,
        status: &ProjectTaskStatus,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: TaskId::new(),
            organization_id,
            project_id: status.project_id(),
            status_id: status.id(),
            completed_at: None,
            last_edited_by: None,
            updated_at: clock.utc(),
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub const fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            organization_id: data.organization_id,
            project_id: data.project_id,
            status_id: data.status_id,
            completed_at: data.completed_at,
            last_edited_by: data.last_edited_by,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning organization.
    #[must_use]
    pub const fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the identifier of the current status.
    #[must_use]
    pub const fn status_id(&self) -> StatusId {
        self.status_id
    }

    /// Returns the completion timestamp, if completed.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the user who last edited the task.
    #[must_use]
    pub const fn last_edited_by(&self) -> Option<UserId> {
        self.last_edited_by
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Points the task at `destination` and records `actor` as its editor.
    ///
    /// The destination must belong to the task's project; callers resolve it
    /// through a project-scoped lookup. Completion is left to the caller.
    pub fn apply_status(
        &mut self,
        destination: &ProjectTaskStatus,
        actor: UserId,
        clock: &impl Clock,
    ) {
        debug_assert_eq!(destination.project_id(), self.project_id);
        self.status_id = destination.id();
        self.last_edited_by = Some(actor);
        self.updated_at = clock.utc();
    }
}
