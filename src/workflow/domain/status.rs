//! Project task status aggregate root.

use super::{ProjectId, StatusColor, StatusDomainError, StatusId, StatusName, StatusOrder};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A named stage in a project's task pipeline.
///
/// Statuses are data, not variants: each project owns its own catalog and
/// "is this the completing stage" is answered by a flag on the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTaskStatus {
    id: StatusId,
    project_id: ProjectId,
    name: StatusName,
    color: StatusColor,
    order: Option<StatusOrder>,
    should_set_task_to_completed: bool,
    is_default: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

/// Parameter object for creating a new status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStatusData {
    /// Owning project.
    pub project_id: ProjectId,
    /// Display name.
    pub name: StatusName,
    /// Display color.
    pub color: StatusColor,
    /// Pipeline position, or `None` to keep the status out of the pipeline.
    pub order: Option<StatusOrder>,
    /// Whether entering this status completes the task.
    pub should_set_task_to_completed: bool,
    /// Whether new tasks start in this status.
    pub is_default: bool,
}

/// Parameter object for reconstructing a persisted status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedStatusData {
    /// Persisted status identifier.
    pub id: StatusId,
    /// Persisted owning project.
    pub project_id: ProjectId,
    /// Persisted display name.
    pub name: StatusName,
    /// Persisted display color.
    pub color: StatusColor,
    /// Persisted pipeline position.
    pub order: Option<StatusOrder>,
    /// Persisted completion flag.
    pub should_set_task_to_completed: bool,
    /// Persisted default flag.
    pub is_default: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted soft-delete timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Partial update of a status's display attributes and flags.
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusChanges {
    /// New display name.
    pub name: Option<StatusName>,
    /// New display color.
    pub color: Option<StatusColor>,
    /// New default flag.
    pub is_default: Option<bool>,
    /// New completion flag.
    pub should_set_task_to_completed: Option<bool>,
}

impl ProjectTaskStatus {
    /// Creates a new status.
    ///
    /// # Errors
    ///
    /// Returns [`StatusDomainError::DefaultAndCompleting`] when the status
    /// would be both the default and a completing status.
    pub fn new(data: NewStatusData, clock: &impl Clock) -> Result<Self, StatusDomainError> {
        ensure_flags_compatible(data.is_default, data.should_set_task_to_completed)?;
        let timestamp = clock.utc();

        Ok(Self {
            id: StatusId::new(),
            project_id: data.project_id,
            name: data.name,
            color: data.color,
            order: data.order,
            should_set_task_to_completed: data.should_set_task_to_completed,
            is_default: data.is_default,
            created_at: timestamp,
            updated_at: timestamp,
            deleted_at: None,
        })
    }

    /// Reconstructs a status from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedStatusData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            name: data.name,
            color: data.color,
            order: data.order,
            should_set_task_to_completed: data.should_set_task_to_completed,
            is_default: data.is_default,
            created_at: data.created_at,
            updated_at: data.updated_at,
            deleted_at: data.deleted_at,
        }
    }

    /// Returns the status identifier.
    #[must_use]
    pub const fn id(&self) -> StatusId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(&self) -> &StatusName {
        &self.name
    }

    /// Returns the display color.
    #[must_use]
    pub const fn color(&self) -> &StatusColor {
        &self.color
    }

    /// Returns the pipeline position, if the status is ordered.
    #[must_use]
    pub const fn order(&self) -> Option<StatusOrder> {
        self.order
    }

    /// Returns whether entering this status completes the task.
    #[must_use]
    pub const fn should_set_task_to_completed(&self) -> bool {
        self.should_set_task_to_completed
    }

    /// Returns whether new tasks start in this status.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.is_default
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the soft-delete timestamp, if deleted.
    #[must_use]
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Returns whether the status has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns whether the status takes part in the ordered pipeline.
    #[must_use]
    pub const fn is_ordered(&self) -> bool {
        self.order.is_some()
    }

    /// Applies a partial update.
    ///
    /// The default/completing exclusion is checked against the combination
    /// of current and new flags before anything is mutated.
    ///
    /// # Errors
    ///
    /// Returns [`StatusDomainError::DefaultAndCompleting`] when the resulting
    /// flags conflict.
    pub fn apply_changes(
        &mut self,
        changes: StatusChanges,
        clock: &impl Clock,
    ) -> Result<(), StatusDomainError> {
        let is_default = changes.is_default.unwrap_or(self.is_default);
        let completes = changes
            .should_set_task_to_completed
            .unwrap_or(self.should_set_task_to_completed);
        ensure_flags_compatible(is_default, completes)?;

        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(color) = changes.color {
            self.color = color;
        }
        self.is_default = is_default;
        self.should_set_task_to_completed = completes;
        self.touch(clock);
        Ok(())
    }

    /// Moves the status to a new pipeline position.
    pub fn move_to(&mut self, order: StatusOrder, clock: &impl Clock) {
        self.order = Some(order);
        self.touch(clock);
    }

    /// Marks the status as deleted.
    ///
    /// # Errors
    ///
    /// Returns [`StatusDomainError::AlreadyDeleted`] when the status was
    /// deleted before.
    pub fn soft_delete(&mut self, clock: &impl Clock) -> Result<(), StatusDomainError> {
        if self.is_deleted() {
            return Err(StatusDomainError::AlreadyDeleted(self.id));
        }
        let timestamp = clock.utc();
        self.deleted_at = Some(timestamp);
        self.updated_at = timestamp;
        Ok(())
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

/// Rejects a status that is both the default and a completing status.
const fn ensure_flags_compatible(
    is_default: bool,
    should_set_task_to_completed: bool,
) -> Result<(), StatusDomainError> {
    if is_default && should_set_task_to_completed {
        return Err(StatusDomainError::DefaultAndCompleting);
    }
    Ok(())
}
