//! Diesel row models for workflow persistence.

use super::schema::{project_task_statuses, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for status records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = project_task_statuses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StatusRow {
    /// Status identifier.
    pub id: uuid::Uuid,
    /// Owning project identifier.
    pub project_id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Display color.
    pub color: String,
    /// Pipeline position.
    pub status_order: Option<i16>,
    /// Completion flag.
    pub should_set_task_to_completed: bool,
    /// Default flag.
    pub is_default: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Insert model for status records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = project_task_statuses)]
pub struct NewStatusRow {
    /// Status identifier.
    pub id: uuid::Uuid,
    /// Owning project identifier.
    pub project_id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Display color.
    pub color: String,
    /// Pipeline position.
    pub status_order: Option<i16>,
    /// Completion flag.
    pub should_set_task_to_completed: bool,
    /// Default flag.
    pub is_default: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning organization identifier.
    pub organization_id: uuid::Uuid,
    /// Owning project identifier.
    pub project_id: uuid::Uuid,
    /// Current status identifier.
    pub status_id: uuid::Uuid,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Last editing user.
    pub last_edited_by: Option<uuid::Uuid>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning organization identifier.
    pub organization_id: uuid::Uuid,
    /// Owning project identifier.
    pub project_id: uuid::Uuid,
    /// Current status identifier.
    pub status_id: uuid::Uuid,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Last editing user.
    pub last_edited_by: Option<uuid::Uuid>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
