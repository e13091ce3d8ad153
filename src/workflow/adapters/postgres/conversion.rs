//! Conversions between workflow domain types and Diesel rows.

use super::models::{NewStatusRow, NewTaskRow, StatusRow, TaskRow};
use crate::workflow::{
    domain::{
        OrganizationId, PersistedStatusData, PersistedTaskData, ProjectId, ProjectTaskStatus,
        StatusColor, StatusId, StatusName, StatusOrder, Task, TaskId, UserId,
    },
    ports::{StoreError, StoreResult},
};

pub(super) fn to_new_status_row(status: &ProjectTaskStatus) -> NewStatusRow {
    NewStatusRow {
        id: status.id().into_inner(),
        project_id: status.project_id().into_inner(),
        name: status.name().as_str().to_owned(),
        color: status.color().as_str().to_owned(),
        status_order: status.order().map(i16::from),
        should_set_task_to_completed: status.should_set_task_to_completed(),
        is_default: status.is_default(),
        created_at: status.created_at(),
        updated_at: status.updated_at(),
        deleted_at: status.deleted_at(),
    }
}

pub(super) fn row_to_status(row: StatusRow) -> StoreResult<ProjectTaskStatus> {
    let StatusRow {
        id,
        project_id,
        name,
        color,
        status_order,
        should_set_task_to_completed,
        is_default,
        created_at,
        updated_at,
        deleted_at,
    } = row;

    let parsed_name = StatusName::new(name).map_err(StoreError::invalid_persisted_data)?;
    let parsed_color = StatusColor::new(color).map_err(StoreError::invalid_persisted_data)?;
    let parsed_order = status_order
        .map(StatusOrder::try_from)
        .transpose()
        .map_err(StoreError::invalid_persisted_data)?;

    let data = PersistedStatusData {
        id: StatusId::from_uuid(id),
        project_id: ProjectId::from_uuid(project_id),
        name: parsed_name,
        color: parsed_color,
        order: parsed_order,
        should_set_task_to_completed,
        is_default,
        created_at,
        updated_at,
        deleted_at,
    };
    Ok(ProjectTaskStatus::from_persisted(data))
}

pub(super) fn to_new_task_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        organization_id: task.organization_id().into_inner(),
        project_id: task.project_id().into_inner(),
        status_id: task.status_id().into_inner(),
        completed_at: task.completed_at(),
        last_edited_by: task.last_edited_by().map(UserId::into_inner),
        updated_at: task.updated_at(),
    }
}

pub(super) fn row_to_task(row: TaskRow) -> Task {
    Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        organization_id: OrganizationId::from_uuid(row.organization_id),
        project_id: ProjectId::from_uuid(row.project_id),
        status_id: StatusId::from_uuid(row.status_id),
        completed_at: row.completed_at,
        last_edited_by: row.last_edited_by.map(UserId::from_uuid),
        updated_at: row.updated_at,
    })
}
