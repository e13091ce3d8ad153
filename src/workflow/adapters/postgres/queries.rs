//! Synchronous Diesel queries run inside an open workflow transaction.

use super::{
    conversion::{row_to_status, row_to_task, to_new_status_row, to_new_task_row},
    models::{StatusRow, TaskRow},
    schema::{project_task_statuses, tasks},
};
use crate::workflow::{
    domain::{
        OrderFilter, Page, Pagination, ProjectId, ProjectTaskStatus, SortDirection, StatusFilter,
        StatusId, StatusOrder, StatusSort, StatusSortField, Task, TaskId,
    },
    ports::{StatusLookup, StoreError, StoreResult, TaskScope},
};
use diesel::dsl::max;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

type BoxedStatusQuery = project_task_statuses::BoxedQuery<'static, Pg>;

/// Maps a Diesel failure onto the store taxonomy.
///
/// `SERIALIZABLE` transactions that lose a read/write race fail with
/// `40001`; those surface as [`StoreError::Conflict`] so callers can retry.
pub(super) fn store_error(err: DieselError) -> StoreError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _) => {
            StoreError::conflict(err)
        }
        _ => StoreError::persistence(err),
    }
}

fn apply_order_filter(query: BoxedStatusQuery, filter: OrderFilter) -> BoxedStatusQuery {
    use project_task_statuses::status_order;
    match filter {
        OrderFilter::Equal(value) => query.filter(status_order.eq(i16::from(value))),
        OrderFilter::GreaterThan(value) => query.filter(status_order.gt(i16::from(value))),
        OrderFilter::AtLeast(value) => query.filter(status_order.ge(i16::from(value))),
        OrderFilter::LessThan(value) => query.filter(status_order.lt(i16::from(value))),
        OrderFilter::AtMost(value) => query.filter(status_order.le(i16::from(value))),
        OrderFilter::Ordered => query.filter(status_order.is_not_null()),
        OrderFilter::Unordered => query.filter(status_order.is_null()),
    }
}

/// Escapes `LIKE` wildcards so a fragment matches literally.
fn like_pattern(fragment: &str) -> String {
    let escaped = fragment
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn filtered_statuses(filter: &StatusFilter) -> BoxedStatusQuery {
    let mut query = project_task_statuses::table
        .filter(project_task_statuses::project_id.eq(filter.project_id().into_inner()))
        .into_boxed();

    if !filter.include_deleted() {
        query = query.filter(project_task_statuses::deleted_at.is_null());
    }
    if let Some(fragment) = filter.name_contains() {
        query = query.filter(project_task_statuses::name.ilike(like_pattern(fragment)));
    }
    if let Some(flag) = filter.is_default() {
        query = query.filter(project_task_statuses::is_default.eq(flag));
    }
    if let Some(flag) = filter.should_set_task_to_completed() {
        query = query.filter(project_task_statuses::should_set_task_to_completed.eq(flag));
    }
    if let Some(order) = filter.order() {
        query = apply_order_filter(query, order);
    }
    query
}

fn sorted(query: BoxedStatusQuery, sort: StatusSort) -> BoxedStatusQuery {
    use project_task_statuses::{created_at, id, name, status_order};
    let primary = match (sort.field, sort.direction) {
        (StatusSortField::Order, SortDirection::Ascending) => {
            query.order_by(status_order.asc().nulls_last())
        }
        (StatusSortField::Order, SortDirection::Descending) => {
            query.order_by(status_order.desc().nulls_first())
        }
        (StatusSortField::Name, SortDirection::Ascending) => query.order_by(name.asc()),
        (StatusSortField::Name, SortDirection::Descending) => query.order_by(name.desc()),
        (StatusSortField::CreatedAt, SortDirection::Ascending) => query.order_by(created_at.asc()),
        (StatusSortField::CreatedAt, SortDirection::Descending) => {
            query.order_by(created_at.desc())
        }
    };
    primary.then_order_by(created_at.asc()).then_order_by(id.asc())
}

fn load_statuses(
    connection: &mut PgConnection,
    query: BoxedStatusQuery,
) -> StoreResult<Vec<ProjectTaskStatus>> {
    let rows = query
        .select(StatusRow::as_select())
        .load::<StatusRow>(connection)
        .map_err(store_error)?;
    rows.into_iter().map(row_to_status).collect()
}

pub(super) fn find_status(
    connection: &mut PgConnection,
    lookup: &StatusLookup,
) -> StoreResult<Option<ProjectTaskStatus>> {
    let mut query = project_task_statuses::table.into_boxed();
    if let Some(project_id) = lookup.project_id {
        query = query.filter(project_task_statuses::project_id.eq(project_id.into_inner()));
    }
    if let Some(status_id) = lookup.status_id {
        query = query.filter(project_task_statuses::id.eq(status_id.into_inner()));
    }
    if let Some(flag) = lookup.is_default {
        query = query.filter(project_task_statuses::is_default.eq(flag));
    }
    if let Some(flag) = lookup.should_set_task_to_completed {
        query = query.filter(project_task_statuses::should_set_task_to_completed.eq(flag));
    }
    if !lookup.include_deleted {
        query = query.filter(project_task_statuses::deleted_at.is_null());
    }

    let row = sorted(query, StatusSort::BY_ORDER)
        .select(StatusRow::as_select())
        .first::<StatusRow>(connection)
        .optional()
        .map_err(store_error)?;
    row.map(row_to_status).transpose()
}

pub(super) fn list_statuses(
    connection: &mut PgConnection,
    filter: &StatusFilter,
    sort: StatusSort,
) -> StoreResult<Vec<ProjectTaskStatus>> {
    load_statuses(connection, sorted(filtered_statuses(filter), sort))
}

pub(super) fn paginate_statuses(
    connection: &mut PgConnection,
    filter: &StatusFilter,
    sort: StatusSort,
    pagination: Pagination,
) -> StoreResult<Page<ProjectTaskStatus>> {
    let total: i64 = filtered_statuses(filter)
        .count()
        .get_result(connection)
        .map_err(store_error)?;
    let offset = i64::try_from(pagination.offset()).map_err(StoreError::persistence)?;
    let query = sorted(filtered_statuses(filter), sort)
        .limit(i64::from(pagination.per_page()))
        .offset(offset);
    let items = load_statuses(connection, query)?;

    Ok(Page {
        items,
        total: u64::try_from(total).map_err(StoreError::persistence)?,
        pagination,
    })
}

pub(super) fn highest_order(
    connection: &mut PgConnection,
    project_id: ProjectId,
) -> StoreResult<Option<StatusOrder>> {
    let highest: Option<i16> = project_task_statuses::table
        .filter(project_task_statuses::project_id.eq(project_id.into_inner()))
        .filter(project_task_statuses::deleted_at.is_null())
        .select(max(project_task_statuses::status_order))
        .first(connection)
        .map_err(store_error)?;
    highest
        .map(StatusOrder::try_from)
        .transpose()
        .map_err(StoreError::invalid_persisted_data)
}

pub(super) fn insert_status(
    connection: &mut PgConnection,
    status: &ProjectTaskStatus,
) -> StoreResult<()> {
    let status_id = status.id();
    diesel::insert_into(project_task_statuses::table)
        .values(&to_new_status_row(status))
        .execute(connection)
        .map_err(|err| match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                StoreError::DuplicateStatus(status_id)
            }
            _ => store_error(err),
        })?;
    Ok(())
}

pub(super) fn update_status(
    connection: &mut PgConnection,
    status: &ProjectTaskStatus,
) -> StoreResult<()> {
    let row = to_new_status_row(status);
    let updated_count = diesel::update(
        project_task_statuses::table.filter(project_task_statuses::id.eq(row.id)),
    )
    .set((
        project_task_statuses::name.eq(&row.name),
        project_task_statuses::color.eq(&row.color),
        project_task_statuses::status_order.eq(row.status_order),
        project_task_statuses::should_set_task_to_completed.eq(row.should_set_task_to_completed),
        project_task_statuses::is_default.eq(row.is_default),
        project_task_statuses::updated_at.eq(row.updated_at),
        project_task_statuses::deleted_at.eq(row.deleted_at),
    ))
    .execute(connection)
    .map_err(store_error)?;

    if updated_count == 0 {
        return Err(StoreError::StatusNotFound(StatusId::from_uuid(row.id)));
    }
    Ok(())
}

pub(super) fn find_task(
    connection: &mut PgConnection,
    id: TaskId,
    scope: TaskScope,
) -> StoreResult<Option<Task>> {
    let mut query = tasks::table
        .filter(tasks::id.eq(id.into_inner()))
        .into_boxed();
    if let Some(organization_id) = scope.organization_id {
        query = query.filter(tasks::organization_id.eq(organization_id.into_inner()));
    }
    if let Some(project_id) = scope.project_id {
        query = query.filter(tasks::project_id.eq(project_id.into_inner()));
    }

    let row = query
        .select(TaskRow::as_select())
        .first::<TaskRow>(connection)
        .optional()
        .map_err(store_error)?;
    Ok(row.map(row_to_task))
}

pub(super) fn insert_task(connection: &mut PgConnection, task: &Task) -> StoreResult<()> {
    let task_id = task.id();
    diesel::insert_into(tasks::table)
        .values(&to_new_task_row(task))
        .execute(connection)
        .map_err(|err| match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                StoreError::DuplicateTask(task_id)
            }
            _ => store_error(err),
        })?;
    Ok(())
}

pub(super) fn update_task(connection: &mut PgConnection, task: &Task) -> StoreResult<()> {
    let row = to_new_task_row(task);
    let updated_count = diesel::update(tasks::table.filter(tasks::id.eq(row.id)))
        .set((
            tasks::status_id.eq(row.status_id),
            tasks::completed_at.eq(row.completed_at),
            tasks::last_edited_by.eq(row.last_edited_by),
            tasks::updated_at.eq(row.updated_at),
        ))
        .execute(connection)
        .map_err(store_error)?;

    if updated_count == 0 {
        return Err(StoreError::TaskNotFound(task.id()));
    }
    Ok(())
}
