//! Ordered status catalog: create, update, reposition, delete, and list.

use super::{WorkflowError, WorkflowResult, unit_of_work::conclude};
use crate::workflow::{
    domain::{
        CascadeShift, NewStatusData, OrderFilter, Page, Pagination, ProjectId, ProjectTaskStatus,
        StatusChanges, StatusColor, StatusDomainError, StatusFilter, StatusId, StatusName,
        StatusOrder, StatusSort, plan_cascade,
    },
    ports::{StatusLookup, StatusStore, TransactionCoordinator},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info};

/// Request payload for creating a status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateStatusRequest {
    project_id: ProjectId,
    name: String,
    color: String,
    should_set_task_to_completed: bool,
    is_default: bool,
    use_order: bool,
}

impl CreateStatusRequest {
    /// Creates a request for an unordered, non-default, non-completing status.
    #[must_use]
    pub fn new(project_id: ProjectId, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            project_id,
            name: name.into(),
            color: color.into(),
            should_set_task_to_completed: false,
            is_default: false,
            use_order: false,
        }
    }

    /// Sets whether entering the status completes the task.
    #[must_use]
    pub const fn with_completes_task(mut self, should_set_task_to_completed: bool) -> Self {
        self.should_set_task_to_completed = should_set_task_to_completed;
        self
    }

    /// Sets whether new tasks start in the status.
    #[must_use]
    pub const fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }

    /// Sets whether the status is appended to the ordered pipeline.
    #[must_use]
    pub const fn with_use_order(mut self, use_order: bool) -> Self {
        self.use_order = use_order;
        self
    }
}

/// Request payload for updating a status. Unset fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatusRequest {
    project_id: ProjectId,
    status_id: StatusId,
    name: Option<String>,
    color: Option<String>,
    is_default: Option<bool>,
    should_set_task_to_completed: Option<bool>,
    order: Option<StatusOrder>,
}

impl UpdateStatusRequest {
    /// Creates a request that changes nothing yet.
    #[must_use]
    pub const fn new(project_id: ProjectId, status_id: StatusId) -> Self {
        Self {
            project_id,
            status_id,
            name: None,
            color: None,
            is_default: None,
            should_set_task_to_completed: None,
            order: None,
        }
    }

    /// Renames the status.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Recolors the status.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Changes the default flag.
    #[must_use]
    pub const fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = Some(is_default);
        self
    }

    /// Changes the completion flag.
    #[must_use]
    pub const fn with_completes_task(mut self, should_set_task_to_completed: bool) -> Self {
        self.should_set_task_to_completed = Some(should_set_task_to_completed);
        self
    }

    /// Repositions the status.
    #[must_use]
    pub const fn with_order(mut self, order: i8) -> Self {
        self.order = Some(StatusOrder::new(order));
        self
    }
}

/// Catalog rules applied inside a caller-provided unit of work.
///
/// Use this directly to combine catalog changes with other work in one
/// transaction; [`StatusCatalogService`] wraps each call in its own.
#[derive(Clone)]
pub struct StatusCatalog<C>
where
    C: Clock + Send + Sync,
{
    clock: Arc<C>,
}

impl<C> StatusCatalog<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a catalog using `clock` for timestamps.
    #[must_use]
    pub const fn new(clock: Arc<C>) -> Self {
        Self { clock }
    }

    /// Creates a status, appending it to the pipeline when requested.
    ///
    /// An ordered status takes the project's highest order plus one, or `0`
    /// when the project has no ordered status yet.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::InvalidInput`] when the name, color, or flags
    /// are invalid or the next order would overflow, and
    /// [`WorkflowError::Store`] when persistence fails.
    pub async fn create<S>(
        &self,
        store: &mut S,
        request: CreateStatusRequest,
    ) -> WorkflowResult<ProjectTaskStatus>
    where
        S: StatusStore + ?Sized,
    {
        let CreateStatusRequest {
            project_id,
            name,
            color,
            should_set_task_to_completed,
            is_default,
            use_order,
        } = request;

        let mut data = NewStatusData {
            project_id,
            name: StatusName::new(name)?,
            color: StatusColor::new(color)?,
            order: None,
            should_set_task_to_completed,
            is_default,
        };
        if use_order {
            data.order = Some(next_order(store.highest_order(project_id).await?)?);
        }

        let status = ProjectTaskStatus::new(data, &*self.clock)?;
        store.store_status(&status).await?;
        Ok(status)
    }

    /// Moves `status` to `new_order`, pushing the contiguous run of statuses
    /// starting at `new_order` one place forward.
    ///
    /// Shifted statuses are persisted first, the moved status last. Returns
    /// the shifts that were applied.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::InvalidInput`] when a shift would overflow
    /// the order range, and [`WorkflowError::Store`] when persistence fails.
    pub async fn reposition<S>(
        &self,
        store: &mut S,
        status: &mut ProjectTaskStatus,
        new_order: StatusOrder,
    ) -> WorkflowResult<Vec<CascadeShift>>
    where
        S: StatusStore + ?Sized,
    {
        let filter = StatusFilter::for_project(status.project_id())
            .with_order(OrderFilter::AtLeast(new_order));
        let mut candidates = store.list_statuses(&filter, StatusSort::BY_ORDER).await?;
        let shifts = plan_cascade(status.id(), new_order, &candidates)?;

        for shift in &shifts {
            if let Some(candidate) = candidates.iter_mut().find(|c| c.id() == shift.status_id) {
                candidate.move_to(shift.to, &*self.clock);
                store.update_status(candidate).await?;
            }
        }

        status.move_to(new_order, &*self.clock);
        store.update_status(status).await?;
        Ok(shifts)
    }

    /// Applies the provided fields of `request` to a live status.
    ///
    /// The default/completing exclusion is checked against the resulting
    /// flags. A new order goes through [`StatusCatalog::reposition`].
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::StatusNotFound`] when the status is missing
    /// from the project or deleted, [`WorkflowError::InvalidInput`] when
    /// validation fails, and [`WorkflowError::Store`] when persistence fails.
    pub async fn update<S>(
        &self,
        store: &mut S,
        request: UpdateStatusRequest,
    ) -> WorkflowResult<ProjectTaskStatus>
    where
        S: StatusStore + ?Sized,
    {
        let UpdateStatusRequest {
            project_id,
            status_id,
            name,
            color,
            is_default,
            should_set_task_to_completed,
            order,
        } = request;

        let changes = StatusChanges {
            name: name.map(StatusName::new).transpose()?,
            color: color.map(StatusColor::new).transpose()?,
            is_default,
            should_set_task_to_completed,
        };

        let mut status = self.get(store, project_id, status_id).await?;
        status.apply_changes(changes, &*self.clock)?;

        match order {
            Some(new_order) => {
                self.reposition(store, &mut status, new_order).await?;
            }
            None => store.update_status(&status).await?,
        }
        Ok(status)
    }

    /// Soft-deletes a live status.
    ///
    /// Remaining orders are not renumbered and tasks on the status keep it.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::StatusNotFound`] when the status is missing
    /// from the project or already deleted, and [`WorkflowError::Store`]
    /// when persistence fails.
    pub async fn delete<S>(
        &self,
        store: &mut S,
        project_id: ProjectId,
        status_id: StatusId,
    ) -> WorkflowResult<ProjectTaskStatus>
    where
        S: StatusStore + ?Sized,
    {
        let mut status = self.get(store, project_id, status_id).await?;
        status.soft_delete(&*self.clock)?;
        store.update_status(&status).await?;
        Ok(status)
    }

    /// Returns a live status of the project.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::StatusNotFound`] when the status is missing
    /// from the project or deleted, and [`WorkflowError::Store`] when the
    /// lookup fails.
    pub async fn get<S>(
        &self,
        store: &mut S,
        project_id: ProjectId,
        status_id: StatusId,
    ) -> WorkflowResult<ProjectTaskStatus>
    where
        S: StatusStore + ?Sized,
    {
        store
            .find_status(&StatusLookup::by_id(project_id, status_id))
            .await?
            .ok_or(WorkflowError::StatusNotFound {
                project_id,
                status_id,
            })
    }
}

fn next_order(highest: Option<StatusOrder>) -> Result<StatusOrder, StatusDomainError> {
    match highest {
        None => Ok(StatusOrder::FIRST),
        Some(last) => last
            .successor()
            .ok_or(StatusDomainError::OrderOverflow(last.value())),
    }
}

/// Status catalog orchestration service.
///
/// Every operation runs in its own transaction, committed on success and
/// rolled back on failure.
#[derive(Clone)]
pub struct StatusCatalogService<T, C>
where
    T: TransactionCoordinator,
    C: Clock + Send + Sync,
{
    coordinator: Arc<T>,
    catalog: StatusCatalog<C>,
}

impl<T, C> StatusCatalogService<T, C>
where
    T: TransactionCoordinator,
    C: Clock + Send + Sync,
{
    /// Creates a new status catalog service.
    #[must_use]
    pub const fn new(coordinator: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            coordinator,
            catalog: StatusCatalog::new(clock),
        }
    }

    /// Creates a status.
    ///
    /// # Errors
    ///
    /// See [`StatusCatalog::create`].
    pub async fn create_status(
        &self,
        request: CreateStatusRequest,
    ) -> WorkflowResult<ProjectTaskStatus> {
        debug!(project_id = %request.project_id, use_order = request.use_order, "creating status");
        let mut transaction = self.coordinator.begin().await?;
        let result = self.catalog.create(&mut transaction, request).await;
        let status = conclude(transaction, "create_status", result).await?;
        info!(
            project_id = %status.project_id(),
            status_id = %status.id(),
            order = ?status.order().map(StatusOrder::value),
            "status created"
        );
        Ok(status)
    }

    /// Updates a status.
    ///
    /// # Errors
    ///
    /// See [`StatusCatalog::update`].
    pub async fn update_status(
        &self,
        request: UpdateStatusRequest,
    ) -> WorkflowResult<ProjectTaskStatus> {
        debug!(
            project_id = %request.project_id,
            status_id = %request.status_id,
            "updating status"
        );
        let mut transaction = self.coordinator.begin().await?;
        let result = self.catalog.update(&mut transaction, request).await;
        let status = conclude(transaction, "update_status", result).await?;
        info!(status_id = %status.id(), "status updated");
        Ok(status)
    }

    /// Soft-deletes a status.
    ///
    /// # Errors
    ///
    /// See [`StatusCatalog::delete`].
    pub async fn delete_status(
        &self,
        project_id: ProjectId,
        status_id: StatusId,
    ) -> WorkflowResult<()> {
        debug!(%project_id, %status_id, "deleting status");
        let mut transaction = self.coordinator.begin().await?;
        let result = self
            .catalog
            .delete(&mut transaction, project_id, status_id)
            .await;
        conclude(transaction, "delete_status", result).await?;
        info!(%project_id, %status_id, "status deleted");
        Ok(())
    }

    /// Returns a live status of the project.
    ///
    /// # Errors
    ///
    /// See [`StatusCatalog::get`].
    pub async fn get_status(
        &self,
        project_id: ProjectId,
        status_id: StatusId,
    ) -> WorkflowResult<ProjectTaskStatus> {
        let mut transaction = self.coordinator.begin().await?;
        let result = self.catalog.get(&mut transaction, project_id, status_id).await;
        conclude(transaction, "get_status", result).await
    }

    /// Returns the project's live default status, if one is flagged.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Store`] when the lookup fails.
    pub async fn default_status(
        &self,
        project_id: ProjectId,
    ) -> WorkflowResult<Option<ProjectTaskStatus>> {
        let mut transaction = self.coordinator.begin().await?;
        let result = transaction
            .find_status(&StatusLookup::default_for(project_id))
            .await
            .map_err(WorkflowError::from);
        conclude(transaction, "default_status", result).await
    }

    /// Lists every status matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Store`] when the listing fails.
    pub async fn list_statuses(
        &self,
        filter: &StatusFilter,
        sort: StatusSort,
    ) -> WorkflowResult<Vec<ProjectTaskStatus>> {
        let mut transaction = self.coordinator.begin().await?;
        let result = transaction
            .list_statuses(filter, sort)
            .await
            .map_err(WorkflowError::from);
        conclude(transaction, "list_statuses", result).await
    }

    /// Returns one page of statuses matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Store`] when the listing fails.
    pub async fn paginate_statuses(
        &self,
        filter: &StatusFilter,
        sort: StatusSort,
        pagination: Pagination,
    ) -> WorkflowResult<Page<ProjectTaskStatus>> {
        let mut transaction = self.coordinator.begin().await?;
        let result = transaction
            .paginate_statuses(filter, sort, pagination)
            .await
            .map_err(WorkflowError::from);
        conclude(transaction, "paginate_statuses", result).await
    }
}
