//! Task status transitions: explicit moves and advancing along the pipeline.

use super::{WorkflowError, WorkflowResult, unit_of_work::conclude};
use crate::workflow::{
    domain::{
        OrderFilter, OrganizationId, ProjectTaskStatus, StatusFilter, StatusId, StatusSort, Task,
        TaskId, TransitionTarget, UserId, resolve_advance,
    },
    ports::{StatusLookup, StatusStore, TaskScope, TaskStore, TransactionCoordinator},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info};

/// Request payload for changing a task's status.
///
/// Exactly one of [`ChangeTaskStatusRequest::to_status`] and
/// [`ChangeTaskStatusRequest::with_advance`] must be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeTaskStatusRequest {
    task_id: TaskId,
    actor: UserId,
    organization_id: Option<OrganizationId>,
    status_id: Option<StatusId>,
    advance: bool,
}

impl ChangeTaskStatusRequest {
    /// Creates a request with no target yet.
    #[must_use]
    pub const fn new(task_id: TaskId, actor: UserId) -> Self {
        Self {
            task_id,
            actor,
            organization_id: None,
            status_id: None,
            advance: false,
        }
    }

    /// Restricts the task lookup to one organization.
    #[must_use]
    pub const fn in_organization(mut self, organization_id: OrganizationId) -> Self {
        self.organization_id = Some(organization_id);
        self
    }

    /// Targets a specific status of the task's project.
    #[must_use]
    pub const fn to_status(mut self, status_id: StatusId) -> Self {
        self.status_id = Some(status_id);
        self
    }

    /// Requests moving to the next ordered status.
    #[must_use]
    pub const fn with_advance(mut self, advance: bool) -> Self {
        self.advance = advance;
        self
    }

    const fn scope(&self) -> TaskScope {
        match self.organization_id {
            Some(organization_id) => TaskScope::organization(organization_id),
            None => TaskScope::UNSCOPED,
        }
    }
}

/// Result of a committed status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionOutcome {
    /// The task as persisted.
    pub task: Task,
    /// Status the task was on before the change.
    pub previous_status_id: StatusId,
    /// Status the task moved to.
    pub destination: ProjectTaskStatus,
    /// Whether advancing wrapped around to the first status.
    pub wrapped: bool,
}

impl TransitionOutcome {
    /// Returns whether the destination marks tasks as completed.
    ///
    /// Callers apply completion themselves.
    #[must_use]
    pub const fn completes_task(&self) -> bool {
        self.destination.should_set_task_to_completed()
    }

    /// Returns whether the task stayed on its status.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.previous_status_id == self.destination.id()
    }
}

/// Transition rules applied inside a caller-provided unit of work.
#[derive(Clone)]
pub struct TaskTransition<C>
where
    C: Clock + Send + Sync,
{
    clock: Arc<C>,
}

impl<C> TaskTransition<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a transition handler using `clock` for timestamps.
    #[must_use]
    pub const fn new(clock: Arc<C>) -> Self {
        Self { clock }
    }

    /// Moves a task to its requested status and persists it.
    ///
    /// Moving a task onto the status it already has is persisted like any
    /// other change.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::InvalidInput`] when the request has both or
    /// neither target, [`WorkflowError::TaskNotFound`] when the task is not
    /// visible in scope, [`WorkflowError::StatusNotFound`] when an explicit
    /// target is not a live status of the task's project,
    /// [`WorkflowError::EmptyPipeline`] when advancing in a project with no
    /// ordered status, and [`WorkflowError::Store`] when persistence fails.
    pub async fn execute<S>(
        &self,
        store: &mut S,
        request: ChangeTaskStatusRequest,
    ) -> WorkflowResult<TransitionOutcome>
    where
        S: StatusStore + TaskStore + ?Sized,
    {
        let target = TransitionTarget::from_parts(request.status_id, request.advance)?;

        let mut task = store
            .find_task(request.task_id, request.scope())
            .await?
            .ok_or(WorkflowError::TaskNotFound(request.task_id))?;
        let previous_status_id = task.status_id();

        let (destination, wrapped) = match target {
            TransitionTarget::Explicit(status_id) => {
                let project_id = task.project_id();
                let status = store
                    .find_status(&StatusLookup::by_id(project_id, status_id))
                    .await?
                    .ok_or(WorkflowError::StatusNotFound {
                        project_id,
                        status_id,
                    })?;
                (status, false)
            }
            TransitionTarget::Advance => self.resolve_next(store, &task).await?,
        };

        task.apply_status(&destination, request.actor, &*self.clock);
        store.update_task(&task).await?;

        Ok(TransitionOutcome {
            task,
            previous_status_id,
            destination,
            wrapped,
        })
    }

    async fn resolve_next<S>(
        &self,
        store: &mut S,
        task: &Task,
    ) -> WorkflowResult<(ProjectTaskStatus, bool)>
    where
        S: StatusStore + ?Sized,
    {
        let project_id = task.project_id();
        // The current status may have been deleted since; its order still
        // anchors the advance.
        let current_order = store
            .find_status(&StatusLookup::by_id(project_id, task.status_id()).with_deleted())
            .await?
            .and_then(|status| status.order());

        let filter = StatusFilter::for_project(project_id).with_order(OrderFilter::Ordered);
        let pipeline = store.list_statuses(&filter, StatusSort::BY_ORDER).await?;

        let advance = resolve_advance(current_order, &pipeline)
            .ok_or(WorkflowError::EmptyPipeline(project_id))?;
        Ok((advance.status().clone(), advance.wrapped()))
    }
}

/// Task transition orchestration service.
#[derive(Clone)]
pub struct TaskTransitionService<T, C>
where
    T: TransactionCoordinator,
    C: Clock + Send + Sync,
{
    coordinator: Arc<T>,
    transition: TaskTransition<C>,
}

impl<T, C> TaskTransitionService<T, C>
where
    T: TransactionCoordinator,
    C: Clock + Send + Sync,
{
    /// Creates a new task transition service.
    #[must_use]
    pub const fn new(coordinator: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            coordinator,
            transition: TaskTransition::new(clock),
        }
    }

    /// Changes a task's status in its own transaction.
    ///
    /// # Errors
    ///
    /// See [`TaskTransition::execute`].
    pub async fn change_task_status(
        &self,
        request: ChangeTaskStatusRequest,
    ) -> WorkflowResult<TransitionOutcome> {
        debug!(
            task_id = %request.task_id,
            status_id = ?request.status_id,
            advance = request.advance,
            "changing task status"
        );
        let mut transaction = self.coordinator.begin().await?;
        let result = self.transition.execute(&mut transaction, request).await;
        let outcome = conclude(transaction, "change_task_status", result).await?;
        info!(
            task_id = %outcome.task.id(),
            from = %outcome.previous_status_id,
            to = %outcome.destination.id(),
            wrapped = outcome.wrapped,
            "task status changed"
        );
        Ok(outcome)
    }
}
