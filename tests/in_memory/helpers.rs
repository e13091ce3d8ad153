//! Shared test helpers for in-memory workflow integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use trellis::workflow::{
    adapters::memory::InMemoryWorkflowStore,
    domain::{OrganizationId, ProjectId, ProjectTaskStatus, Task},
    ports::{StoreResult, TaskStore, TransactionCoordinator, WorkflowTransaction},
    services::{CreateStatusRequest, StatusCatalogService, TaskTransitionService, WorkflowResult},
};

/// Catalog service type used by the integration tests.
pub type Catalog = StatusCatalogService<InMemoryWorkflowStore, DefaultClock>;

/// Transition service type used by the integration tests.
pub type Transitions = TaskTransitionService<InMemoryWorkflowStore, DefaultClock>;

/// Both services sharing one store, plus the project they work on.
pub struct Workflow {
    pub store: Arc<InMemoryWorkflowStore>,
    pub catalog: Catalog,
    pub transitions: Transitions,
    pub project_id: ProjectId,
    pub organization_id: OrganizationId,
}

/// Provides services over a fresh in-memory store.
#[fixture]
pub fn workflow() -> Workflow {
    let store = Arc::new(InMemoryWorkflowStore::new());
    let clock = Arc::new(DefaultClock);
    Workflow {
        catalog: StatusCatalogService::new(Arc::clone(&store), Arc::clone(&clock)),
        transitions: TaskTransitionService::new(Arc::clone(&store), clock),
        store,
        project_id: ProjectId::new(),
        organization_id: OrganizationId::new(),
    }
}

impl Workflow {
    /// Creates ordered statuses named `names`, in sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if any creation fails.
    pub async fn ordered(&self, names: &[&str]) -> WorkflowResult<Vec<ProjectTaskStatus>> {
        let mut created = Vec::with_capacity(names.len());
        for name in names {
            let request =
                CreateStatusRequest::new(self.project_id, *name, "#4a90d9").with_use_order(true);
            created.push(self.catalog.create_status(request).await?);
        }
        Ok(created)
    }

    /// Stores a task on `status` directly through the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the task.
    pub async fn task_on(&self, status: &ProjectTaskStatus) -> StoreResult<Task> {
        let task = Task::new(self.organization_id, status, &DefaultClock);
        let mut transaction = self.store.begin().await?;
        transaction.store_task(&task).await?;
        transaction.commit().await?;
        Ok(task)
    }
}
