//! Snapshot-isolated in-memory workflow store.
//!
//! Each transaction works on a private copy of the committed state. Every
//! project carries a revision that moves on each commit writing to it. A
//! commit whose written projects moved since its snapshot fails with
//! [`StoreError::Conflict`] and publishes nothing, so writers to one project
//! are serialized first-committer-wins.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;

use crate::workflow::{
    domain::{
        Page, Pagination, ProjectId, ProjectTaskStatus, StatusFilter, StatusId, StatusOrder,
        StatusSort, Task, TaskId,
    },
    ports::{
        StatusLookup, StatusStore, StoreError, StoreResult, TaskScope, TaskStore,
        TransactionCoordinator, WorkflowTransaction,
    },
};

/// Thread-safe in-memory workflow store and transaction coordinator.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkflowStore {
    state: Arc<RwLock<InMemoryState>>,
}

#[derive(Debug, Clone, Default)]
struct InMemoryState {
    statuses: HashMap<StatusId, ProjectTaskStatus>,
    tasks: HashMap<TaskId, Task>,
    revisions: HashMap<ProjectId, u64>,
}

impl InMemoryState {
    fn revision(&self, project_id: ProjectId) -> u64 {
        self.revisions.get(&project_id).copied().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Error)]
#[error("project {0} was written by another transaction after this snapshot")]
struct StaleSnapshot(ProjectId);

impl InMemoryWorkflowStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionCoordinator for InMemoryWorkflowStore {
    type Transaction = InMemoryTransaction;

    async fn begin(&self) -> StoreResult<InMemoryTransaction> {
        let snapshot = self.state.read().map_err(lock_error)?.clone();
        Ok(InMemoryTransaction {
            shared: Arc::clone(&self.state),
            working: Some(snapshot),
            written_statuses: HashSet::new(),
            written_tasks: HashSet::new(),
            written_projects: HashSet::new(),
        })
    }
}

/// Open transaction over an [`InMemoryWorkflowStore`].
///
/// Dropping the handle without committing discards its writes.
#[derive(Debug)]
pub struct InMemoryTransaction {
    shared: Arc<RwLock<InMemoryState>>,
    working: Option<InMemoryState>,
    written_statuses: HashSet<StatusId>,
    written_tasks: HashSet<TaskId>,
    written_projects: HashSet<ProjectId>,
}

impl InMemoryTransaction {
    fn working(&self) -> StoreResult<&InMemoryState> {
        self.working.as_ref().ok_or(StoreError::TransactionClosed)
    }

    fn working_mut(&mut self) -> StoreResult<&mut InMemoryState> {
        self.working.as_mut().ok_or(StoreError::TransactionClosed)
    }

    fn clear_writes(&mut self) {
        self.written_statuses.clear();
        self.written_tasks.clear();
        self.written_projects.clear();
    }

    fn sorted_matches(
        &self,
        filter: &StatusFilter,
        sort: StatusSort,
    ) -> StoreResult<Vec<ProjectTaskStatus>> {
        let mut matches: Vec<ProjectTaskStatus> = self
            .working()?
            .statuses
            .values()
            .filter(|status| filter.matches(status))
            .cloned()
            .collect();
        matches.sort_by(|left, right| sort.compare(left, right));
        Ok(matches)
    }
}

fn lock_error<T>(err: PoisonError<T>) -> StoreError {
    StoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl StatusStore for InMemoryTransaction {
    async fn find_status(
        &mut self,
        lookup: &StatusLookup,
    ) -> StoreResult<Option<ProjectTaskStatus>> {
        let found = self
            .working()?
            .statuses
            .values()
            .filter(|status| lookup.matches(status))
            .min_by(|left, right| StatusSort::BY_ORDER.compare(left, right))
            .cloned();
        Ok(found)
    }

    async fn list_statuses(
        &mut self,
        filter: &StatusFilter,
        sort: StatusSort,
    ) -> StoreResult<Vec<ProjectTaskStatus>> {
        self.sorted_matches(filter, sort)
    }

    async fn paginate_statuses(
        &mut self,
        filter: &StatusFilter,
        sort: StatusSort,
        pagination: Pagination,
    ) -> StoreResult<Page<ProjectTaskStatus>> {
        let matches = self.sorted_matches(filter, sort)?;
        let total = u64::try_from(matches.len()).map_err(StoreError::persistence)?;
        let skip = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(pagination.per_page()).unwrap_or(usize::MAX);
        let items = matches.into_iter().skip(skip).take(take).collect();
        Ok(Page {
            items,
            total,
            pagination,
        })
    }

    async fn highest_order(&mut self, project_id: ProjectId) -> StoreResult<Option<StatusOrder>> {
        let highest = self
            .working()?
            .statuses
            .values()
            .filter(|status| status.project_id() == project_id && !status.is_deleted())
            .filter_map(ProjectTaskStatus::order)
            .max();
        Ok(highest)
    }

    async fn store_status(&mut self, status: &ProjectTaskStatus) -> StoreResult<()> {
        let state = self.working_mut()?;
        if state.statuses.contains_key(&status.id()) {
            return Err(StoreError::DuplicateStatus(status.id()));
        }
        state.statuses.insert(status.id(), status.clone());
        self.written_statuses.insert(status.id());
        self.written_projects.insert(status.project_id());
        Ok(())
    }

    async fn update_status(&mut self, status: &ProjectTaskStatus) -> StoreResult<()> {
        let state = self.working_mut()?;
        let slot = state
            .statuses
            .get_mut(&status.id())
            .ok_or(StoreError::StatusNotFound(status.id()))?;
        *slot = status.clone();
        self.written_statuses.insert(status.id());
        self.written_projects.insert(status.project_id());
        Ok(())
    }
}

#[async_trait]
impl TaskStore for InMemoryTransaction {
    async fn find_task(&mut self, id: TaskId, scope: TaskScope) -> StoreResult<Option<Task>> {
        let task = self
            .working()?
            .tasks
            .get(&id)
            .filter(|task| scope.contains(task))
            .cloned();
        Ok(task)
    }

    async fn store_task(&mut self, task: &Task) -> StoreResult<()> {
        let state = self.working_mut()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(StoreError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        self.written_tasks.insert(task.id());
        self.written_projects.insert(task.project_id());
        Ok(())
    }

    async fn update_task(&mut self, task: &Task) -> StoreResult<()> {
        let state = self.working_mut()?;
        let slot = state
            .tasks
            .get_mut(&task.id())
            .ok_or(StoreError::TaskNotFound(task.id()))?;
        *slot = task.clone();
        self.written_tasks.insert(task.id());
        self.written_projects.insert(task.project_id());
        Ok(())
    }
}

#[async_trait]
impl WorkflowTransaction for InMemoryTransaction {
    async fn commit(&mut self) -> StoreResult<()> {
        let mut working = self.working.take().ok_or(StoreError::TransactionClosed)?;
        let shared_state = Arc::clone(&self.shared);
        let mut shared = shared_state.write().map_err(lock_error)?;

        let stale = self
            .written_projects
            .iter()
            .copied()
            .find(|project_id| shared.revision(*project_id) != working.revision(*project_id));
        if let Some(project_id) = stale {
            self.clear_writes();
            return Err(StoreError::conflict(StaleSnapshot(project_id)));
        }

        for id in self.written_statuses.drain() {
            if let Some(status) = working.statuses.remove(&id) {
                shared.statuses.insert(id, status);
            }
        }
        for id in self.written_tasks.drain() {
            if let Some(task) = working.tasks.remove(&id) {
                shared.tasks.insert(id, task);
            }
        }
        for project_id in self.written_projects.drain() {
            *shared.revisions.entry(project_id).or_default() += 1;
        }
        Ok(())
    }

    async fn rollback(&mut self) -> StoreResult<()> {
        self.working.take().ok_or(StoreError::TransactionClosed)?;
        self.clear_writes();
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.working.is_none()
    }
}
