//! `PostgreSQL` transaction coordinator and transaction handle.

use super::{
    config::{IsolationLevel, PostgresStoreConfig, WorkflowPgPool},
    queries,
};
use crate::workflow::{
    domain::{
        Page, Pagination, ProjectId, ProjectTaskStatus, StatusFilter, StatusOrder, StatusSort,
        Task, TaskId,
    },
    ports::{
        StatusLookup, StatusStore, StoreError, StoreResult, TaskScope, TaskStore,
        TransactionCoordinator, WorkflowTransaction,
    },
};
use async_trait::async_trait;
use diesel::connection::{AnsiTransactionManager, TransactionManager};
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, PoolError, PooledConnection};
use tracing::debug;

type PooledConn = PooledConnection<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed workflow store.
///
/// Each [`TransactionCoordinator::begin`] checks a connection out of the
/// pool and opens a transaction at the configured isolation level. Diesel
/// work runs on the blocking thread pool via [`tokio::task::spawn_blocking`].
#[derive(Debug, Clone)]
pub struct PostgresWorkflowStore {
    pool: WorkflowPgPool,
    isolation_level: IsolationLevel,
}

impl PostgresWorkflowStore {
    /// Creates a store over an existing pool using `SERIALIZABLE` isolation.
    #[must_use]
    pub fn new(pool: WorkflowPgPool) -> Self {
        Self {
            pool,
            isolation_level: IsolationLevel::default(),
        }
    }

    /// Builds the pool described by `config` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError`] when the pool cannot be built.
    pub fn from_config(config: &PostgresStoreConfig) -> Result<Self, PoolError> {
        let pool = config.build_pool()?;
        Ok(Self::new(pool).with_isolation_level(config.isolation_level()))
    }

    /// Sets the isolation level new transactions begin with.
    #[must_use]
    pub const fn with_isolation_level(mut self, level: IsolationLevel) -> Self {
        self.isolation_level = level;
        self
    }

    /// Returns the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &WorkflowPgPool {
        &self.pool
    }
}

#[async_trait]
impl TransactionCoordinator for PostgresWorkflowStore {
    type Transaction = PostgresTransaction;

    async fn begin(&self) -> StoreResult<PostgresTransaction> {
        let pool = self.pool.clone();
        let begin_sql = self.isolation_level.begin_sql();
        let connection = tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(StoreError::persistence)?;
            AnsiTransactionManager::begin_transaction_sql(&mut *connection, begin_sql)
                .map_err(queries::store_error)?;
            Ok::<_, StoreError>(connection)
        })
        .await
        .map_err(StoreError::persistence)??;

        debug!(isolation = ?self.isolation_level, "workflow transaction opened");
        Ok(PostgresTransaction {
            connection: Some(connection),
        })
    }
}

/// Open transaction over a pooled `PostgreSQL` connection.
///
/// Dropping the handle without committing returns the connection with its
/// transaction still open; the pool treats such connections as broken and
/// discards them, which rolls the work back.
pub struct PostgresTransaction {
    connection: Option<PooledConn>,
}

impl std::fmt::Debug for PostgresTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresTransaction")
            .field("closed", &self.connection.is_none())
            .finish()
    }
}

impl PostgresTransaction {
    /// Runs `f` against the transaction's connection on the blocking pool.
    async fn run<F, T>(&mut self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let mut connection = self.connection.take().ok_or(StoreError::TransactionClosed)?;
        let (returned, result) = tokio::task::spawn_blocking(move || {
            let outcome = f(&mut *connection);
            (connection, outcome)
        })
        .await
        .map_err(StoreError::persistence)?;
        self.connection = Some(returned);
        result
    }

    /// Ends the transaction with `finish`, closing the handle either way.
    async fn finish<F>(&mut self, finish: F) -> StoreResult<()>
    where
        F: FnOnce(&mut PgConnection) -> diesel::QueryResult<()> + Send + 'static,
    {
        let mut connection = self.connection.take().ok_or(StoreError::TransactionClosed)?;
        tokio::task::spawn_blocking(move || finish(&mut *connection))
            .await
            .map_err(StoreError::persistence)?
            .map_err(queries::store_error)
    }
}

#[async_trait]
impl StatusStore for PostgresTransaction {
    async fn find_status(
        &mut self,
        lookup: &StatusLookup,
    ) -> StoreResult<Option<ProjectTaskStatus>> {
        let owned_lookup = lookup.clone();
        self.run(move |connection| queries::find_status(connection, &owned_lookup))
            .await
    }

    async fn list_statuses(
        &mut self,
        filter: &StatusFilter,
        sort: StatusSort,
    ) -> StoreResult<Vec<ProjectTaskStatus>> {
        let owned_filter = filter.clone();
        self.run(move |connection| queries::list_statuses(connection, &owned_filter, sort))
            .await
    }

    async fn paginate_statuses(
        &mut self,
        filter: &StatusFilter,
        sort: StatusSort,
        pagination: Pagination,
    ) -> StoreResult<Page<ProjectTaskStatus>> {
        let owned_filter = filter.clone();
        self.run(move |connection| {
            queries::paginate_statuses(connection, &owned_filter, sort, pagination)
        })
        .await
    }

    async fn highest_order(&mut self, project_id: ProjectId) -> StoreResult<Option<StatusOrder>> {
        self.run(move |connection| queries::highest_order(connection, project_id))
            .await
    }

    async fn store_status(&mut self, status: &ProjectTaskStatus) -> StoreResult<()> {
        let owned_status = status.clone();
        self.run(move |connection| queries::insert_status(connection, &owned_status))
            .await
    }

    async fn update_status(&mut self, status: &ProjectTaskStatus) -> StoreResult<()> {
        let owned_status = status.clone();
        self.run(move |connection| queries::update_status(connection, &owned_status))
            .await
    }
}

#[async_trait]
impl TaskStore for PostgresTransaction {
    async fn find_task(&mut self, id: TaskId, scope: TaskScope) -> StoreResult<Option<Task>> {
        self.run(move |connection| queries::find_task(connection, id, scope))
            .await
    }

    async fn store_task(&mut self, task: &Task) -> StoreResult<()> {
        let owned_task = task.clone();
        self.run(move |connection| queries::insert_task(connection, &owned_task))
            .await
    }

    async fn update_task(&mut self, task: &Task) -> StoreResult<()> {
        let owned_task = task.clone();
        self.run(move |connection| queries::update_task(connection, &owned_task))
            .await
    }
}

#[async_trait]
impl WorkflowTransaction for PostgresTransaction {
    async fn commit(&mut self) -> StoreResult<()> {
        self.finish(|connection| AnsiTransactionManager::commit_transaction(connection))
            .await
    }

    async fn rollback(&mut self) -> StoreResult<()> {
        self.finish(|connection| AnsiTransactionManager::rollback_transaction(connection))
            .await
    }

    fn is_closed(&self) -> bool {
        self.connection.is_none()
    }
}
