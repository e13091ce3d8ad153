//! Shared helpers for `PostgreSQL` workflow integration tests.

use std::sync::Arc;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::fixture;
use tokio::runtime::Runtime;
use trellis::workflow::{
    adapters::postgres::PostgresWorkflowStore,
    domain::{
        OrganizationId, ProjectId, ProjectTaskStatus, StatusFilter, StatusOrder, StatusSort, Task,
    },
    ports::{StoreResult, TaskStore, TransactionCoordinator, WorkflowTransaction},
    services::{CreateStatusRequest, StatusCatalogService, TaskTransitionService, WorkflowResult},
};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// SQL creating the workflow tables.
pub const CREATE_WORKFLOW_TABLES_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_workflow_tables/up.sql");

/// Template database name for the pre-migrated schema.
pub const TEMPLATE_DB: &str = "trellis_test_template";

/// Catalog service over the `PostgreSQL` store.
pub type Catalog = StatusCatalogService<PostgresWorkflowStore, DefaultClock>;

/// Transition service over the `PostgreSQL` store.
pub type Transitions = TaskTransitionService<PostgresWorkflowStore, DefaultClock>;

/// Creates a runtime for driving the async services from sync tests.
pub fn test_runtime() -> Result<Runtime, BoxError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| Box::new(err) as BoxError)
}

/// Ensures the template database exists with the workflow tables applied.
pub fn ensure_template(cluster: &TestCluster) -> Result<(), BoxError> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|e| eyre::eyre!("{e}"))?;
            conn.batch_execute(CREATE_WORKFLOW_TABLES_SQL)
                .map_err(|e| eyre::eyre!("{e}"))?;
            Ok(())
        })
        .map_err(|err| Box::new(err) as BoxError)?;
    Ok(())
}

/// Database cloned from the template, dropped with the guard.
pub struct TestDatabase {
    cluster: &'static TestCluster,
    name: String,
}

impl TestDatabase {
    fn create(cluster: &'static TestCluster) -> Result<Self, BoxError> {
        let name = format!("trellis_{}", uuid::Uuid::new_v4().simple());
        cluster
            .create_database_from_template(name.as_str(), TEMPLATE_DB)
            .map_err(|err| Box::new(err) as BoxError)?;
        Ok(Self { cluster, name })
    }

    /// Returns the connection URL of this database.
    pub fn url(&self) -> String {
        self.cluster.connection().database_url(&self.name)
    }

    /// Runs `sql` on a dedicated connection outside any workflow transaction.
    pub fn execute(&self, sql: &str) -> Result<(), BoxError> {
        let mut conn =
            PgConnection::establish(&self.url()).map_err(|err| Box::new(err) as BoxError)?;
        conn.batch_execute(sql)
            .map_err(|err| Box::new(err) as BoxError)
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        drop(self.cluster.drop_database(self.name.as_str()));
    }
}

/// Services over a fresh database, plus the project they work on.
///
/// Fields drop in declaration order, so the pool closes before the database
/// is dropped.
pub struct PostgresWorkflow {
    pub store: Arc<PostgresWorkflowStore>,
    pub catalog: Catalog,
    pub transitions: Transitions,
    pub project_id: ProjectId,
    pub organization_id: OrganizationId,
    pub rt: Runtime,
    pub database: TestDatabase,
}

/// Provides services over a database cloned from the migrated template.
#[fixture]
pub fn postgres_workflow(shared_test_cluster: &'static TestCluster) -> PostgresWorkflow {
    ensure_template(shared_test_cluster).expect("template setup");
    let database = TestDatabase::create(shared_test_cluster).expect("database setup");
    let manager = ConnectionManager::<PgConnection>::new(database.url());
    // Two connections let a test hold one transaction open while another runs.
    let pool = Pool::builder()
        .max_size(2)
        .build(manager)
        .expect("pool setup");
    let store = Arc::new(PostgresWorkflowStore::new(pool));
    let clock = Arc::new(DefaultClock);
    PostgresWorkflow {
        catalog: StatusCatalogService::new(Arc::clone(&store), Arc::clone(&clock)),
        transitions: TaskTransitionService::new(Arc::clone(&store), clock),
        store,
        project_id: ProjectId::new(),
        organization_id: OrganizationId::new(),
        rt: test_runtime().expect("tokio runtime"),
        database,
    }
}

impl PostgresWorkflow {
    /// Creates ordered statuses named `names`, in sequence.
    pub async fn ordered(&self, names: &[&str]) -> WorkflowResult<Vec<ProjectTaskStatus>> {
        let mut created = Vec::with_capacity(names.len());
        for name in names {
            let request =
                CreateStatusRequest::new(self.project_id, *name, "#4a90d9").with_use_order(true);
            created.push(self.catalog.create_status(request).await?);
        }
        Ok(created)
    }

    /// Lists the project's live statuses by order.
    pub async fn live(&self) -> WorkflowResult<Vec<ProjectTaskStatus>> {
        self.catalog
            .list_statuses(&StatusFilter::for_project(self.project_id), StatusSort::BY_ORDER)
            .await
    }

    /// Stores a task on `status` directly through the store.
    pub async fn task_on(&self, status: &ProjectTaskStatus) -> StoreResult<Task> {
        let task = Task::new(self.organization_id, status, &DefaultClock);
        let mut transaction = self.store.begin().await?;
        transaction.store_task(&task).await?;
        transaction.commit().await?;
        Ok(task)
    }
}

/// Returns `(name, order)` pairs for `statuses`.
pub fn named_orders(statuses: &[ProjectTaskStatus]) -> Vec<(&str, Option<i8>)> {
    statuses
        .iter()
        .map(|status| (status.name().as_str(), status.order().map(StatusOrder::value)))
        .collect()
}
