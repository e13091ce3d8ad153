//! `PostgreSQL` adapters for workflow persistence.

mod config;
mod conversion;
mod models;
mod queries;
mod schema;
mod store;

pub use config::{
    ConfigError, DATABASE_URL_ENV, ISOLATION_ENV, IsolationLevel, POOL_SIZE_ENV,
    PostgresStoreConfig, WorkflowPgPool,
};
pub use store::{PostgresTransaction, PostgresWorkflowStore};
