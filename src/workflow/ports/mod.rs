//! Port contracts for status catalogs and task transitions.
//!
//! Ports define infrastructure-agnostic interfaces used by workflow services.
//! Both stores are implemented by the transaction handle, so every read and
//! write a service performs belongs to one unit of work.

pub mod error;
pub mod status_store;
pub mod task_store;
pub mod transaction;

pub use error::{StoreError, StoreResult};
pub use status_store::{StatusLookup, StatusStore};
pub use task_store::{TaskScope, TaskStore};
pub use transaction::{TransactionCoordinator, WorkflowTransaction};
