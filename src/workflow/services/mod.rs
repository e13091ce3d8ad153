//! Orchestration services for the workflow context.
//!
//! Each service call opens one transaction through a
//! [`crate::workflow::ports::TransactionCoordinator`] and commits it on
//! success or rolls it back on failure. The inner [`StatusCatalog`] and
//! [`TaskTransition`] run against an already open transaction for callers
//! that manage the unit of work themselves.

mod catalog;
mod error;
mod transition;
mod unit_of_work;

pub use catalog::{CreateStatusRequest, StatusCatalog, StatusCatalogService, UpdateStatusRequest};
pub use error::{WorkflowError, WorkflowErrorKind, WorkflowResult};
pub use transition::{
    ChangeTaskStatusRequest, TaskTransition, TaskTransitionService, TransitionOutcome,
};
