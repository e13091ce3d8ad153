//! In-memory adapters for workflow tests and embedders.

mod store;

pub use store::{InMemoryTransaction, InMemoryWorkflowStore};
