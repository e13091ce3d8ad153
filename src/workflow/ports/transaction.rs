//! Unit-of-work contract shared by the workflow services.

use super::{StatusStore, StoreResult, TaskStore};
use async_trait::async_trait;

/// An open unit of work against the workflow stores.
///
/// Writes made through the handle become visible to other transactions only
/// after [`WorkflowTransaction::commit`]. Once committed or rolled back, the
/// handle is closed and every further call fails with
/// [`super::StoreError::TransactionClosed`].
#[async_trait]
pub trait WorkflowTransaction: StatusStore + TaskStore {
    /// Makes every write of this transaction durable and visible.
    async fn commit(&mut self) -> StoreResult<()>;

    /// Discards every write of this transaction.
    async fn rollback(&mut self) -> StoreResult<()>;

    /// Returns whether the transaction was committed or rolled back.
    fn is_closed(&self) -> bool;
}

/// Opens workflow transactions.
#[async_trait]
pub trait TransactionCoordinator: Send + Sync {
    /// Transaction handle produced by [`TransactionCoordinator::begin`].
    type Transaction: WorkflowTransaction;

    /// Begins a new transaction.
    async fn begin(&self) -> StoreResult<Self::Transaction>;
}
