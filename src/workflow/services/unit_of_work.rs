//! Commit-or-rollback handling shared by the workflow services.

use super::{WorkflowError, WorkflowResult};
use crate::workflow::ports::WorkflowTransaction;
use tracing::warn;

/// Ends `transaction` according to `result`.
///
/// Success commits; a failed commit is reported as the operation's error.
/// Failure rolls back and returns the original error. A rollback failure is
/// logged and does not replace the original error.
pub(super) async fn conclude<X, T>(
    mut transaction: X,
    operation: &'static str,
    result: WorkflowResult<T>,
) -> WorkflowResult<T>
where
    X: WorkflowTransaction,
{
    match result {
        Ok(value) => {
            transaction.commit().await.map_err(WorkflowError::from)?;
            Ok(value)
        }
        Err(err) => {
            warn!(operation, error = %err, "rolling back workflow transaction");
            if let Err(rollback_err) = transaction.rollback().await {
                warn!(operation, error = %rollback_err, "workflow rollback failed");
            }
            Err(err)
        }
    }
}
