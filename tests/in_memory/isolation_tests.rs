//! In-memory integration tests for transaction visibility.

use crate::in_memory::helpers::{Workflow, workflow};
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::rstest;
use trellis::workflow::{
    domain::{ProjectId, StatusFilter, StatusOrder, StatusSort},
    ports::{StatusStore, StoreError, TransactionCoordinator, WorkflowTransaction},
    services::{CreateStatusRequest, StatusCatalog, WorkflowError, WorkflowErrorKind},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn uncommitted_writes_are_invisible(workflow: Workflow) {
    let catalog = StatusCatalog::new(Arc::new(DefaultClock));
    let mut transaction = workflow.store.begin().await.expect("begin should succeed");
    catalog
        .create(
            &mut transaction,
            CreateStatusRequest::new(workflow.project_id, "Draft", "#cccccc"),
        )
        .await
        .expect("create should succeed");

    let filter = StatusFilter::for_project(workflow.project_id);
    let outside = workflow
        .catalog
        .list_statuses(&filter, StatusSort::BY_ORDER)
        .await
        .expect("listing should succeed");
    assert!(outside.is_empty());

    transaction.rollback().await.expect("rollback should succeed");
    assert!(transaction.is_closed());
    let after = workflow
        .catalog
        .list_statuses(&filter, StatusSort::BY_ORDER)
        .await
        .expect("listing should succeed");
    assert!(after.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn closed_transaction_rejects_further_calls(workflow: Workflow) {
    let mut transaction = workflow.store.begin().await.expect("begin should succeed");
    transaction.commit().await.expect("commit should succeed");

    let result = transaction.highest_order(workflow.project_id).await;

    assert!(matches!(result, Err(StoreError::TransactionClosed)));
    assert!(matches!(
        transaction.commit().await,
        Err(StoreError::TransactionClosed)
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_ordered_creates_cannot_share_an_order(workflow: Workflow) {
    let catalog = StatusCatalog::new(Arc::new(DefaultClock));
    let mut first = workflow.store.begin().await.expect("begin should succeed");
    let mut second = workflow.store.begin().await.expect("begin should succeed");

    let winner = catalog
        .create(
            &mut first,
            CreateStatusRequest::new(workflow.project_id, "Todo", "#cccccc").with_use_order(true),
        )
        .await
        .expect("create should succeed");
    let loser = catalog
        .create(
            &mut second,
            CreateStatusRequest::new(workflow.project_id, "Doing", "#cccccc").with_use_order(true),
        )
        .await
        .expect("create should succeed");
    assert_eq!(winner.order(), loser.order(), "both snapshots see an empty project");

    first.commit().await.expect("first commit should succeed");
    let err = second
        .commit()
        .await
        .expect_err("second commit should be rejected");

    assert!(matches!(err, StoreError::Conflict(_)));
    assert_eq!(WorkflowError::from(err).kind(), WorkflowErrorKind::Conflict);
    assert!(second.is_closed());
    let filter = StatusFilter::for_project(workflow.project_id);
    let listed = workflow
        .catalog
        .list_statuses(&filter, StatusSort::BY_ORDER)
        .await
        .expect("listing should succeed");
    assert_eq!(listed, vec![winner]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn writers_to_different_projects_both_commit(workflow: Workflow) {
    let catalog = StatusCatalog::new(Arc::new(DefaultClock));
    let other_project = ProjectId::new();
    let mut first = workflow.store.begin().await.expect("begin should succeed");
    let mut second = workflow.store.begin().await.expect("begin should succeed");

    catalog
        .create(
            &mut first,
            CreateStatusRequest::new(workflow.project_id, "Todo", "#cccccc").with_use_order(true),
        )
        .await
        .expect("create should succeed");
    catalog
        .create(
            &mut second,
            CreateStatusRequest::new(other_project, "Todo", "#cccccc").with_use_order(true),
        )
        .await
        .expect("create should succeed");

    first.commit().await.expect("first commit should succeed");
    second.commit().await.expect("second commit should succeed");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn retry_after_conflict_takes_the_next_order(workflow: Workflow) {
    let catalog = StatusCatalog::new(Arc::new(DefaultClock));
    let mut first = workflow.store.begin().await.expect("begin should succeed");
    let mut second = workflow.store.begin().await.expect("begin should succeed");
    let request = || {
        CreateStatusRequest::new(workflow.project_id, "Todo", "#cccccc").with_use_order(true)
    };

    catalog
        .create(&mut first, request())
        .await
        .expect("create should succeed");
    catalog
        .create(&mut second, request())
        .await
        .expect("create should succeed");
    first.commit().await.expect("first commit should succeed");
    second
        .commit()
        .await
        .expect_err("second commit should be rejected");

    let mut retry = workflow.store.begin().await.expect("begin should succeed");
    let retried = catalog
        .create(&mut retry, request())
        .await
        .expect("create should succeed");
    retry.commit().await.expect("retry commit should succeed");

    assert_eq!(retried.order(), Some(StatusOrder::new(1)));
}
