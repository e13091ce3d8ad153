//! In-memory integration tests for the ordered status catalog.

use crate::in_memory::helpers::{Workflow, workflow};
use rstest::rstest;
use trellis::workflow::{
    domain::{OrderFilter, ProjectId, ProjectTaskStatus, StatusFilter, StatusOrder, StatusSort},
    services::{CreateStatusRequest, UpdateStatusRequest, WorkflowErrorKind},
};

fn names(statuses: &[ProjectTaskStatus]) -> Vec<&str> {
    statuses.iter().map(|s| s.name().as_str()).collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn inserting_before_a_run_pushes_it_back(workflow: Workflow) {
    workflow
        .ordered(&["Todo", "Doing", "Done"])
        .await
        .expect("pipeline creation should succeed");
    let review = workflow
        .catalog
        .create_status(CreateStatusRequest::new(workflow.project_id, "Review", "#f5a623"))
        .await
        .expect("unordered creation should succeed");

    workflow
        .catalog
        .update_status(UpdateStatusRequest::new(workflow.project_id, review.id()).with_order(2))
        .await
        .expect("reposition should succeed");

    let listed = workflow
        .catalog
        .list_statuses(&StatusFilter::for_project(workflow.project_id), StatusSort::BY_ORDER)
        .await
        .expect("listing should succeed");
    assert_eq!(names(&listed), vec!["Todo", "Doing", "Review", "Done"]);
    let orders: Vec<Option<i8>> = listed
        .iter()
        .map(|s| s.order().map(StatusOrder::value))
        .collect();
    assert_eq!(orders, vec![Some(0), Some(1), Some(2), Some(3)]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn next_create_follows_highest_live_order(workflow: Workflow) {
    let created = workflow
        .ordered(&["Todo", "Doing", "Done"])
        .await
        .expect("pipeline creation should succeed");
    let [_, _, done] = created.as_slice() else {
        panic!("expected three statuses");
    };
    workflow
        .catalog
        .delete_status(workflow.project_id, done.id())
        .await
        .expect("delete should succeed");

    let appended = workflow
        .ordered(&["Shipped"])
        .await
        .expect("append should succeed");

    let orders: Vec<_> = appended.iter().map(ProjectTaskStatus::order).collect();
    assert_eq!(orders, vec![Some(StatusOrder::new(2))]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_leaves_remaining_orders_alone(workflow: Workflow) {
    let created = workflow
        .ordered(&["Todo", "Doing", "Done"])
        .await
        .expect("pipeline creation should succeed");
    let [_, doing, _] = created.as_slice() else {
        panic!("expected three statuses");
    };

    workflow
        .catalog
        .delete_status(workflow.project_id, doing.id())
        .await
        .expect("delete should succeed");

    let listed = workflow
        .catalog
        .list_statuses(&StatusFilter::for_project(workflow.project_id), StatusSort::BY_ORDER)
        .await
        .expect("listing should succeed");
    assert_eq!(names(&listed), vec!["Todo", "Done"]);
    let orders: Vec<_> = listed.iter().map(ProjectTaskStatus::order).collect();
    assert_eq!(orders, vec![Some(StatusOrder::new(0)), Some(StatusOrder::new(2))]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn order_filters_select_a_range(workflow: Workflow) {
    workflow
        .ordered(&["Todo", "Doing", "Review", "Done"])
        .await
        .expect("pipeline creation should succeed");

    let filter = StatusFilter::for_project(workflow.project_id)
        .with_order(OrderFilter::GreaterThan(StatusOrder::new(1)));
    let listed = workflow
        .catalog
        .list_statuses(&filter, StatusSort::BY_ORDER)
        .await
        .expect("listing should succeed");

    assert_eq!(names(&listed), vec!["Review", "Done"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn get_status_is_scoped_to_its_project(workflow: Workflow) {
    let created = workflow
        .ordered(&["Todo"])
        .await
        .expect("pipeline creation should succeed");
    let [todo] = created.as_slice() else {
        panic!("expected one status");
    };

    let found = workflow
        .catalog
        .get_status(workflow.project_id, todo.id())
        .await
        .expect("lookup should succeed");
    assert_eq!(&found, todo);

    let err = workflow
        .catalog
        .get_status(ProjectId::new(), todo.id())
        .await
        .expect_err("foreign project lookup should fail");
    assert_eq!(err.kind(), WorkflowErrorKind::NotFound);
}
