//! In-memory integration tests for task status transitions.

use crate::in_memory::helpers::{Workflow, workflow};
use rstest::rstest;
use trellis::workflow::{
    domain::{TaskId, UserId},
    services::{ChangeTaskStatusRequest, UpdateStatusRequest, WorkflowErrorKind},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn advancing_cycles_through_the_pipeline(workflow: Workflow) {
    let statuses = workflow
        .ordered(&["Todo", "Doing", "Done"])
        .await
        .expect("pipeline creation should succeed");
    let [todo, _, _] = statuses.as_slice() else {
        panic!("expected three statuses");
    };
    let task = workflow
        .task_on(todo)
        .await
        .expect("task seeding should succeed");
    let actor = UserId::new();

    let mut visited = Vec::new();
    for _ in 0..4 {
        let outcome = workflow
            .transitions
            .change_task_status(ChangeTaskStatusRequest::new(task.id(), actor).with_advance(true))
            .await
            .expect("advance should succeed");
        visited.push(outcome.destination.name().as_str().to_owned());
    }

    assert_eq!(visited, vec!["Doing", "Done", "Todo", "Doing"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn advancing_follows_a_reposition(workflow: Workflow) {
    let statuses = workflow
        .ordered(&["Todo", "Doing", "Done"])
        .await
        .expect("pipeline creation should succeed");
    let [todo, _, done] = statuses.as_slice() else {
        panic!("expected three statuses");
    };
    let task = workflow
        .task_on(todo)
        .await
        .expect("task seeding should succeed");
    workflow
        .catalog
        .update_status(UpdateStatusRequest::new(workflow.project_id, done.id()).with_order(1))
        .await
        .expect("reposition should succeed");

    let outcome = workflow
        .transitions
        .change_task_status(
            ChangeTaskStatusRequest::new(task.id(), UserId::new()).with_advance(true),
        )
        .await
        .expect("advance should succeed");

    assert_eq!(outcome.destination.id(), done.id());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn explicit_move_to_deleted_status_is_not_found(workflow: Workflow) {
    let statuses = workflow
        .ordered(&["Todo", "Doing"])
        .await
        .expect("pipeline creation should succeed");
    let [todo, doing] = statuses.as_slice() else {
        panic!("expected two statuses");
    };
    let task = workflow
        .task_on(todo)
        .await
        .expect("task seeding should succeed");
    workflow
        .catalog
        .delete_status(workflow.project_id, doing.id())
        .await
        .expect("delete should succeed");

    let err = workflow
        .transitions
        .change_task_status(
            ChangeTaskStatusRequest::new(task.id(), UserId::new())
                .in_organization(workflow.organization_id)
                .to_status(doing.id()),
        )
        .await
        .expect_err("deleted target should be rejected");

    assert_eq!(err.kind(), WorkflowErrorKind::NotFound);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_task_is_not_found(workflow: Workflow) {
    let err = workflow
        .transitions
        .change_task_status(
            ChangeTaskStatusRequest::new(TaskId::new(), UserId::new())
                .with_advance(true),
        )
        .await
        .expect_err("unknown task should be rejected");

    assert_eq!(err.kind(), WorkflowErrorKind::NotFound);
}
