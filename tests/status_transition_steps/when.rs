//! When steps for task status transition BDD scenarios.

use super::world::{StatusTransitionWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use trellis::workflow::services::{ChangeTaskStatusRequest, UpdateStatusRequest};

fn record(world: &mut StatusTransitionWorld, request: ChangeTaskStatusRequest) {
    let result = run_async(world.transitions.change_task_status(request));
    if let Ok(ref outcome) = result {
        world.task = Some(outcome.task.clone());
    }
    world.last_result = Some(result);
}

#[when("the task is advanced")]
fn task_advanced(world: &mut StatusTransitionWorld) -> Result<(), eyre::Report> {
    let request = ChangeTaskStatusRequest::new(world.task()?.id(), world.actor)
        .in_organization(world.organization_id)
        .with_advance(true);
    record(world, request);
    Ok(())
}

#[when(r#"the task is moved to the other project's status "{name}""#)]
fn task_moved_to_foreign_status(
    world: &mut StatusTransitionWorld,
    name: String,
) -> Result<(), eyre::Report> {
    let status_id = world
        .foreign_statuses
        .get(&name)
        .map(|status| status.id())
        .ok_or_else(|| eyre::eyre!("unknown foreign status {name:?}"))?;
    let request = ChangeTaskStatusRequest::new(world.task()?.id(), world.actor)
        .in_organization(world.organization_id)
        .to_status(status_id);
    record(world, request);
    Ok(())
}

#[when(r#"the status "{name}" is moved to position {position}"#)]
fn status_repositioned(
    world: &mut StatusTransitionWorld,
    name: String,
    position: i8,
) -> Result<(), eyre::Report> {
    let status_id = world.status(&name)?.id();
    let request = UpdateStatusRequest::new(world.project_id, status_id).with_order(position);
    run_async(world.catalog.update_status(request)).wrap_err("reposition scenario status")?;
    Ok(())
}
