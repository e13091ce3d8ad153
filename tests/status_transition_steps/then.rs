//! Then steps for task status transition BDD scenarios.

use super::world::{StatusTransitionWorld, run_async, split_names};
use rstest_bdd_macros::then;
use trellis::workflow::{
    domain::{StatusFilter, StatusSort},
    services::{TransitionOutcome, WorkflowErrorKind},
};

fn last_outcome(world: &StatusTransitionWorld) -> Result<&TransitionOutcome, eyre::Report> {
    match world.last_result.as_ref() {
        Some(Ok(outcome)) => Ok(outcome),
        Some(Err(err)) => Err(eyre::eyre!("transition failed: {err}")),
        None => Err(eyre::eyre!("missing transition result")),
    }
}

#[then(r#"the task status is "{name}""#)]
fn task_status_is(world: &StatusTransitionWorld, name: String) -> Result<(), eyre::Report> {
    let expected = world.status(&name)?.id();
    let actual = world.task()?.status_id();
    if actual != expected {
        return Err(eyre::eyre!("expected task on {name}, found status {actual}"));
    }
    Ok(())
}

#[then("the transition wrapped around")]
fn transition_wrapped(world: &StatusTransitionWorld) -> Result<(), eyre::Report> {
    if !last_outcome(world)?.wrapped {
        return Err(eyre::eyre!("expected the transition to wrap around"));
    }
    Ok(())
}

#[then("the transition did not wrap around")]
fn transition_did_not_wrap(world: &StatusTransitionWorld) -> Result<(), eyre::Report> {
    if last_outcome(world)?.wrapped {
        return Err(eyre::eyre!("expected the transition not to wrap around"));
    }
    Ok(())
}

#[then("the transition fails with a not found error")]
fn transition_fails_not_found(world: &StatusTransitionWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing transition result"))?;

    match result {
        Err(err) if err.kind() == WorkflowErrorKind::NotFound => Ok(()),
        other => Err(eyre::eyre!("expected a not found error, got {other:?}")),
    }
}

#[then(r#"the pipeline reads "{names}""#)]
fn pipeline_reads(world: &StatusTransitionWorld, names: String) -> Result<(), eyre::Report> {
    let listed = run_async(
        world
            .catalog
            .list_statuses(&StatusFilter::for_project(world.project_id), StatusSort::BY_ORDER),
    )?;
    let actual: Vec<String> = listed
        .iter()
        .map(|status| status.name().as_str().to_owned())
        .collect();
    let expected = split_names(&names);
    if actual != expected {
        return Err(eyre::eyre!("expected pipeline {expected:?}, found {actual:?}"));
    }
    Ok(())
}
