//! Given steps for task status transition BDD scenarios.

use super::world::{StatusTransitionWorld, run_async, split_names};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use trellis::workflow::{
    domain::{ProjectId, Task},
    ports::{TaskStore, TransactionCoordinator, WorkflowTransaction},
    services::CreateStatusRequest,
};

#[given(r#"a project pipeline "{names}""#)]
fn project_pipeline(world: &mut StatusTransitionWorld, names: String) -> Result<(), eyre::Report> {
    for name in split_names(&names) {
        let request =
            CreateStatusRequest::new(world.project_id, name.clone(), "#4a90d9").with_use_order(true);
        let created = run_async(world.catalog.create_status(request))
            .wrap_err_with(|| format!("create pipeline status {name}"))?;
        world.statuses.insert(name, created);
    }
    Ok(())
}

#[given(r#"a task in status "{name}""#)]
fn task_in_status(world: &mut StatusTransitionWorld, name: String) -> Result<(), eyre::Report> {
    let task = Task::new(world.organization_id, world.status(&name)?, &mockable::DefaultClock);
    run_async(async {
        let mut transaction = world.store.begin().await?;
        transaction.store_task(&task).await?;
        transaction.commit().await
    })
    .wrap_err("seed scenario task")?;
    world.task = Some(task);
    Ok(())
}

#[given(r#"the status "{name}" has been deleted"#)]
fn status_deleted(world: &mut StatusTransitionWorld, name: String) -> Result<(), eyre::Report> {
    let status_id = world.status(&name)?.id();
    run_async(world.catalog.delete_status(world.project_id, status_id))
        .wrap_err("delete scenario status")?;
    Ok(())
}

#[given(r#"another project with a status "{name}""#)]
fn foreign_status(world: &mut StatusTransitionWorld, name: String) -> Result<(), eyre::Report> {
    let request =
        CreateStatusRequest::new(ProjectId::new(), name.clone(), "#d0021b").with_use_order(true);
    let created =
        run_async(world.catalog.create_status(request)).wrap_err("create foreign status")?;
    world.foreign_statuses.insert(name, created);
    Ok(())
}
