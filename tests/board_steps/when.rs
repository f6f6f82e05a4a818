//! When steps for board workflow BDD scenarios.

use super::world::{BoardWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use serde_json::json;
use taskboard::board::domain::{CreateTaskRequest, Stage, TaskPatch, TransitionTarget};

#[when(r#"a task titled "{title}" is created"#)]
fn task_is_created(world: &mut BoardWorld, title: String) -> Result<(), eyre::Report> {
    let task = run_async(world.service.create_task(CreateTaskRequest::new(title)))
        .wrap_err("create task")?;
    world.remember(task);
    Ok(())
}

#[when("the task is advanced")]
fn task_is_advanced(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    let id = world.current()?.id();
    let task = run_async(world.service.advance_task(id)).wrap_err("advance task")?;
    world.remember(task);
    Ok(())
}

#[when(r#"the task is moved to "{stage}""#)]
fn task_is_moved(world: &mut BoardWorld, stage: String) -> Result<(), eyre::Report> {
    let target = Stage::try_from(stage.as_str())
        .map_err(|err| eyre::eyre!("invalid stage in scenario: {err}"))?;
    let id = world.current()?.id();
    let task = run_async(
        world
            .service
            .request_transition(id, TransitionTarget::To(target)),
    )
    .wrap_err("move task")?;
    world.remember(task);
    Ok(())
}

#[when(r#"the task is updated with status "{status}" and an unknown field"#)]
fn task_updated_with_unknown_field(
    world: &mut BoardWorld,
    status: String,
) -> Result<(), eyre::Report> {
    let patch = TaskPatch::from_json(&json!({"status": status, "colour": "teal"}))
        .wrap_err("parse update payload")?;
    let id = world.current()?.id();
    world.last_update = Some(run_async(world.service.update_task(id, patch)));
    Ok(())
}

#[when("the task is updated with no allow-listed fields")]
fn task_updated_with_nothing(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    let patch = TaskPatch::from_json(&json!({"colour": "teal", "id": 99}))
        .wrap_err("parse update payload")?;
    let id = world.current()?.id();
    world.last_update = Some(run_async(world.service.update_task(id, patch)));
    Ok(())
}

#[when("the task is deleted")]
fn task_is_deleted(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    let id = world.current()?.id();
    run_async(world.service.delete_task(id)).wrap_err("delete task")?;
    Ok(())
}

#[when("the task is deleted again")]
fn task_is_deleted_again(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    let id = world.current()?.id();
    world.last_delete = Some(run_async(world.service.delete_task(id)));
    Ok(())
}

#[when("the board is resynced")]
fn board_is_resynced(world: &mut BoardWorld) {
    world.last_resync = Some(run_async(world.service.resync()));
}

#[when("the store goes offline")]
fn store_goes_offline(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    world
        .service
        .store()
        .set_offline(true)
        .wrap_err("take store offline")?;
    Ok(())
}
