//! Given steps for board workflow BDD scenarios.

use super::world::{BoardWorld, run_async};
use chrono::NaiveDate;
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskboard::board::domain::{CreateTaskRequest, Stage, User, UserId};

fn create(world: &mut BoardWorld, request: CreateTaskRequest) -> Result<(), eyre::Report> {
    let task = run_async(world.service.create_task(request))
        .wrap_err("create task in scenario setup")?;
    world.remember(task);
    Ok(())
}

#[given("an empty board")]
fn empty_board(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    let snapshot = run_async(world.service.resync()).wrap_err("load empty board")?;
    eyre::ensure!(
        snapshot.tasks().is_empty(),
        "expected an empty store, found {} tasks",
        snapshot.tasks().len()
    );
    Ok(())
}

#[given(r#"a task titled "{title}" due on "{due_date}""#)]
fn task_with_due_date(
    world: &mut BoardWorld,
    title: String,
    due_date: String,
) -> Result<(), eyre::Report> {
    let date = NaiveDate::parse_from_str(&due_date, "%Y-%m-%d")
        .wrap_err_with(|| format!("invalid due date in scenario: {due_date}"))?;
    create(world, CreateTaskRequest::new(title).with_due_date(date))
}

#[given(r#"a task titled "{title}" with no due date"#)]
fn task_without_due_date(world: &mut BoardWorld, title: String) -> Result<(), eyre::Report> {
    create(world, CreateTaskRequest::new(title))
}

#[given(r#"a task titled "{title}" in stage "{stage}""#)]
fn task_in_stage(
    world: &mut BoardWorld,
    title: String,
    stage: String,
) -> Result<(), eyre::Report> {
    let parsed = Stage::try_from(stage.as_str())
        .map_err(|err| eyre::eyre!("invalid stage in scenario: {err}"))?;
    create(world, CreateTaskRequest::new(title).with_status(parsed))
}

#[given(r#"a user #{user_id:u64} named "{name}""#)]
fn user_named(world: &mut BoardWorld, user_id: u64, name: String) -> Result<(), eyre::Report> {
    let id = i64::try_from(user_id).wrap_err("user id out of range")?;
    let email = format!("user{id}@example.com");
    world
        .service
        .store()
        .set_users([User::new(UserId::new(id), name, email)])
        .wrap_err("seed users")?;
    Ok(())
}

#[given(r#"a task titled "{title}" assigned to user #{user_id:u64}"#)]
fn task_assigned_to(
    world: &mut BoardWorld,
    title: String,
    user_id: u64,
) -> Result<(), eyre::Report> {
    let id = i64::try_from(user_id).wrap_err("user id out of range")?;
    create(
        world,
        CreateTaskRequest::new(title).with_assignee(UserId::new(id)),
    )
}

#[given("the board has been loaded")]
fn board_loaded(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    run_async(world.service.resync()).wrap_err("initial board load")?;
    Ok(())
}
