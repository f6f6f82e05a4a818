//! Then steps for board workflow BDD scenarios.

use super::world::{BoardWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::then;
use taskboard::board::{
    domain::{AssigneeFilter, BoardView, Stage, Task, TaskId},
    ports::TaskStore,
    services::BoardError,
};

fn stored_task(world: &BoardWorld) -> Result<Task, eyre::Report> {
    let id = world.current()?.id();
    run_async(world.service.store().find_task(id))
        .wrap_err("read task back from store")?
        .ok_or_else(|| eyre::eyre!("task {id} missing from store"))
}

fn loaded_board(
    world: &BoardWorld,
    filter: Option<&AssigneeFilter>,
) -> Result<BoardView, eyre::Report> {
    world
        .service
        .board(filter)
        .ok_or_else(|| eyre::eyre!("board has not been loaded"))
}

fn titles_in(world: &BoardWorld, view: &BoardView, stage: Stage) -> Vec<String> {
    view.column(stage)
        .cards
        .iter()
        .map(|card| card.task.title().to_owned())
        .filter(|title| world.tasks_by_title.contains_key(title))
        .collect()
}

fn parse_stage(raw: &str) -> Result<Stage, eyre::Report> {
    Stage::try_from(raw).map_err(|err| eyre::eyre!("invalid stage in scenario: {err}"))
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &BoardWorld, status: String) -> Result<(), eyre::Report> {
    let task = stored_task(world)?;
    eyre::ensure!(
        task.status().as_str() == status,
        "expected status '{status}', found '{}'",
        task.status().as_str()
    );
    Ok(())
}

#[then("the task progress is {progress:u64}")]
fn task_progress_is(world: &BoardWorld, progress: u64) -> Result<(), eyre::Report> {
    let task = stored_task(world)?;
    let actual = u64::try_from(task.progress()).wrap_err("negative progress")?;
    eyre::ensure!(
        actual == progress,
        "expected progress {progress}, found {actual}"
    );
    Ok(())
}

#[then(r#"the task title is "{title}""#)]
fn task_title_is(world: &BoardWorld, title: String) -> Result<(), eyre::Report> {
    let task = stored_task(world)?;
    eyre::ensure!(
        task.title() == title,
        "expected title '{title}', found '{}'",
        task.title()
    );
    Ok(())
}

#[then("the update succeeds")]
fn update_succeeds(world: &BoardWorld) -> Result<(), eyre::Report> {
    match world.last_update.as_ref() {
        Some(Ok(_)) => Ok(()),
        Some(Err(err)) => Err(eyre::eyre!("update failed: {err}")),
        None => Err(eyre::eyre!("no update was attempted")),
    }
}

#[then("the update fails with a validation error")]
fn update_fails_validation(world: &BoardWorld) -> Result<(), eyre::Report> {
    match world.last_update.as_ref() {
        Some(Err(BoardError::Validation(_))) => Ok(()),
        Some(other) => Err(eyre::eyre!("expected validation error, got {other:?}")),
        None => Err(eyre::eyre!("no update was attempted")),
    }
}

#[then("the last deletion fails with not found")]
fn deletion_not_found(world: &BoardWorld) -> Result<(), eyre::Report> {
    let expected: TaskId = world.current()?.id();
    match world.last_delete.as_ref() {
        Some(Err(BoardError::NotFound(id))) if *id == expected => Ok(()),
        Some(other) => Err(eyre::eyre!("expected not found for {expected}, got {other:?}")),
        None => Err(eyre::eyre!("no repeated deletion was attempted")),
    }
}

#[then(r#"the "{stage}" column lists "{first}" before "{second}""#)]
fn column_order(
    world: &BoardWorld,
    stage: String,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    let view = loaded_board(world, None)?;
    let titles = titles_in(world, &view, parse_stage(&stage)?);
    eyre::ensure!(
        titles == vec![first.clone(), second.clone()],
        "expected [{first}, {second}] in '{stage}', found {titles:?}"
    );
    Ok(())
}

#[then(r#"the "{stage}" column contains only "{title}""#)]
fn column_contains_only(
    world: &BoardWorld,
    stage: String,
    title: String,
) -> Result<(), eyre::Report> {
    let view = loaded_board(world, None)?;
    let titles = titles_in(world, &view, parse_stage(&stage)?);
    eyre::ensure!(
        titles == vec![title.clone()],
        "expected only '{title}' in '{stage}', found {titles:?}"
    );
    Ok(())
}

#[then(r#"filtering by assignee "{raw}" shows only "{title}""#)]
fn filter_shows_only(world: &BoardWorld, raw: String, title: String) -> Result<(), eyre::Report> {
    let filter = AssigneeFilter::parse(&raw)
        .ok_or_else(|| eyre::eyre!("filter '{raw}' should not be blank"))?;
    let view = loaded_board(world, Some(&filter))?;
    let titles: Vec<String> = view
        .columns()
        .into_iter()
        .flat_map(|column| column.cards.iter())
        .map(|card| card.task.title().to_owned())
        .collect();
    eyre::ensure!(
        titles == vec![title.clone()],
        "expected only '{title}' for assignee '{raw}', found {titles:?}"
    );
    Ok(())
}

#[then(r#"the card "{title}" shows assignee "{name}" with initials "{initials}""#)]
fn card_shows_assignee(
    world: &BoardWorld,
    title: String,
    name: String,
    initials: String,
) -> Result<(), eyre::Report> {
    let id = world.task_id(&title)?;
    let view = loaded_board(world, None)?;
    let card = view
        .columns()
        .into_iter()
        .flat_map(|column| column.cards.iter())
        .find(|card| card.task.id() == id)
        .ok_or_else(|| eyre::eyre!("card '{title}' not on the board"))?;
    eyre::ensure!(
        card.assignee_name == name && card.initials == initials,
        "expected '{name}' ({initials}), found '{}' ({})",
        card.assignee_name,
        card.initials
    );
    Ok(())
}

#[then("the resync fails with the store unavailable")]
fn resync_unavailable(world: &BoardWorld) -> Result<(), eyre::Report> {
    match world.last_resync.as_ref() {
        Some(Err(BoardError::StoreUnavailable(_))) => Ok(()),
        Some(Ok(_)) => Err(eyre::eyre!("resync unexpectedly succeeded")),
        Some(Err(other)) => Err(eyre::eyre!("expected store unavailable, got {other}")),
        None => Err(eyre::eyre!("no resync was attempted")),
    }
}
