//! When steps for task notification BDD scenarios.

use super::world::{NotificationWorld, run_async};
use chrono::NaiveDate;
use eyre::WrapErr;
use rstest_bdd_macros::when;
use taskboard::board::{
    domain::TaskId,
    services::{CreateTaskRequest, MutationOutcome, TaskLifecycleResult, UpdateTaskRequest},
};

fn current_task_id(world: &NotificationWorld) -> Result<TaskId, eyre::Report> {
    world
        .current_task
        .as_ref()
        .map(|task| task.id())
        .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
}

fn record(world: &mut NotificationWorld, result: TaskLifecycleResult<MutationOutcome>) {
    match result {
        Ok(outcome) => {
            world.current_task = Some(outcome.task);
            world.last_report = Some(outcome.notifications);
        }
        Err(err) => world.last_error = Some(err),
    }
}

#[when(r#"a task "{title}" due "{due}" is created for "{assignee}""#)]
fn task_is_created(
    world: &mut NotificationWorld,
    title: String,
    due: String,
    assignee: String,
) -> Result<(), eyre::Report> {
    let project_id = world
        .current_project
        .clone()
        .ok_or_else(|| eyre::eyre!("missing project in scenario world"))?;
    let request = CreateTaskRequest::new(project_id.as_str(), title, due, assignee);
    let result = run_async(world.lifecycle.create_task(request));
    record(world, result);
    Ok(())
}

#[when(r#"the task status is changed to "{status}""#)]
fn task_status_is_changed(
    world: &mut NotificationWorld,
    status: String,
) -> Result<(), eyre::Report> {
    let request = UpdateTaskRequest::new(current_task_id(world)?).with_status(status);
    let result = run_async(world.lifecycle.update_task(request));
    record(world, result);
    Ok(())
}

#[when(r#"the task due date is changed to "{due}""#)]
fn task_due_date_is_changed(
    world: &mut NotificationWorld,
    due: String,
) -> Result<(), eyre::Report> {
    let request = UpdateTaskRequest::new(current_task_id(world)?).with_due_date(due);
    let result = run_async(world.lifecycle.update_task(request));
    record(world, result);
    Ok(())
}

#[when("the task is deleted")]
fn task_is_deleted(world: &mut NotificationWorld) -> Result<(), eyre::Report> {
    let task_id = current_task_id(world)?;
    let result = run_async(world.lifecycle.delete_task(task_id));
    record(world, result);
    Ok(())
}

#[when(r#"the deadline sweep runs on "{date}""#)]
fn deadline_sweep_runs(world: &mut NotificationWorld, date: String) -> Result<(), eyre::Report> {
    let today = NaiveDate::parse_from_str(&date, "%Y-%m-%d").wrap_err("parse sweep date")?;
    let report = run_async(world.sweep.scan_on(today)).wrap_err("run deadline sweep")?;
    world.last_report = Some(report);
    Ok(())
}
