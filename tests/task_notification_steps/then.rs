//! Then steps for task notification BDD scenarios.

use super::world::{NotificationWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::then;
use taskboard::notification::{adapters::RecordedPost, services::NotificationReport};

fn last_report(world: &NotificationWorld) -> Result<&NotificationReport, eyre::Report> {
    if let Some(err) = &world.last_error {
        return Err(eyre::eyre!("scenario action failed: {err}"));
    }
    world
        .last_report
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing notification report in scenario world"))
}

fn nth_post(world: &NotificationWorld, index: usize) -> Result<RecordedPost, eyre::Report> {
    let posts = world
        .dispatcher
        .delivered()
        .wrap_err("read recorded posts")?;
    index
        .checked_sub(1)
        .and_then(|position| posts.get(position).cloned())
        .ok_or_else(|| eyre::eyre!("notification {index} was not delivered"))
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &NotificationWorld, status: String) -> Result<(), eyre::Report> {
    let task = world
        .current_task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing task in scenario world"))?;
    if task.status().as_str() != status {
        return Err(eyre::eyre!("expected status {status}, got {}", task.status()));
    }
    Ok(())
}

#[then(r#"the task is stored with status "{status}""#)]
fn task_is_stored_with_status(
    world: &NotificationWorld,
    status: String,
) -> Result<(), eyre::Report> {
    let task_id = world
        .current_task
        .as_ref()
        .map(|task| task.id())
        .ok_or_else(|| eyre::eyre!("missing task in scenario world"))?;
    let stored = run_async(world.lifecycle.find_by_id(task_id))
        .wrap_err("look up stored task")?
        .ok_or_else(|| eyre::eyre!("task {task_id} is not stored"))?;
    if stored.status().as_str() != status {
        return Err(eyre::eyre!("expected stored status {status}, got {}", stored.status()));
    }
    Ok(())
}

#[then("the number of delivered notifications is {count:usize}")]
fn delivered_count_is(world: &NotificationWorld, count: usize) -> Result<(), eyre::Report> {
    let actual = last_report(world)?.delivered_count();
    if actual != count {
        return Err(eyre::eyre!("expected {count} delivered notifications, got {actual}"));
    }
    Ok(())
}

#[then("the number of failed notifications is {count:usize}")]
fn failed_count_is(world: &NotificationWorld, count: usize) -> Result<(), eyre::Report> {
    let actual = last_report(world)?.failed_count();
    if actual != count {
        return Err(eyre::eyre!("expected {count} failed notifications, got {actual}"));
    }
    Ok(())
}

#[then("the number of skipped notifications is {count:usize}")]
fn skipped_count_is(world: &NotificationWorld, count: usize) -> Result<(), eyre::Report> {
    let actual = last_report(world)?.skipped_count();
    if actual != count {
        return Err(eyre::eyre!("expected {count} skipped notifications, got {actual}"));
    }
    Ok(())
}

#[then(r#"notification {index:usize} mentions "{mentions}""#)]
fn notification_mentions(
    world: &NotificationWorld,
    index: usize,
    mentions: String,
) -> Result<(), eyre::Report> {
    let post = nth_post(world, index)?;
    let first_line = post.text.lines().next().unwrap_or_default();
    if first_line != mentions {
        return Err(eyre::eyre!(
            "expected notification {index} to mention {mentions:?}, got {first_line:?}"
        ));
    }
    Ok(())
}

#[then(r#"notification {index:usize} contains "{fragment}""#)]
fn notification_contains(
    world: &NotificationWorld,
    index: usize,
    fragment: String,
) -> Result<(), eyre::Report> {
    let post = nth_post(world, index)?;
    if !post.text.contains(&fragment) {
        return Err(eyre::eyre!(
            "expected notification {index} to contain {fragment:?}, got {:?}",
            post.text
        ));
    }
    Ok(())
}

#[then("no status notification was produced")]
fn no_status_notification(world: &NotificationWorld) -> Result<(), eyre::Report> {
    let report = last_report(world)?;
    if report.intents().any(|intent| intent.event().is_status_event()) {
        return Err(eyre::eyre!("unexpected status notification in {report:?}"));
    }
    Ok(())
}
