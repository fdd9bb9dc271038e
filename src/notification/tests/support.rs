//! Shared builders for notification unit tests.

use crate::board::domain::{
    DueDate, NewTask, PersonHandle, Project, ProjectId, Task, TaskPatch, TaskStatus,
};
use chrono::{DateTime, Local, NaiveDate, Utc};
use mockable::{Clock, DefaultClock};

/// Clock frozen at a fixed instant.
pub(super) struct FixedClock(pub(super) DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

pub(super) fn handle(value: &str) -> PersonHandle {
    PersonHandle::new(value, "assignee").expect("valid handle")
}

pub(super) fn project(manager: Option<&str>) -> Project {
    let base = Project::new(
        ProjectId::new("alpha").expect("valid project id"),
        "Alpha",
        &DefaultClock,
    )
    .expect("valid project");
    match manager {
        Some(name) => base.with_manager(handle(name)),
        None => base,
    }
}

pub(super) fn task(assignee: &str, status: TaskStatus, due: NaiveDate) -> Task {
    Task::new(
        NewTask {
            project_id: ProjectId::new("alpha").expect("valid project id"),
            title: "Write report".to_owned(),
            due_date: DueDate::from_date(due),
            assignee: handle(assignee),
            tags: String::new(),
            status,
        },
        &DefaultClock,
    )
    .expect("valid task")
}

pub(super) fn patched(task: &Task, patch: TaskPatch) -> Task {
    let mut updated = task.clone();
    updated.apply(patch, &DefaultClock).expect("patch applies");
    updated
}
