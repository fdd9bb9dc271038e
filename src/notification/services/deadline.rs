//! Scheduled deadline sweep.
//!
//! Finds open tasks due today or exactly `reminder_days` ahead and notifies
//! their owners. The sweep is stateless: running it twice on the same day
//! notifies twice.

use super::{orchestrator::NotificationOrchestrator, report::NotificationReport};
use crate::board::{
    domain::{DueDate, ProjectId, Task},
    ports::{ProjectRepository, TaskRepository, TaskRepositoryError},
};
use crate::notification::ports::MessageDispatcher;
use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use mockable::Clock;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors raised by a deadline sweep.
#[derive(Debug, Error)]
pub enum DeadlineScanError {
    /// Loading due tasks failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
}

/// Deadline-proximity notification sweep.
#[derive(Clone)]
pub struct DeadlineScanService<R, P, D, C>
where
    R: TaskRepository,
    P: ProjectRepository,
    D: MessageDispatcher,
    C: Clock + Send + Sync,
{
    tasks: Arc<R>,
    projects: Arc<P>,
    notifier: Arc<NotificationOrchestrator<D>>,
    clock: Arc<C>,
    utc_offset: FixedOffset,
}

impl<R, P, D, C> DeadlineScanService<R, P, D, C>
where
    R: TaskRepository,
    P: ProjectRepository,
    D: MessageDispatcher,
    C: Clock + Send + Sync,
{
    /// Creates a sweep that takes "today" in UTC.
    #[must_use]
    pub fn new(
        tasks: Arc<R>,
        projects: Arc<P>,
        notifier: Arc<NotificationOrchestrator<D>>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            tasks,
            projects,
            notifier,
            clock,
            utc_offset: Utc.fix(),
        }
    }

    /// Sets the offset of the board's local calendar.
    #[must_use]
    pub const fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    /// Returns today's date on the board's calendar.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock
            .utc()
            .with_timezone(&self.utc_offset)
            .date_naive()
    }

    /// Runs the sweep for today.
    ///
    /// # Errors
    ///
    /// Returns [`DeadlineScanError`] when due tasks cannot be loaded. A
    /// project that cannot be loaded only loses its own reminders.
    pub async fn scan_today(&self) -> Result<NotificationReport, DeadlineScanError> {
        self.scan_on(self.today()).await
    }

    /// Runs the sweep as if `today` were the current date.
    ///
    /// # Errors
    ///
    /// Returns [`DeadlineScanError`] when due tasks cannot be loaded. A
    /// project that cannot be loaded only loses its own reminders.
    pub async fn scan_on(&self, today: NaiveDate) -> Result<NotificationReport, DeadlineScanError> {
        let evaluator = self.notifier.evaluator();
        let reminder = evaluator.deadline_policy().reminder_date(today);
        let mut dates = vec![DueDate::from_date(today)];
        if reminder != today {
            dates.push(DueDate::from_date(reminder));
        }

        let due = self.tasks.find_due_on(&dates).await?;
        let mut by_project: BTreeMap<ProjectId, Vec<Task>> = BTreeMap::new();
        for task in due {
            by_project
                .entry(task.project_id().clone())
                .or_default()
                .push(task);
        }

        let mut report = NotificationReport::new();
        for (project_id, tasks) in by_project {
            let project = match self.projects.find_by_id(&project_id).await {
                Ok(Some(project)) => project,
                Ok(None) => {
                    warn!(
                        project_id = %project_id,
                        tasks = tasks.len(),
                        "due tasks reference a missing project"
                    );
                    continue;
                }
                Err(err) => {
                    warn!(
                        project_id = %project_id,
                        tasks = tasks.len(),
                        error = %err,
                        "project lookup failed, skipping its reminders"
                    );
                    continue;
                }
            };
            let intents = tasks
                .iter()
                .filter_map(|task| evaluator.evaluate_deadline(task, &project, today))
                .collect();
            report.merge(self.notifier.deliver(&project, intents).await);
        }

        info!(
            today = %today,
            reminder = %reminder,
            intents = report.len(),
            delivered = report.delivered_count(),
            skipped = report.skipped_count(),
            failed = report.failed_count(),
            "deadline sweep finished"
        );
        Ok(report)
    }
}
