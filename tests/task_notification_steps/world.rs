//! Shared world state for task notification BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskboard::board::{
    adapters::memory::{InMemoryProjectRepository, InMemoryTaskRepository},
    domain::{ProjectId, Task},
    services::{ProjectService, TaskLifecycleError, TaskLifecycleService},
};
use taskboard::notification::{
    adapters::RecordingDispatcher,
    domain::{ChannelDirectory, ChannelResolver, MessageRenderer, TransitionEvaluator},
    services::{DeadlineScanService, NotificationOrchestrator, NotificationReport},
};

/// Lifecycle service type used by the BDD world.
pub type TestLifecycle = TaskLifecycleService<
    InMemoryTaskRepository,
    InMemoryProjectRepository,
    RecordingDispatcher,
    DefaultClock,
>;

/// Deadline sweep type used by the BDD world.
pub type TestSweep = DeadlineScanService<
    InMemoryTaskRepository,
    InMemoryProjectRepository,
    RecordingDispatcher,
    DefaultClock,
>;

/// Project service type used by the BDD world.
pub type TestProjects =
    ProjectService<InMemoryProjectRepository, InMemoryTaskRepository, DefaultClock>;

/// Channel key configured for every scenario.
pub const TEAM_CHANNEL: &str = "team_alpha";

/// Scenario world for task notification behaviour tests.
pub struct NotificationWorld {
    pub tasks: Arc<InMemoryTaskRepository>,
    pub dispatcher: Arc<RecordingDispatcher>,
    pub lifecycle: TestLifecycle,
    pub projects: TestProjects,
    pub sweep: TestSweep,
    pub current_project: Option<ProjectId>,
    pub current_task: Option<Task>,
    pub last_report: Option<NotificationReport>,
    pub last_error: Option<TaskLifecycleError>,
}

impl NotificationWorld {
    /// Creates a world with one configured channel and no default.
    ///
    /// # Panics
    ///
    /// Panics when the fixed channel table is rejected.
    #[must_use]
    pub fn new() -> Self {
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let project_repo = Arc::new(InMemoryProjectRepository::new());
        let dispatcher = Arc::new(RecordingDispatcher::new());
        let directory = ChannelDirectory::from_raw(
            [(TEAM_CHANNEL, "https://chat.example.com/hooks/team-alpha")],
            None,
        )
        .expect("scenario channel table is valid");
        let notifier = Arc::new(NotificationOrchestrator::new(
            TransitionEvaluator::default(),
            ChannelResolver::new(directory),
            MessageRenderer::default(),
            Arc::clone(&dispatcher),
        ));
        let clock = Arc::new(DefaultClock);

        Self {
            lifecycle: TaskLifecycleService::new(
                Arc::clone(&tasks),
                Arc::clone(&project_repo),
                Arc::clone(&notifier),
                Arc::clone(&clock),
            ),
            projects: ProjectService::new(
                Arc::clone(&project_repo),
                Arc::clone(&tasks),
                Arc::clone(&clock),
            ),
            sweep: DeadlineScanService::new(Arc::clone(&tasks), project_repo, notifier, clock),
            tasks,
            dispatcher,
            current_project: None,
            current_task: None,
            last_report: None,
            last_error: None,
        }
    }
}

impl Default for NotificationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> NotificationWorld {
    NotificationWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
