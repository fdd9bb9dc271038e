//! Shared wiring for in-memory integration tests.
//!
//! Each board is assembled from a TOML snippet the same way the binary
//! assembles it from `taskboard.toml`, with the webhook dispatcher pointed at
//! a local mock server.

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use mockable::Clock;
use serde_json::Value;
use taskboard::board::{
    adapters::memory::{InMemoryProjectRepository, InMemoryTaskRepository},
    services::{CreateProjectRequest, ProjectService, TaskLifecycleService},
};
use taskboard::config::load_config_from_str;
use taskboard::notification::{adapters::WebhookDispatcher, services::DeadlineScanService};
use wiremock::MockServer;

/// Clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Lifecycle service wired to the webhook dispatcher.
pub type Lifecycle = TaskLifecycleService<
    InMemoryTaskRepository,
    InMemoryProjectRepository,
    WebhookDispatcher,
    FixedClock,
>;

/// Deadline sweep wired to the webhook dispatcher.
pub type Sweep = DeadlineScanService<
    InMemoryTaskRepository,
    InMemoryProjectRepository,
    WebhookDispatcher,
    FixedClock,
>;

/// Project service over the shared repositories.
pub type Projects = ProjectService<InMemoryProjectRepository, InMemoryTaskRepository, FixedClock>;

/// A fully wired board.
pub struct Board {
    pub lifecycle: Lifecycle,
    pub sweep: Sweep,
    pub projects: Projects,
}

/// Builds a board from `notification` TOML, substituting `{server}` with the
/// mock server's base URI.
///
/// # Panics
///
/// Panics when the configuration is invalid.
pub fn board(server: &MockServer, notification: &str, now: DateTime<Utc>) -> Board {
    let toml = notification.replace("{server}", &server.uri());
    let config = load_config_from_str(&toml).expect("test configuration is valid");
    let dispatcher = WebhookDispatcher::new(
        config
            .notification
            .dispatch_timeout()
            .expect("non-zero timeout"),
    )
    .expect("http client builds");
    let notifier = Arc::new(
        config
            .notification
            .orchestrator(Arc::new(dispatcher))
            .expect("channel table is valid"),
    );
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let project_repo = Arc::new(InMemoryProjectRepository::new());
    let clock = Arc::new(FixedClock(now));

    Board {
        lifecycle: TaskLifecycleService::new(
            Arc::clone(&tasks),
            Arc::clone(&project_repo),
            Arc::clone(&notifier),
            Arc::clone(&clock),
        )
        .with_default_status(config.board.default_status),
        sweep: DeadlineScanService::new(
            Arc::clone(&tasks),
            Arc::clone(&project_repo),
            notifier,
            Arc::clone(&clock),
        )
        .with_utc_offset(config.notification.utc_offset().expect("valid offset")),
        projects: ProjectService::new(project_repo, tasks, clock),
    }
}

/// Creates project `id` routed to `channel`, optionally managed.
///
/// # Panics
///
/// Panics when the project cannot be stored.
pub async fn seed_project(board: &Board, id: &str, manager: Option<&str>, channel: Option<&str>) {
    let mut request = CreateProjectRequest::new(id).with_id(id);
    if let Some(name) = manager {
        request = request.with_manager(name);
    }
    if let Some(key) = channel {
        request = request.with_channel_key(key);
    }
    board
        .projects
        .create_project(request)
        .await
        .expect("project created");
}

/// Returns the `text` of every webhook body received by `server`, in order.
///
/// # Panics
///
/// Panics when request recording is disabled or a body is not JSON.
pub async fn posted_texts(server: &MockServer) -> Vec<(String, String)> {
    server
        .received_requests()
        .await
        .expect("request recording enabled")
        .into_iter()
        .map(|request| {
            let body: Value = serde_json::from_slice(&request.body).expect("JSON body");
            let text = body
                .get("text")
                .and_then(Value::as_str)
                .expect("text field")
                .to_owned();
            (request.url.path().to_owned(), text)
        })
        .collect()
}
