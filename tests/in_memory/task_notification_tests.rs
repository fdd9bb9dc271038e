//! Task mutations delivered to a chat webhook.

use super::helpers::{board, posted_texts, seed_project};
use chrono::{DateTime, Utc};
use rstest::{fixture, rstest};
use taskboard::board::{
    domain::TaskStatus,
    services::{CreateTaskRequest, UpdateTaskRequest},
};
use taskboard::notification::{
    domain::NotificationEvent,
    ports::DispatchError,
    services::{DeliveryFailure, DeliveryOutcome},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

const CHANNELS: &str = r#"
[board]
default_status = "IN_PROGRESS"

[notification]
default_channel = "general"
project_base_url = "https://board.example.com/projects/"

[notification.channels]
general = "{server}/hooks/general"
team_alpha = "{server}/hooks/alpha"
"#;

#[fixture]
fn now() -> DateTime<Utc> {
    "2025-04-28T09:00:00Z".parse().expect("valid timestamp")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_task_is_posted_to_project_channel(now: DateTime<Utc>) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hooks/alpha"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let board = board(&server, CHANNELS, now);
    seed_project(&board, "alpha", Some("suzuki"), Some("team_alpha")).await;

    let outcome = board
        .lifecycle
        .create_task(
            CreateTaskRequest::new("alpha", "Write report", "2025-05-01", "tanaka")
                .with_tags("q2"),
        )
        .await
        .expect("task created");

    assert_eq!(outcome.task.status(), TaskStatus::InProgress);
    assert_eq!(outcome.notifications.delivered_count(), 1);
    let posts = posted_texts(&server).await;
    assert_eq!(
        posts,
        vec![(
            "/hooks/alpha".to_owned(),
            concat!(
                "@tanaka\n",
                "Task \"Write report\" is now In Progress.\n",
                "• Due: 2025-05-01\n",
                "• Tags: q2\n",
                "🔗 https://board.example.com/projects/alpha",
            )
            .to_owned()
        )]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_channel_key_falls_back_to_default(now: DateTime<Utc>) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hooks/general"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let board = board(&server, CHANNELS, now);
    seed_project(&board, "beta", None, Some("team_beta")).await;

    let outcome = board
        .lifecycle
        .create_task(CreateTaskRequest::new("beta", "Plan", "2025-05-02", "kato"))
        .await
        .expect("task created");

    assert_eq!(outcome.notifications.delivered_count(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completion_mentions_assignee_and_manager_once(now: DateTime<Utc>) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let board = board(&server, CHANNELS, now);
    seed_project(&board, "alpha", Some("suzuki"), Some("team_alpha")).await;
    let created = board
        .lifecycle
        .create_task(
            CreateTaskRequest::new("alpha", "Write report", "2025-05-01", "sato")
                .with_status("REVIEW"),
        )
        .await
        .expect("task created");

    let completed = board
        .lifecycle
        .update_task(UpdateTaskRequest::new(created.task.id()).with_status("DONE"))
        .await
        .expect("task completed");

    let events: Vec<&NotificationEvent> = completed
        .notifications
        .intents()
        .map(|intent| intent.event())
        .collect();
    assert_eq!(events, vec![&NotificationEvent::Completed]);
    let posts = posted_texts(&server).await;
    let last = posts.last().expect("completion posted");
    assert!(last.1.starts_with("@sato @suzuki\n🎉 Task \"Write report\" is done."));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_webhook_is_reported_and_update_commits(now: DateTime<Utc>) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;
    let board = board(&server, CHANNELS, now);
    seed_project(&board, "alpha", None, Some("team_alpha")).await;
    let created = board
        .lifecycle
        .create_task(CreateTaskRequest::new("alpha", "Write report", "2025-05-01", "sato"))
        .await
        .expect("creation commits despite rejection");

    let updated = board
        .lifecycle
        .update_task(UpdateTaskRequest::new(created.task.id()).with_status("REVIEW"))
        .await
        .expect("update commits despite rejection");

    let outcomes: Vec<&DeliveryOutcome> = updated
        .notifications
        .deliveries()
        .iter()
        .map(|delivery| &delivery.outcome)
        .collect();
    assert!(matches!(
        outcomes.as_slice(),
        [DeliveryOutcome::Failed(DeliveryFailure::Dispatch(
            DispatchError::Rejected { status: 503, .. }
        ))]
    ));
    let stored = board
        .lifecycle
        .find_by_id(created.task.id())
        .await
        .expect("lookup succeeds")
        .expect("task stored");
    assert_eq!(stored.status(), TaskStatus::Review);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deletion_posts_last_known_state(now: DateTime<Utc>) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let board = board(&server, CHANNELS, now);
    seed_project(&board, "alpha", None, Some("team_alpha")).await;
    let created = board
        .lifecycle
        .create_task(
            CreateTaskRequest::new("alpha", "Write report", "2025-05-01", "yamada")
                .with_status("ON_HOLD"),
        )
        .await
        .expect("task created");

    board
        .lifecycle
        .delete_task(created.task.id())
        .await
        .expect("task deleted");

    let posts = posted_texts(&server).await;
    let (_, text) = posts.last().expect("deletion posted");
    assert!(text.starts_with("@yamada\nTask \"Write report\" was deleted."));
    assert!(text.contains("• Status: On Hold"));
    assert!(text.contains("• Tags: (none)"));
}
