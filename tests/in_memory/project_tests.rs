//! Channel routing and board export.

use super::helpers::{board, seed_project};
use chrono::{DateTime, Utc};
use rstest::{fixture, rstest};
use taskboard::board::{
    domain::ProjectId,
    services::{CreateTaskRequest, ProjectServiceError, UpdateTaskRequest},
};
use taskboard::notification::services::{DeliveryOutcome, SkipReason};
use wiremock::{Mock, MockServer, ResponseTemplate, matchers::method};

const NO_DEFAULT: &str = r#"
[notification.channels]
team_alpha = "{server}/hooks/alpha"
"#;

#[fixture]
fn now() -> DateTime<Utc> {
    "2025-04-28T09:00:00Z".parse().expect("valid timestamp")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn project_without_resolvable_channel_is_skipped(now: DateTime<Utc>) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let board = board(&server, NO_DEFAULT, now);
    seed_project(&board, "beta", Some("suzuki"), Some("team_beta")).await;

    let outcome = board
        .lifecycle
        .create_task(CreateTaskRequest::new("beta", "Plan", "2025-05-02", "kato"))
        .await
        .expect("task created without a channel");

    let outcomes: Vec<&DeliveryOutcome> = outcome
        .notifications
        .deliveries()
        .iter()
        .map(|delivery| &delivery.outcome)
        .collect();
    assert!(matches!(
        outcomes.as_slice(),
        [DeliveryOutcome::Skipped(SkipReason::NoChannel)]
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn manager_assigned_later_is_mentioned(now: DateTime<Utc>) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let board = board(&server, NO_DEFAULT, now);
    seed_project(&board, "alpha", None, Some("team_alpha")).await;
    let project_id = ProjectId::new("alpha").expect("valid id");
    let created = board
        .lifecycle
        .create_task(
            CreateTaskRequest::new("alpha", "Write report", "2025-05-01", "sato")
                .with_status("REVIEW"),
        )
        .await
        .expect("task created");

    board
        .projects
        .assign_manager(&project_id, "suzuki")
        .await
        .expect("manager assigned");
    let completed = board
        .lifecycle
        .update_task(UpdateTaskRequest::new(created.task.id()).with_status("DONE"))
        .await
        .expect("task completed");

    assert!(created.notifications.is_empty());
    let mentioned: Vec<String> = completed
        .notifications
        .intents()
        .flat_map(|intent| intent.audience().recipients().iter().map(ToString::to_string))
        .collect();
    assert_eq!(mentioned, vec!["sato".to_owned(), "suzuki".to_owned()]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assigning_manager_to_missing_project_fails(now: DateTime<Utc>) {
    let server = MockServer::start().await;
    let board = board(&server, NO_DEFAULT, now);
    let missing = ProjectId::new("ghost").expect("valid id");

    let result = board.projects.assign_manager(&missing, "suzuki").await;

    assert!(matches!(result, Err(ProjectServiceError::NotFound(id)) if id == missing));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn export_lists_projects_with_tasks_by_due_date(now: DateTime<Utc>) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let board = board(&server, NO_DEFAULT, now);
    seed_project(&board, "alpha", Some("suzuki"), Some("team_alpha")).await;
    seed_project(&board, "beta", None, None).await;
    for (title, due) in [("Later", "2025-06-01"), ("Sooner", "2025-05-01")] {
        board
            .lifecycle
            .create_task(CreateTaskRequest::new("alpha", title, due, "tanaka"))
            .await
            .expect("task created");
    }

    let export = board.projects.export_board().await.expect("export succeeds");
    let json = serde_json::to_value(&export).expect("export serialises");

    assert_eq!(json[0]["id"], "alpha");
    assert_eq!(json[0]["channelKey"], "team_alpha");
    assert_eq!(json[0]["tasks"][0]["title"], "Sooner");
    assert_eq!(json[0]["tasks"][0]["dueDate"], "2025-05-01");
    assert_eq!(json[0]["tasks"][1]["title"], "Later");
    assert_eq!(json[1]["id"], "beta");
    assert_eq!(json[1]["tasks"], serde_json::json!([]));
}
