//! The daily deadline sweep against a chat webhook.

use super::helpers::{Board, board, posted_texts, seed_project};
use chrono::{DateTime, NaiveDate, Utc};
use rstest::rstest;
use taskboard::board::services::CreateTaskRequest;
use wiremock::{Mock, MockServer, ResponseTemplate, matchers::method};

const TOKYO: &str = r#"
[board]
default_status = "BACKLOG"

[notification]
utc_offset_minutes = 540
reminder_days = 3

[notification.channels]
team_alpha = "{server}/hooks/alpha"
"#;

async fn seed_tasks(board: &Board) {
    seed_project(board, "alpha", Some("suzuki"), Some("team_alpha")).await;
    for (title, due, assignee, status) in [
        ("Draft slides", "2025-05-04", "tanaka", "IN_PROGRESS"),
        ("Ship release", "2025-05-01", "sato", "REVIEW"),
        ("Archive notes", "2025-05-01", "kato", "DONE"),
        ("Book venue", "2025-05-02", "ito", "BACKLOG"),
    ] {
        board
            .lifecycle
            .create_task(
                CreateTaskRequest::new("alpha", title, due, assignee).with_status(status),
            )
            .await
            .expect("task created");
    }
}

async fn accepting_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    server
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sweep_uses_the_board_calendar_for_today() {
    let server = accepting_server().await;
    let evening_utc: DateTime<Utc> = "2025-04-30T20:00:00Z".parse().expect("valid timestamp");
    let board = board(&server, TOKYO, evening_utc);

    assert_eq!(
        board.sweep.today(),
        NaiveDate::from_ymd_opt(2025, 5, 1).expect("valid date")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sweep_alerts_due_today_and_reminds_ahead() {
    let server = accepting_server().await;
    let evening_utc: DateTime<Utc> = "2025-04-30T20:00:00Z".parse().expect("valid timestamp");
    let board = board(&server, TOKYO, evening_utc);
    seed_tasks(&board).await;
    let posted_during_setup = posted_texts(&server).await.len();

    let report = board.sweep.scan_today().await.expect("sweep succeeds");

    assert_eq!(report.delivered_count(), 2);
    let posts = posted_texts(&server).await;
    let sweep_posts: Vec<&str> = posts
        .iter()
        .skip(posted_during_setup)
        .map(|(_, text)| text.as_str())
        .collect();
    assert_eq!(
        sweep_posts,
        vec![
            "@sato @suzuki\nTask \"Ship release\" is due today (2025-05-01).",
            "@tanaka\nTask \"Draft slides\" is due in 3 days (2025-05-04).",
        ]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sweep_is_stateless_across_runs() {
    let server = accepting_server().await;
    let now: DateTime<Utc> = "2025-05-01T03:00:00Z".parse().expect("valid timestamp");
    let board = board(&server, TOKYO, now);
    seed_tasks(&board).await;

    let first = board.sweep.scan_today().await.expect("first sweep succeeds");
    let second = board.sweep.scan_today().await.expect("second sweep succeeds");

    assert_eq!(first.delivered_count(), 2);
    assert_eq!(second.delivered_count(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sweep_on_a_quiet_day_posts_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let now: DateTime<Utc> = "2025-05-01T03:00:00Z".parse().expect("valid timestamp");
    let board = board(&server, TOKYO, now);

    let report = board
        .sweep
        .scan_on(NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date"))
        .await
        .expect("sweep succeeds");

    assert!(report.is_empty());
}
