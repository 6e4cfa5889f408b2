//! End-to-end board flows over the in-process gateway.
//!
//! Exercises the full application surface: sign-in, task creation,
//! optimistic drag-and-drop with confirmation and rollback, filtering,
//! the detail overlay, and forced logout on a rejected credential.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use chrono::{TimeZone, Utc};

use taskdeck::app::{App, AppError, MoveOutcome};
use taskdeck::gateway::mock::MockGateway;
use taskdeck::gateway::ApiError;
use taskdeck_proto::auth::Credentials;
use taskdeck_proto::filter::TaskFilter;
use taskdeck_proto::task::{Priority, Status, TaskDraft};

fn creds() -> Credentials {
    Credentials {
        email: "alice@example.com".to_string(),
        password: "hunter2".to_string(),
    }
}

fn due() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 1, 12, 0, 0).single().unwrap()
}

async fn signed_in_app() -> App<MockGateway> {
    let mut app = App::new(MockGateway::new());
    app.log_in(&creds()).await.expect("login should succeed");
    app
}

#[tokio::test]
async fn login_loads_board_and_users() {
    let app = signed_in_app().await;
    assert!(app.session().is_authenticated());
    assert_eq!(
        app.session().identity().map(|i| i.email.as_str()),
        Some("alice@example.com")
    );
    // The signed-in account shows up via the user listing.
    assert_eq!(app.board().users().len(), 1);
}

#[tokio::test]
async fn created_task_lands_in_the_backlog_column() {
    let mut app = signed_in_app().await;
    let draft = TaskDraft::new("Ship v1", "Cut the release", Priority::High, None, due());
    let task = app.create_task(&draft).await.unwrap();

    let columns = app.board().group_by_status();
    let backlog = &columns[&Status::Backlog];
    assert_eq!(backlog.len(), 1);
    assert_eq!(backlog[0].id, task.id);
    assert_eq!(backlog[0].title, "Ship v1");
    assert_eq!(backlog[0].priority, Priority::High);
    assert_eq!(backlog[0].due_date, due());
    // Every column renders, populated or not.
    assert_eq!(columns.len(), Status::ALL.len());
}

#[tokio::test]
async fn create_rejects_unknown_assignee_before_any_remote_call() {
    let mut app = signed_in_app().await;
    let draft = TaskDraft::new(
        "Ship v1",
        "Cut the release",
        Priority::High,
        Some("u-ghost".to_string()),
        due(),
    );
    let err = app.create_task(&draft).await.unwrap_err();
    assert!(matches!(err, AppError::Api(ApiError::Validation(_))));
    assert!(app.board().tasks().is_empty());
    assert!(app.gateway().tasks().is_empty());
}

#[tokio::test]
async fn confirmed_move_adopts_the_server_record() {
    let mut app = signed_in_app().await;
    let draft = TaskDraft::new("Ship v1", "Cut the release", Priority::High, None, due());
    let task = app.create_task(&draft).await.unwrap();
    assert_eq!(task.badge, "v1");

    let outcome = app.move_task(&task.id, Status::InProgress).await.unwrap();
    assert_eq!(outcome, MoveOutcome::Confirmed);

    let moved = app.board().get(&task.id).unwrap();
    assert_eq!(moved.status, Status::InProgress);
    // The server recomputed the badge; the whole record was adopted.
    assert_eq!(moved.badge, "v2");
}

#[tokio::test]
async fn rejected_move_rolls_back_the_optimistic_status() {
    let mut app = signed_in_app().await;
    let draft = TaskDraft::new("Ship v1", "Cut the release", Priority::High, None, due());
    let task = app.create_task(&draft).await.unwrap();

    app.gateway()
        .fail_next_update_status(ApiError::Conflict("task was deleted".to_string()));
    let err = app.move_task(&task.id, Status::Done).await.unwrap_err();
    assert!(matches!(err, AppError::Api(ApiError::Conflict(_))));

    // Back where it started, not stuck at the optimistic target.
    assert_eq!(app.board().get(&task.id).unwrap().status, Status::Backlog);
}

#[tokio::test]
async fn moving_to_the_current_status_issues_no_remote_call() {
    let mut app = signed_in_app().await;
    let draft = TaskDraft::new("Ship v1", "Cut the release", Priority::High, None, due());
    let task = app.create_task(&draft).await.unwrap();

    let outcome = app.move_task(&task.id, Status::Backlog).await.unwrap();
    assert_eq!(outcome, MoveOutcome::Unchanged);
    assert_eq!(app.gateway().update_status_calls(), 0);
}

#[tokio::test]
async fn moving_an_unknown_task_issues_no_remote_call() {
    let mut app = signed_in_app().await;
    let outcome = app.move_task("t-ghost", Status::Done).await.unwrap();
    assert_eq!(outcome, MoveOutcome::Unchanged);
    assert_eq!(app.gateway().update_status_calls(), 0);
}

#[tokio::test]
async fn changing_the_filter_refetches_the_listing() {
    let mut app = signed_in_app().await;
    let low = TaskDraft::new("chores", "sweep", Priority::Low, None, due());
    let high = TaskDraft::new("Ship v1", "Cut the release", Priority::High, None, due());
    app.create_task(&low).await.unwrap();
    app.create_task(&high).await.unwrap();

    app.set_filter(TaskFilter::new().with_priority(Priority::High))
        .await
        .unwrap();
    let tasks = app.board().tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Ship v1");

    app.set_filter(TaskFilter::new()).await.unwrap();
    assert_eq!(app.board().tasks().len(), 2);
}

#[tokio::test]
async fn failed_refetch_keeps_the_previous_listing() {
    let mut app = signed_in_app().await;
    let draft = TaskDraft::new("Ship v1", "Cut the release", Priority::High, None, due());
    app.create_task(&draft).await.unwrap();
    app.refresh().await.unwrap();

    app.gateway()
        .fail_next_list_tasks(ApiError::Network("socket hangup".to_string()));
    assert!(app.refresh().await.is_err());
    assert_eq!(app.board().tasks().len(), 1);
}

#[tokio::test]
async fn open_task_populates_overlay_and_comments_flow_through_it() {
    let mut app = signed_in_app().await;
    let draft = TaskDraft::new("Ship v1", "Cut the release", Priority::High, None, due());
    let task = app.create_task(&draft).await.unwrap();

    app.open_task(&task.id).await.unwrap();
    assert_eq!(app.overlay().open_task().map(|t| t.id.as_str()), Some(task.id.as_str()));
    assert!(app.overlay().comments().is_empty());

    let comment = app.add_comment("  looks good  ").await.unwrap();
    assert_eq!(comment.body, "looks good");
    assert_eq!(comment.author.email, "alice@example.com");
    assert_eq!(app.overlay().comments().len(), 1);

    app.close_task();
    assert!(!app.overlay().is_open());
    let err = app.add_comment("too late").await.unwrap_err();
    assert!(matches!(err, AppError::Api(ApiError::Validation(_))));
}

#[tokio::test]
async fn open_task_failure_leaves_overlay_closed() {
    let mut app = signed_in_app().await;
    let draft = TaskDraft::new("Ship v1", "Cut the release", Priority::High, None, due());
    let task = app.create_task(&draft).await.unwrap();

    app.gateway()
        .fail_next_list_comments(ApiError::Network("socket hangup".to_string()));
    assert!(app.open_task(&task.id).await.is_err());
    assert!(!app.overlay().is_open());
}

#[tokio::test]
async fn rejected_credential_forces_logout_and_clears_everything() {
    let mut app = signed_in_app().await;
    let draft = TaskDraft::new("Ship v1", "Cut the release", Priority::High, None, due());
    app.create_task(&draft).await.unwrap();
    app.set_filter(TaskFilter::new().with_priority(Priority::High))
        .await
        .unwrap();

    app.gateway().fail_next_list_tasks(ApiError::Auth);
    let err = app.refresh().await.unwrap_err();
    assert!(matches!(err, AppError::Api(ApiError::Auth)));

    assert!(!app.session().is_authenticated());
    assert!(app.board().tasks().is_empty());
    assert!(app.board().users().is_empty());
    assert!(!app.overlay().is_open());
    assert!(app.filter().is_empty());
}

#[tokio::test]
async fn explicit_logout_clears_cached_state() {
    let mut app = signed_in_app().await;
    let draft = TaskDraft::new("Ship v1", "Cut the release", Priority::High, None, due());
    app.create_task(&draft).await.unwrap();

    app.log_out();
    assert!(!app.session().is_authenticated());
    assert!(app.board().tasks().is_empty());

    // Signing back in reloads the board from the server.
    app.log_in(&creds()).await.unwrap();
    assert_eq!(app.board().tasks().len(), 1);
}

#[tokio::test]
async fn sign_up_then_duplicate_sign_up_fails() {
    let mut app = App::new(MockGateway::new());
    app.sign_up(&creds()).await.unwrap();
    assert!(app.session().is_authenticated());

    let mut second = App::new(MockGateway::new());
    second.sign_up(&creds()).await.unwrap();
    let err = second.sign_up(&creds()).await.unwrap_err();
    assert!(matches!(err, AppError::Api(ApiError::Validation(_))));
}

#[tokio::test]
async fn user_listing_failure_is_tolerated_at_login() {
    let gateway = MockGateway::new();
    gateway.fail_next_list_users(ApiError::Network("socket hangup".to_string()));
    let mut app = App::new(gateway);

    // Login still succeeds; the user set just stays empty for now.
    app.log_in(&creds()).await.unwrap();
    assert!(app.session().is_authenticated());
    assert!(app.board().users().is_empty());

    app.load_users().await;
    assert_eq!(app.board().users().len(), 1);
}
