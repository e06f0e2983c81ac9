//! Account deletion and comment authorship across users.

#[path = "support/app.rs"]
mod app;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test;
use app::{send, sign_up, spawn, start_of_test};
use serde_json::json;
use taskboard::test_support::MutableClock;

#[actix_web::test]
async fn deleting_an_account_unassigns_tasks_and_drops_comments() {
    let clock = Arc::new(MutableClock::new(start_of_test()));
    let (app, store) = spawn(clock).await;
    let (owner, _) = sign_up(&app, "owner@example.com", "Owner").await;
    let (leaver, leaver_id) = sign_up(&app, "leaver@example.com", "Leaver").await;

    let (_, task) = send(
        &app,
        Some(&owner),
        test::TestRequest::post().uri("/tasks").set_json(json!({
            "title": "Handover",
            "assigneeId": leaver_id,
        })),
    )
    .await;
    let task_id = task["id"].as_str().expect("id").to_owned();
    let (status, _) = send(
        &app,
        Some(&leaver),
        test::TestRequest::post().uri("/comments").set_json(json!({
            "taskId": task_id,
            "body": "I'm off next week",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, assigned) = send(
        &app,
        Some(&leaver),
        test::TestRequest::get().uri("/users/me/tasks"),
    )
    .await;
    assert_eq!(assigned.as_array().map(Vec::len), Some(1));

    let (status, _) = send(
        &app,
        Some(&leaver),
        test::TestRequest::delete().uri("/users/me"),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(store.comment_count(), 0);

    let (_, task) = send(
        &app,
        Some(&owner),
        test::TestRequest::get().uri(&format!("/tasks/{task_id}")),
    )
    .await;
    assert!(task["assigneeId"].is_null());

    let (status, _) = send(
        &app,
        Some(&owner),
        test::TestRequest::get().uri(&format!("/users/{leaver_id}")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn only_the_author_may_change_a_comment() {
    let clock = Arc::new(MutableClock::new(start_of_test()));
    let (app, _store) = spawn(clock).await;
    let (author, _) = sign_up(&app, "author@example.com", "Author").await;
    let (other, _) = sign_up(&app, "other@example.com", "Other").await;

    let (_, task) = send(
        &app,
        Some(&author),
        test::TestRequest::post()
            .uri("/tasks")
            .set_json(json!({ "title": "Discuss" })),
    )
    .await;
    let task_id = task["id"].as_str().expect("id").to_owned();
    let (_, comment) = send(
        &app,
        Some(&author),
        test::TestRequest::post()
            .uri(&format!("/comments/{task_id}"))
            .set_json(json!({ "body": "first draft" })),
    )
    .await;
    assert_eq!(comment["author"]["name"], "Author");
    let uri = format!("/comments/{}", comment["id"].as_str().expect("id"));

    let (status, _) = send(
        &app,
        Some(&other),
        test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({ "body": "hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, Some(&other), test::TestRequest::delete().uri(&uri)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, edited) = send(
        &app,
        Some(&author),
        test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({ "body": "final" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["body"], "final");

    let (_, listed) = send(
        &app,
        Some(&other),
        test::TestRequest::get().uri(&format!("/comments/task/{task_id}")),
    )
    .await;
    assert_eq!(listed[0]["body"], "final");
}

#[actix_web::test]
async fn users_are_listed_by_name() {
    let clock = Arc::new(MutableClock::new(start_of_test()));
    let (app, _store) = spawn(clock).await;
    sign_up(&app, "zoe@example.com", "Zoe").await;
    let (token, _) = sign_up(&app, "amy@example.com", "Amy").await;

    let (status, users) = send(&app, Some(&token), test::TestRequest::get().uri("/users")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(users[0]["name"], "Amy");
    assert_eq!(users[1]["name"], "Zoe");
}

#[actix_web::test]
async fn a_deleted_account_cannot_keep_commenting() {
    let clock = Arc::new(MutableClock::new(start_of_test()));
    let (app, store) = spawn(clock).await;
    let (owner, _) = sign_up(&app, "owner@example.com", "Owner").await;
    let (leaver, _) = sign_up(&app, "leaver@example.com", "Leaver").await;

    let (_, task) = send(
        &app,
        Some(&owner),
        test::TestRequest::post()
            .uri("/tasks")
            .set_json(json!({ "title": "Retro" })),
    )
    .await;
    let task_id = task["id"].as_str().expect("id").to_owned();

    let (status, _) = send(
        &app,
        Some(&leaver),
        test::TestRequest::delete().uri("/users/me"),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(
        &app,
        Some(&leaver),
        test::TestRequest::post()
            .uri(&format!("/comments/{task_id}"))
            .set_json(json!({ "body": "one last thing" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "account no longer exists");
    assert_eq!(store.comment_count(), 0);

    let (_, listed) = send(
        &app,
        Some(&owner),
        test::TestRequest::get().uri(&format!("/comments/task/{task_id}")),
    )
    .await;
    assert_eq!(listed, json!([]));
}
