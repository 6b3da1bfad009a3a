//! Recipient notification endpoints and the live deltas they push.

use http::StatusCode;
use serde_json::json;

use crate::helpers::{TestApp, drain};

#[tokio::test]
async fn test_create_pushes_notification_then_count() {
    let app = TestApp::new();
    let user = app.seed_user("live@example.com", 0).await;
    let mut rx = app.connect(&user);

    app.notify(&user, "hello").await;

    let frames = drain(&mut rx);
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0]["type"], "notification");
    assert_eq!(frames[0]["notification"]["title"], "hello");
    assert_eq!(frames[1]["type"], "unread_count");
    assert_eq!(frames[1]["count"], 1);
}

#[tokio::test]
async fn test_mark_read_is_idempotent_and_scoped() {
    let app = TestApp::new();
    let owner = app.seed_user("owner@example.com", 0).await;
    let other = app.seed_user("other@example.com", 0).await;
    let note = app.notify(&owner, "mine").await;
    let id = note["id"].as_str().unwrap();
    let path = format!("/api/notifications/{id}/read");

    let foreign = app
        .request("PUT", &path, None, Some(&app.token_for(&other)))
        .await;
    assert_eq!(foreign.status, StatusCode::NOT_FOUND);

    let token = app.token_for(&owner);
    let mut rx = app.connect(&owner);

    let first = app.request("PUT", &path, None, Some(&token)).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["data"]["changed"], 1);
    assert_eq!(first.body["data"]["unread_count"], 0);

    let again = app.request("PUT", &path, None, Some(&token)).await;
    assert_eq!(again.status, StatusCode::OK);
    assert_eq!(again.body["data"]["changed"], 0);

    // Only the mutation that changed something pushes a count.
    let frames = drain(&mut rx);
    assert_eq!(frames, vec![json!({ "type": "unread_count", "count": 0 })]);
}

#[tokio::test]
async fn test_bulk_read_and_unread_filter() {
    let app = TestApp::new();
    let user = app.seed_user("bulk@example.com", 0).await;
    let token = app.token_for(&user);
    let a = app.notify(&user, "a").await;
    let b = app.notify(&user, "b").await;
    app.notify(&user, "c").await;

    let marked = app
        .request(
            "PUT",
            "/api/notifications/read",
            Some(json!({ "ids": [a["id"], b["id"], uuid::Uuid::new_v4()] })),
            Some(&token),
        )
        .await;
    assert_eq!(marked.status, StatusCode::OK);
    assert_eq!(marked.body["data"]["changed"], 2);

    let unread = app
        .request(
            "GET",
            "/api/notifications?unread_only=true",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(unread.body["data"]["total_items"], 1);
    assert_eq!(unread.body["data"]["items"][0]["title"], "c");

    let all = app
        .request("PUT", "/api/notifications/read-all", None, Some(&token))
        .await;
    assert_eq!(all.body["data"]["changed"], 1);

    let count = app
        .request("GET", "/api/notifications/unread-count", None, Some(&token))
        .await;
    assert_eq!(count.body["data"]["count"], 0);
}

#[tokio::test]
async fn test_pagination_newest_first() {
    let app = TestApp::new();
    let user = app.seed_user("pages@example.com", 0).await;
    let token = app.token_for(&user);
    for i in 0..5 {
        app.notify(&user, &format!("n{i}")).await;
    }

    let page = app
        .request(
            "GET",
            "/api/notifications?page=2&per_page=2",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.body["data"]["total_items"], 5);
    assert_eq!(page.body["data"]["total_pages"], 3);
    assert_eq!(page.body["data"]["items"][0]["title"], "n2");
    assert_eq!(page.body["data"]["unread_count"], 5);
}

#[tokio::test]
async fn test_page_far_past_the_end_is_empty() {
    let app = TestApp::new();
    let user = app.seed_user("far@example.com", 0).await;
    let token = app.token_for(&user);
    app.notify(&user, "only").await;

    let page = app
        .request(
            "GET",
            "/api/notifications?page=18446744073709551615",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.body["data"]["total_items"], 1);
    assert_eq!(page.body["data"]["items"].as_array().unwrap().len(), 0);
    assert_eq!(page.body["data"]["has_next"], false);
}

#[tokio::test]
async fn test_delete_one_and_all() {
    let app = TestApp::new();
    let user = app.seed_user("tidy@example.com", 0).await;
    let token = app.token_for(&user);
    let first = app.notify(&user, "first").await;
    app.notify(&user, "second").await;
    let path = format!("/api/notifications/{}", first["id"].as_str().unwrap());

    let deleted = app.request("DELETE", &path, None, Some(&token)).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["data"]["unread_count"], 1);

    let missing = app.request("DELETE", &path, None, Some(&token)).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["error"], "NOT_FOUND");

    let cleared = app
        .request("DELETE", "/api/notifications", None, Some(&token))
        .await;
    assert_eq!(cleared.body["data"]["changed"], 1);
    assert!(app.notifications.is_empty());
}
