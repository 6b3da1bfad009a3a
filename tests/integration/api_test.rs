//! HTTP surface: authentication, authorization, error bodies, health.

use http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["ws_connections"], 0);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/notifications", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
    assert_eq!(response.body["message"], "Missing Authorization header");
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let app = TestApp::new();

    let response = app
        .request("GET", "/api/notifications", None, Some("not-a-jwt"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_lifecycle_endpoints_require_operator() {
    let app = TestApp::new();
    let user = app.seed_user("plain@example.com", 0).await;
    let token = app.token_for(&user);

    let run = app
        .request("POST", "/api/admin/lifecycle/run", None, Some(&token))
        .await;
    assert_eq!(run.status, StatusCode::FORBIDDEN);
    assert_eq!(run.body["error"], "FORBIDDEN");

    let stats = app
        .request("GET", "/api/admin/lifecycle/stats", None, Some(&token))
        .await;
    assert_eq!(stats.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_manual_trigger_and_stats() {
    let app = TestApp::new();
    let admin = app.seed_admin("ops@example.com").await;
    app.seed_user("idle@example.com", 18).await;
    app.seed_user("fresh@example.com", 2).await;
    let token = app.token_for(&admin);

    let stats = app
        .request("GET", "/api/admin/lifecycle/stats", None, Some(&token))
        .await;
    assert_eq!(stats.status, StatusCode::OK);
    assert_eq!(stats.body["data"]["inactive_15_to_24_days"], 1);

    let run = app
        .request("POST", "/api/admin/lifecycle/run", None, Some(&token))
        .await;
    assert_eq!(run.status, StatusCode::OK);
    assert_eq!(run.body["success"], true);
    assert!(run.body["message"].as_str().unwrap().contains("1 processed"));
    assert_eq!(app.mailer.sends("reminder_15"), vec!["idle@example.com"]);

    let inbox = app
        .request("GET", "/api/notifications", None, Some(&token))
        .await;
    assert_eq!(inbox.status, StatusCode::OK);
    assert_eq!(inbox.body["data"]["unread_count"], 1);
    assert_eq!(
        inbox.body["data"]["items"][0]["notification_type"],
        "user_inactive_15_days"
    );
    assert_eq!(
        inbox.body["data"]["items"][0]["metadata"]["kind"],
        "lifecycle_batch"
    );
}

#[tokio::test]
async fn test_ws_upgrade_without_token_is_rejected() {
    let app = TestApp::new();

    let response = app.request("GET", "/ws", None, None).await;

    assert!(
        response.status.is_client_error(),
        "Expected a 4xx, got {}",
        response.status
    );
}
