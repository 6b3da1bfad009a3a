//! End-to-end escalation: engine, fan-out, store, and live delivery wired
//! the way the server wires them.

use std::sync::Arc;

use chrono::{Duration, Utc};

use idlewatch_entity::user::SuspensionReason;
use idlewatch_worker::JobExecutor;
use idlewatch_worker::jobs::{LIFECYCLE_JOB, LifecycleJobHandler};

use crate::helpers::{TestApp, drain};

#[tokio::test]
async fn test_connected_operator_sees_batch_live() {
    let app = TestApp::new();
    let admin = app.seed_admin("ops@example.com").await;
    app.seed_user("a@example.com", 16).await;
    app.seed_user("b@example.com", 21).await;
    let mut rx = app.connect(&admin);

    let result = app.state.engine.run_cycle().await;
    assert!(result.success, "{}", result.message);

    let frames = drain(&mut rx);
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0]["type"], "notification");
    let note = &frames[0]["notification"];
    assert_eq!(note["notification_type"], "user_inactive_15_days");
    assert_eq!(note["priority"], "low");
    assert_eq!(note["metadata"]["count"], 2);
    assert_eq!(frames[1]["count"], 1);
}

#[tokio::test]
async fn test_ladder_ends_in_deactivation() {
    let app = TestApp::new();
    app.seed_admin("ops@example.com").await;
    let user = app.seed_user("drifting@example.com", 15).await;
    let start = Utc::now();

    app.state.engine.run_cycle_at(start).await;
    app.state
        .engine
        .run_cycle_at(start + Duration::days(10))
        .await;
    app.state
        .engine
        .run_cycle_at(start + Duration::days(15))
        .await;

    assert_eq!(app.mailer.sends("reminder_15"), vec!["drifting@example.com"]);
    assert_eq!(app.mailer.sends("reminder_25"), vec!["drifting@example.com"]);
    assert_eq!(app.mailer.sends("deactivation"), vec!["drifting@example.com"]);

    let stored = app
        .state
        .stores
        .accounts
        .find_by_id(user.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!stored.is_active);
    assert_eq!(stored.suspension_reason, Some(SuspensionReason::Inactivity));

    let stats = app.state.engine.stats().await.unwrap();
    assert_eq!(stats.deactivated_for_inactivity, 1);
    assert_eq!(stats.inactive_15_to_24_days, 0);
}

#[tokio::test]
async fn test_cycle_without_operators_still_acts() {
    let app = TestApp::new();
    let user = app.seed_user("lonely@example.com", 20).await;

    let result = app.state.engine.run_cycle().await;

    assert!(result.success);
    assert_eq!(app.mailer.sends("reminder_15"), vec!["lonely@example.com"]);
    assert!(app.notifications.is_empty());
    let stored = app
        .state
        .stores
        .accounts
        .find_by_id(user.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.tier15_sent_at.is_some());
}

#[tokio::test]
async fn test_bounced_reminder_is_retried_next_cycle() {
    let app = TestApp::new();
    let admin = app.seed_admin("ops@example.com").await;
    app.seed_user("bounce@example.com", 20).await;
    app.seed_user("ok@example.com", 20).await;
    app.mailer.fail_for("bounce@example.com");

    let result = app.state.engine.run_cycle().await;
    let report = result.report.unwrap();
    assert_eq!(report.total_processed(), 1);
    assert_eq!(report.total_failed(), 1);

    // Only the confirmed send is announced.
    let inbox = app
        .state
        .stores
        .notifications
        .find_for_recipient(admin.id, &Default::default(), false)
        .await
        .unwrap();
    assert_eq!(inbox.total_items, 1);
    assert_eq!(inbox.items[0].metadata().unwrap().accounts().unwrap().len(), 1);

    let retry = app.state.engine.run_cycle().await;
    assert_eq!(retry.report.unwrap().total_failed(), 1);
}

#[tokio::test]
async fn test_scheduled_job_shares_the_engine() {
    let app = TestApp::new();
    app.seed_user("cron@example.com", 26).await;

    let mut executor = JobExecutor::new();
    executor.register(Arc::new(LifecycleJobHandler::new(Arc::clone(
        &app.state.engine,
    ))));

    let summary = executor.execute(LIFECYCLE_JOB).await.unwrap();
    assert_eq!(summary["success"], true);
    assert_eq!(app.mailer.sends("reminder_15"), vec!["cron@example.com"]);
}
