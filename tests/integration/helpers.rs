//! Shared test helpers for integration tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use chrono::{Duration, Utc};
use http::{Request, StatusCode};
use jsonwebtoken::{EncodingKey, Header};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

use idlewatch_api::jwt::Claims;
use idlewatch_api::{AppState, build_app};
use idlewatch_core::config::AppConfig;
use idlewatch_database::Stores;
use idlewatch_database::memory::{MemoryAccountStore, MemoryNotificationStore};
use idlewatch_entity::notification::{CreateNotification, NotificationPriority, NotificationType};
use idlewatch_entity::user::{CreateUser, User};
use idlewatch_service::{InactivityMailer, MailOutcome};

/// Mailer that records every send and fails for chosen addresses.
#[derive(Debug, Default)]
pub struct CountingMailer {
    sent: Mutex<Vec<(&'static str, String)>>,
    failing: Mutex<HashSet<String>>,
}

impl CountingMailer {
    /// Make every send to `email` report failure.
    pub fn fail_for(&self, email: &str) {
        self.failing.lock().unwrap().insert(email.to_string());
    }

    /// Addresses that received `template`, in send order.
    pub fn sends(&self, template: &str) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| *t == template)
            .map(|(_, email)| email.clone())
            .collect()
    }

    fn record(&self, template: &'static str, email: &str) -> MailOutcome {
        if self.failing.lock().unwrap().contains(email) {
            return MailOutcome::failed("mailbox unavailable");
        }
        self.sent.lock().unwrap().push((template, email.to_string()));
        MailOutcome::sent()
    }
}

#[async_trait]
impl InactivityMailer for CountingMailer {
    async fn send_reminder_15(&self, email: &str, _name: Option<&str>) -> MailOutcome {
        self.record("reminder_15", email)
    }

    async fn send_reminder_25(&self, email: &str, _name: Option<&str>) -> MailOutcome {
        self.record("reminder_25", email)
    }

    async fn send_deactivation_notice(&self, email: &str, _name: Option<&str>) -> MailOutcome {
        self.record("deactivation", email)
    }

    async fn send_deletion_warning(&self, email: &str, _name: Option<&str>) -> MailOutcome {
        self.record("deletion_warning", email)
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for driving services directly
    pub state: AppState,
    /// Concrete account store, for seeding
    pub accounts: Arc<MemoryAccountStore>,
    /// Concrete notification store
    pub notifications: Arc<MemoryNotificationStore>,
    /// Recording mailer
    pub mailer: Arc<CountingMailer>,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application over empty in-memory stores
    pub fn new() -> Self {
        let config = AppConfig::default();
        let accounts = Arc::new(MemoryAccountStore::new());
        let notifications = Arc::new(MemoryNotificationStore::new());
        let mailer = Arc::new(CountingMailer::default());

        let stores = Stores::from_memory(accounts.clone(), notifications.clone());
        let state = AppState::new(config.clone(), stores, mailer.clone());
        let router = build_app(state.clone());

        Self {
            router,
            state,
            accounts,
            notifications,
            mailer,
            config,
        }
    }

    /// Seed an active account last seen `days_idle` days ago
    pub async fn seed_user(&self, email: &str, days_idle: i64) -> User {
        self.state
            .stores
            .accounts
            .create(CreateUser {
                last_activity_at: Some(Utc::now() - Duration::days(days_idle)),
                ..CreateUser::user(email)
            })
            .await
            .expect("Failed to seed user")
    }

    /// Seed an operator account
    pub async fn seed_admin(&self, email: &str) -> User {
        self.state
            .stores
            .accounts
            .create(CreateUser::admin(email))
            .await
            .expect("Failed to seed admin")
    }

    /// Create a general notification for `recipient`
    pub async fn notify(&self, recipient: &User, title: &str) -> Value {
        let created = self
            .state
            .notifications
            .create(CreateNotification {
                recipient_id: recipient.id,
                notification_type: NotificationType::General,
                title: title.to_string(),
                message: format!("{title} body"),
                priority: NotificationPriority::Medium,
                metadata: None,
                action_url: None,
            })
            .await
            .expect("Failed to create notification");
        serde_json::to_value(created).expect("Failed to serialize notification")
    }

    /// Mint a valid access token for `user`
    pub fn token_for(&self, user: &User) -> String {
        let claims = Claims {
            sub: user.id,
            role: user.role,
            exp: (Utc::now() + Duration::minutes(15)).timestamp(),
            iat: Some(Utc::now().timestamp()),
            iss: None,
        };
        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.auth.jwt_secret.as_bytes()),
        )
        .expect("Failed to sign token")
    }

    /// Register a live session for `user` and return its frame receiver
    pub fn connect(&self, user: &User) -> mpsc::Receiver<String> {
        let (_handle, rx) = self
            .state
            .realtime
            .connections
            .register(user.id, user.role);
        rx
    }

    /// Make a request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Test response wrapper
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

/// Drain every frame currently queued on a live session.
pub fn drain(rx: &mut mpsc::Receiver<String>) -> Vec<Value> {
    let mut frames = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        frames.push(serde_json::from_str(&frame).expect("Frame is not JSON"));
    }
    frames
}
