//! Application state shared across all handlers.

use std::sync::Arc;

use idlewatch_core::config::AppConfig;
use idlewatch_database::Stores;
use idlewatch_realtime::RealtimeEngine;
use idlewatch_service::{AdminNotifier, InactivityMailer, LifecycleEngine, NotificationService};

use crate::jwt::JwtDecoder;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Account and notification stores
    pub stores: Stores,
    /// Inactivity escalation engine, shared with the scheduled trigger
    pub engine: Arc<LifecycleEngine>,
    /// Notification service
    pub notifications: NotificationService,
    /// WebSocket realtime engine
    pub realtime: RealtimeEngine,
    /// JWT token decoder and validator
    pub jwt: Arc<JwtDecoder>,
}

impl AppState {
    /// Wires services over the given stores.
    ///
    /// Notifications push through the realtime engine built here, so every
    /// create and mutation reaches the recipient's open sockets.
    pub fn new(config: AppConfig, stores: Stores, mailer: Arc<dyn InactivityMailer>) -> Self {
        let realtime = RealtimeEngine::new(config.realtime.clone());
        let notifications =
            NotificationService::new(stores.notifications.clone(), realtime.publisher.clone());
        let admins = AdminNotifier::new(stores.accounts.clone(), notifications.clone());
        let engine = Arc::new(LifecycleEngine::new(
            stores.accounts.clone(),
            mailer,
            admins,
            config.lifecycle.clone(),
        ));
        let jwt = Arc::new(JwtDecoder::new(&config.auth));

        Self {
            config: Arc::new(config),
            stores,
            engine,
            notifications,
            realtime,
            jwt,
        }
    }
}
