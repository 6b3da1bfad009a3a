//! Recording doubles for the external collaborators.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use idlewatch_entity::notification::LiveDelta;

use crate::mail::{InactivityMailer, MailOutcome};
use crate::notification::PushTransport;

/// Push transport that keeps every delta it was handed.
#[derive(Debug, Default)]
pub struct RecordingPush {
    events: Mutex<Vec<(Uuid, LiveDelta)>>,
}

impl RecordingPush {
    pub fn events_for(&self, recipient_id: Uuid) -> Vec<LiveDelta> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == recipient_id)
            .map(|(_, delta)| delta.clone())
            .collect()
    }
}

#[async_trait]
impl PushTransport for RecordingPush {
    async fn send_to_recipient(&self, recipient_id: Uuid, delta: LiveDelta) {
        self.events.lock().unwrap().push((recipient_id, delta));
    }
}

/// Mailer that records sends and fails for chosen addresses.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(&'static str, String)>>,
    failing: Mutex<HashSet<String>>,
    delay: Mutex<Option<Duration>>,
}

impl RecordingMailer {
    pub fn fail_for(&self, email: &str) {
        self.failing.lock().unwrap().insert(email.to_string());
    }

    pub fn stall(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn sends(&self, template: &str) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| *t == template)
            .map(|(_, email)| email.clone())
            .collect()
    }

    pub fn total(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    async fn send(&self, template: &'static str, email: &str) -> MailOutcome {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.sent.lock().unwrap().push((template, email.to_string()));
        if self.failing.lock().unwrap().contains(email) {
            MailOutcome::failed("mailbox unavailable")
        } else {
            MailOutcome::sent()
        }
    }
}

#[async_trait]
impl InactivityMailer for RecordingMailer {
    async fn send_reminder_15(&self, email: &str, _name: Option<&str>) -> MailOutcome {
        self.send("reminder_15", email).await
    }

    async fn send_reminder_25(&self, email: &str, _name: Option<&str>) -> MailOutcome {
        self.send("reminder_25", email).await
    }

    async fn send_deactivation_notice(&self, email: &str, _name: Option<&str>) -> MailOutcome {
        self.send("deactivation", email).await
    }

    async fn send_deletion_warning(&self, email: &str, _name: Option<&str>) -> MailOutcome {
        self.send("deletion_warning", email).await
    }
}
