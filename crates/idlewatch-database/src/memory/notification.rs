//! In-memory notification store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use idlewatch_core::result::AppResult;
use idlewatch_core::types::{PageRequest, PageResponse};
use idlewatch_entity::notification::{CreateNotification, Notification};

use crate::store::{MarkReadOutcome, NotificationStore};

/// [`NotificationStore`] backed by dashmap, keyed by recipient.
///
/// All of one recipient's notifications live under a single map entry, so
/// every mutation for that recipient is serialized by the entry lock.
#[derive(Debug, Default)]
pub struct MemoryNotificationStore {
    by_recipient: DashMap<Uuid, Vec<Notification>>,
}

impl MemoryNotificationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of notifications across recipients.
    pub fn len(&self) -> usize {
        self.by_recipient.iter().map(|entry| entry.len()).sum()
    }

    /// Whether the store holds no notifications.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn mark(notification: &mut Notification, at: DateTime<Utc>) -> bool {
    if notification.is_read {
        return false;
    }
    notification.is_read = true;
    notification.read_at = Some(at);
    true
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn insert(&self, data: CreateNotification) -> AppResult<Notification> {
        let notification = Notification::from_create(data, Utc::now());
        self.by_recipient
            .entry(notification.recipient_id)
            .or_default()
            .push(notification.clone());
        Ok(notification)
    }

    async fn find_for_recipient(
        &self,
        recipient_id: Uuid,
        page: &PageRequest,
        unread_only: bool,
    ) -> AppResult<PageResponse<Notification>> {
        let Some(entry) = self.by_recipient.get(&recipient_id) else {
            return Ok(PageResponse::empty(page));
        };

        // Stored in insertion order; newest first on the way out.
        let matching: Vec<&Notification> = entry
            .iter()
            .rev()
            .filter(|n| !unread_only || n.is_unread())
            .collect();
        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    async fn count_unread(&self, recipient_id: Uuid) -> AppResult<i64> {
        Ok(self
            .by_recipient
            .get(&recipient_id)
            .map(|entry| entry.iter().filter(|n| n.is_unread()).count() as i64)
            .unwrap_or(0))
    }

    async fn mark_read(
        &self,
        id: Uuid,
        recipient_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<MarkReadOutcome> {
        let Some(mut entry) = self.by_recipient.get_mut(&recipient_id) else {
            return Ok(MarkReadOutcome::NotFound);
        };
        let Some(notification) = entry.iter_mut().find(|n| n.id == id) else {
            return Ok(MarkReadOutcome::NotFound);
        };
        Ok(if mark(notification, at) {
            MarkReadOutcome::Marked
        } else {
            MarkReadOutcome::AlreadyRead
        })
    }

    async fn mark_many_read(
        &self,
        ids: &[Uuid],
        recipient_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let Some(mut entry) = self.by_recipient.get_mut(&recipient_id) else {
            return Ok(0);
        };
        let changed = entry
            .iter_mut()
            .filter(|n| ids.contains(&n.id))
            .map(|n| mark(n, at))
            .filter(|flipped| *flipped)
            .count();
        Ok(changed as u64)
    }

    async fn mark_all_read(&self, recipient_id: Uuid, at: DateTime<Utc>) -> AppResult<u64> {
        let Some(mut entry) = self.by_recipient.get_mut(&recipient_id) else {
            return Ok(0);
        };
        let changed = entry
            .iter_mut()
            .map(|n| mark(n, at))
            .filter(|flipped| *flipped)
            .count();
        Ok(changed as u64)
    }

    async fn delete(&self, id: Uuid, recipient_id: Uuid) -> AppResult<bool> {
        let Some(mut entry) = self.by_recipient.get_mut(&recipient_id) else {
            return Ok(false);
        };
        let before = entry.len();
        entry.retain(|n| n.id != id);
        Ok(entry.len() < before)
    }

    async fn delete_all(&self, recipient_id: Uuid) -> AppResult<u64> {
        Ok(self
            .by_recipient
            .remove(&recipient_id)
            .map(|(_, removed)| removed.len() as u64)
            .unwrap_or(0))
    }

    async fn delete_read_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut removed = 0u64;
        for mut entry in self.by_recipient.iter_mut() {
            let before = entry.len();
            entry.retain(|n| !(n.is_read && n.created_at < cutoff));
            removed += (before - entry.len()) as u64;
        }
        Ok(removed)
    }
}
