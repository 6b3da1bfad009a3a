//! Notification CRUD with a derived unread counter.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use idlewatch_core::error::AppError;
use idlewatch_core::types::{PageRequest, PageResponse};
use idlewatch_database::store::{MarkReadOutcome, NotificationStore};
use idlewatch_entity::notification::{CreateNotification, LiveDelta, Notification};

use super::push::PushTransport;
use crate::context::RequestContext;

/// A page of notifications plus the recipient's current unread count.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationList {
    /// The requested page.
    #[serde(flatten)]
    pub page: PageResponse<Notification>,
    /// Unread count computed at read time.
    pub unread_count: i64,
}

/// Outcome of a read-state or delete mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReadStateChange {
    /// Rows the mutation actually changed.
    pub changed: u64,
    /// Unread count after the mutation.
    pub unread_count: i64,
}

/// Single entrypoint for creating and mutating notifications.
///
/// The unread count is never cached: every response and every pushed
/// `unread_count` delta is recomputed from the store after the mutation.
#[derive(Debug, Clone)]
pub struct NotificationService {
    /// Notification store.
    store: Arc<dyn NotificationStore>,
    /// Live delta transport.
    push: Arc<dyn PushTransport>,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(store: Arc<dyn NotificationStore>, push: Arc<dyn PushTransport>) -> Self {
        Self { store, push }
    }

    /// Creates a notification and pushes it, then the new unread count.
    pub async fn create(&self, data: CreateNotification) -> Result<Notification, AppError> {
        let notification = self.store.insert(data).await?;
        debug!(
            notification_id = %notification.id,
            recipient_id = %notification.recipient_id,
            kind = %notification.notification_type,
            "Notification created"
        );

        self.push
            .send_to_recipient(
                notification.recipient_id,
                LiveDelta::NotificationCreated {
                    notification: Box::new(notification.clone()),
                },
            )
            .await;
        self.push_unread_count(notification.recipient_id).await;

        Ok(notification)
    }

    /// Lists the caller's notifications.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
        unread_only: bool,
    ) -> Result<NotificationList, AppError> {
        let page = self
            .store
            .find_for_recipient(ctx.user_id, page, unread_only)
            .await?;
        let unread_count = self.store.count_unread(ctx.user_id).await?;
        Ok(NotificationList { page, unread_count })
    }

    /// Gets the caller's unread count.
    pub async fn unread_count(&self, ctx: &RequestContext) -> Result<i64, AppError> {
        self.store.count_unread(ctx.user_id).await
    }

    /// Marks one notification read. Already-read is a no-op.
    pub async fn mark_read(
        &self,
        ctx: &RequestContext,
        notification_id: Uuid,
    ) -> Result<ReadStateChange, AppError> {
        let changed = match self
            .store
            .mark_read(notification_id, ctx.user_id, now())
            .await?
        {
            MarkReadOutcome::Marked => 1,
            MarkReadOutcome::AlreadyRead => 0,
            MarkReadOutcome::NotFound => {
                return Err(AppError::not_found(format!(
                    "Notification {notification_id} not found"
                )));
            }
        };
        self.finish(ctx.user_id, changed).await
    }

    /// Marks the given notifications read; ids not owned by the caller are ignored.
    pub async fn mark_many_read(
        &self,
        ctx: &RequestContext,
        ids: &[Uuid],
    ) -> Result<ReadStateChange, AppError> {
        let changed = self.store.mark_many_read(ids, ctx.user_id, now()).await?;
        self.finish(ctx.user_id, changed).await
    }

    /// Marks all of the caller's notifications read.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> Result<ReadStateChange, AppError> {
        let changed = self.store.mark_all_read(ctx.user_id, now()).await?;
        self.finish(ctx.user_id, changed).await
    }

    /// Deletes one of the caller's notifications.
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        notification_id: Uuid,
    ) -> Result<ReadStateChange, AppError> {
        if !self.store.delete(notification_id, ctx.user_id).await? {
            return Err(AppError::not_found(format!(
                "Notification {notification_id} not found"
            )));
        }
        self.finish(ctx.user_id, 1).await
    }

    /// Deletes all of the caller's notifications.
    pub async fn delete_all(&self, ctx: &RequestContext) -> Result<ReadStateChange, AppError> {
        let changed = self.store.delete_all(ctx.user_id).await?;
        self.finish(ctx.user_id, changed).await
    }

    /// Removes read notifications older than `cutoff`. Unread counts are
    /// unaffected, so nothing is pushed.
    pub async fn purge_read_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        let removed = self.store.delete_read_older_than(cutoff).await?;
        info!(removed, cutoff = %cutoff, "Purged read notifications");
        Ok(removed)
    }

    async fn finish(&self, recipient_id: Uuid, changed: u64) -> Result<ReadStateChange, AppError> {
        let unread_count = self.store.count_unread(recipient_id).await?;
        if changed > 0 {
            self.push
                .send_to_recipient(recipient_id, LiveDelta::UnreadCount { count: unread_count })
                .await;
        }
        Ok(ReadStateChange {
            changed,
            unread_count,
        })
    }

    async fn push_unread_count(&self, recipient_id: Uuid) {
        match self.store.count_unread(recipient_id).await {
            Ok(count) => {
                self.push
                    .send_to_recipient(recipient_id, LiveDelta::UnreadCount { count })
                    .await;
            }
            Err(e) => {
                warn!(recipient_id = %recipient_id, error = %e, "Failed to count unread for push");
            }
        }
    }
}

fn now() -> DateTime<Utc> {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingPush;
    use idlewatch_core::error::ErrorKind;
    use idlewatch_database::memory::MemoryNotificationStore;
    use idlewatch_entity::notification::{NotificationPriority, NotificationType};
    use idlewatch_entity::user::UserRole;

    fn setup() -> (NotificationService, Arc<RecordingPush>) {
        let push = Arc::new(RecordingPush::default());
        let service = NotificationService::new(Arc::new(MemoryNotificationStore::new()), push.clone());
        (service, push)
    }

    fn data(recipient_id: Uuid) -> CreateNotification {
        CreateNotification {
            recipient_id,
            notification_type: NotificationType::System,
            title: "Maintenance".into(),
            message: "Tonight".into(),
            priority: NotificationPriority::Low,
            metadata: None,
            action_url: None,
        }
    }

    #[tokio::test]
    async fn test_create_pushes_notification_then_count() {
        let (service, push) = setup();
        let ctx = RequestContext::new(Uuid::new_v4(), UserRole::User);
        service.create(data(ctx.user_id)).await.unwrap();
        service.create(data(ctx.user_id)).await.unwrap();

        let events = push.events_for(ctx.user_id);
        assert_eq!(events.len(), 4);
        assert_eq!(events[0].name(), "notification_created");
        assert!(matches!(events[1], LiveDelta::UnreadCount { count: 1 }));
        assert!(matches!(events[3], LiveDelta::UnreadCount { count: 2 }));
    }

    #[tokio::test]
    async fn test_mark_read_twice_decrements_once() {
        let (service, push) = setup();
        let ctx = RequestContext::new(Uuid::new_v4(), UserRole::User);
        let n = service.create(data(ctx.user_id)).await.unwrap();
        service.create(data(ctx.user_id)).await.unwrap();
        let pushed_before = push.events_for(ctx.user_id).len();

        let first = service.mark_read(&ctx, n.id).await.unwrap();
        assert_eq!(first, ReadStateChange { changed: 1, unread_count: 1 });

        let second = service.mark_read(&ctx, n.id).await.unwrap();
        assert_eq!(second, ReadStateChange { changed: 0, unread_count: 1 });

        // Only the first mark produced a delta.
        assert_eq!(push.events_for(ctx.user_id).len(), pushed_before + 1);
    }

    #[tokio::test]
    async fn test_foreign_notification_is_not_found() {
        let (service, _) = setup();
        let owner = RequestContext::new(Uuid::new_v4(), UserRole::User);
        let intruder = RequestContext::new(Uuid::new_v4(), UserRole::User);
        let n = service.create(data(owner.user_id)).await.unwrap();

        let err = service.mark_read(&intruder, n.id).await.unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
        let err = service.delete(&intruder, n.id).await.unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
        assert_eq!(service.unread_count(&owner).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_counter_matches_predicate_after_mixed_ops() {
        let (service, _) = setup();
        let ctx = RequestContext::new(Uuid::new_v4(), UserRole::User);
        let mut ids = Vec::new();
        for _ in 0..5 {
            ids.push(service.create(data(ctx.user_id)).await.unwrap().id);
        }
        service.mark_many_read(&ctx, &ids[..2]).await.unwrap();
        service.delete(&ctx, ids[2]).await.unwrap();
        service.delete(&ctx, ids[0]).await.unwrap();

        let list = service
            .list(&ctx, &PageRequest::default(), false)
            .await
            .unwrap();
        let unread = list.page.items.iter().filter(|n| n.is_unread()).count() as i64;
        assert_eq!(list.unread_count, unread);
        assert_eq!(list.unread_count, 2);

        let all = service.mark_all_read(&ctx).await.unwrap();
        assert_eq!(all, ReadStateChange { changed: 2, unread_count: 0 });
        let cleared = service.delete_all(&ctx).await.unwrap();
        assert_eq!(cleared.changed, 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_unread_count_consistent_under_concurrent_writers() {
        let (service, _) = setup();
        let ctx = RequestContext::new(Uuid::new_v4(), UserRole::User);
        let mut ids = Vec::new();
        for _ in 0..12 {
            ids.push(service.create(data(ctx.user_id)).await.unwrap().id);
        }

        let mut handles = Vec::new();
        for (i, id) in ids.iter().copied().enumerate() {
            let service = service.clone();
            let ctx = ctx.clone();
            handles.push(tokio::spawn(async move {
                match i % 4 {
                    0 => {
                        service.create(data(ctx.user_id)).await.unwrap();
                    }
                    1 => {
                        // Two racing marks on one id change it once.
                        let (a, b) =
                            tokio::join!(service.mark_read(&ctx, id), service.mark_read(&ctx, id));
                        assert_eq!(a.unwrap().changed + b.unwrap().changed, 1);
                    }
                    2 => {
                        service.delete(&ctx, id).await.unwrap();
                    }
                    _ => {
                        service.mark_all_read(&ctx).await.unwrap();
                    }
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let list = service.list(&ctx, &PageRequest::new(1, 100), false).await.unwrap();
        let unread_rows = list.page.items.iter().filter(|n| n.is_unread()).count() as i64;
        assert_eq!(list.unread_count, unread_rows);
        assert_eq!(service.unread_count(&ctx).await.unwrap(), unread_rows);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_push_the_final_count() {
        let (service, push) = setup();
        let recipient = Uuid::new_v4();
        let mut handles = Vec::new();
        for _ in 0..16 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.create(data(recipient)).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // Counts may arrive out of order; the final count is always among them.
        let counts: Vec<i64> = push
            .events_for(recipient)
            .into_iter()
            .filter_map(|delta| match delta {
                LiveDelta::UnreadCount { count } => Some(count),
                LiveDelta::NotificationCreated { .. } => None,
            })
            .collect();
        assert_eq!(counts.len(), 16);
        assert_eq!(counts.iter().max(), Some(&16));
    }
}
