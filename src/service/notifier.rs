//! Notification delivery
//!
//! Lifecycle operations hand `Notice`s to a `Notifier`. Delivery failures are
//! logged and swallowed so a broken channel never fails the operation.

use crate::store::{Database, NewNotification, NotificationType};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

/// A message for one recipient
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub recipient: String,
    pub complaint_id: Option<i64>,
    pub title: String,
    pub message: String,
    pub kind: NotificationType,
}

impl Notice {
    pub fn new(
        recipient: impl Into<String>,
        complaint_id: i64,
        kind: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            recipient: recipient.into(),
            complaint_id: Some(complaint_id),
            title: title.into(),
            message: message.into(),
            kind,
        }
    }
}

/// Delivers notices
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notice: Notice);
}

/// Persists notices as in-app notifications and logs them
pub struct StoreNotifier {
    db: Arc<Database>,
}

impl StoreNotifier {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn persist(&self, notice: &Notice) -> crate::store::StoreResult<i64> {
        let user_id = self
            .db
            .find_user_by_email(&notice.recipient)?
            .map(|stored| stored.user.id);

        let stored = self.db.insert_notification(
            &NewNotification {
                user_id,
                recipient: notice.recipient.clone(),
                complaint_id: notice.complaint_id,
                title: notice.title.clone(),
                message: notice.message.clone(),
                kind: notice.kind,
            },
            Utc::now(),
        )?;
        Ok(stored.id)
    }
}

#[async_trait]
impl Notifier for StoreNotifier {
    async fn notify(&self, notice: Notice) {
        match self.persist(&notice) {
            Ok(id) => tracing::info!(
                notification_id = id,
                recipient = %notice.recipient,
                complaint_id = ?notice.complaint_id,
                kind = notice.kind.as_str(),
                title = %notice.title,
                "Notification sent"
            ),
            Err(e) => tracing::warn!(
                recipient = %notice.recipient,
                error = %e,
                "Failed to store notification"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Role;

    #[tokio::test]
    async fn test_store_notifier_links_known_accounts() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let user = db
            .create_user("S", "s@example.com", "h", Role::User, Utc::now())
            .unwrap();
        let notifier = StoreNotifier::new(db.clone());

        notifier
            .notify(Notice {
                recipient: "S@example.com".into(),
                complaint_id: None,
                title: "Hello".into(),
                message: "World".into(),
                kind: NotificationType::Comment,
            })
            .await;
        notifier
            .notify(Notice {
                recipient: "outsider@example.com".into(),
                complaint_id: None,
                title: "Hi".into(),
                message: "There".into(),
                kind: NotificationType::Escalation,
            })
            .await;

        let mine = db.list_notifications_for_user(user.id).unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].title, "Hello");
    }
}
