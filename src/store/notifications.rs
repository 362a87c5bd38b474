//! In-app notifications

use crate::store::db::Database;
use crate::store::error::StoreResult;
use crate::store::types::{from_millis, Notification, NotificationType};
use chrono::{DateTime, Utc};
use rusqlite::params;

/// Notification as inserted
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: Option<i64>,
    pub recipient: String,
    pub complaint_id: Option<i64>,
    pub title: String,
    pub message: String,
    pub kind: NotificationType,
}

impl Database {
    pub fn insert_notification(
        &self,
        new: &NewNotification,
        now: DateTime<Utc>,
    ) -> StoreResult<Notification> {
        self.with_conn(|conn| {
            let ts = now.timestamp_millis();
            conn.execute(
                "INSERT INTO notifications (user_id, recipient, complaint_id, title, message,
                                            notification_type, is_read, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7)",
                params![
                    new.user_id,
                    new.recipient,
                    new.complaint_id,
                    new.title,
                    new.message,
                    new.kind,
                    ts
                ],
            )?;

            Ok(Notification {
                id: conn.last_insert_rowid(),
                user_id: new.user_id,
                recipient: new.recipient.clone(),
                complaint_id: new.complaint_id,
                title: new.title.clone(),
                message: new.message.clone(),
                notification_type: new.kind,
                is_read: false,
                created_at: from_millis(ts),
            })
        })
    }

    /// Notifications for an account, newest first
    pub fn list_notifications_for_user(&self, user_id: i64) -> StoreResult<Vec<Notification>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT id, user_id, recipient, complaint_id, title, message,
                        notification_type, is_read, created_at
                 FROM notifications WHERE user_id = ?1
                 ORDER BY created_at DESC, id DESC",
            )?;
            let notifications = stmt
                .query_map(params![user_id], |row| {
                    Ok(Notification {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        recipient: row.get(2)?,
                        complaint_id: row.get(3)?,
                        title: row.get(4)?,
                        message: row.get(5)?,
                        notification_type: row.get(6)?,
                        is_read: row.get(7)?,
                        created_at: from_millis(row.get(8)?),
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(notifications)
        })
    }

    /// Mark read; only the owning account may do so. False when no row matched.
    pub fn mark_notification_read(&self, id: i64, user_id: i64) -> StoreResult<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE notifications SET is_read = 1 WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
            )?;
            Ok(changed > 0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::Role;
    use chrono::Duration;

    fn notice(user_id: Option<i64>, title: &str) -> NewNotification {
        NewNotification {
            user_id,
            recipient: "s@example.com".to_string(),
            complaint_id: None,
            title: title.to_string(),
            message: "body".to_string(),
            kind: NotificationType::StatusUpdate,
        }
    }

    #[test]
    fn test_notifications_for_owner_only() {
        let db = Database::open_in_memory().unwrap();
        let now = Utc::now();
        let user = db
            .create_user("S", "s@example.com", "h", Role::User, now)
            .unwrap();
        let other = db
            .create_user("O", "o@example.com", "h", Role::User, now)
            .unwrap();

        let first = db.insert_notification(&notice(Some(user.id), "first"), now).unwrap();
        db.insert_notification(&notice(Some(user.id), "second"), now + Duration::seconds(1))
            .unwrap();
        db.insert_notification(&notice(None, "external"), now).unwrap();

        let list = db.list_notifications_for_user(user.id).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].title, "second");
        assert!(!list[1].is_read);

        assert!(!db.mark_notification_read(first.id, other.id).unwrap());
        assert!(db.mark_notification_read(first.id, user.id).unwrap());
        let list = db.list_notifications_for_user(user.id).unwrap();
        assert!(list.iter().find(|n| n.id == first.id).unwrap().is_read);
    }
}
