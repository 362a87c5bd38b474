//! Complaints, their timeline and attachments

use crate::store::db::Database;
use crate::store::error::{StoreError, StoreResult};
use crate::store::types::{
    from_millis, Attachment, Complaint, NewTimelineEntry, Priority, Status, TimelineEntry,
};
use crate::store::users::optional_user_from_row;
use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::collections::BTreeMap;

/// Complaint fields as inserted
#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: Priority,
    pub is_anonymous: bool,
    pub anonymous_email: Option<String>,
    pub user_id: Option<i64>,
}

/// Attachment metadata as inserted; the bytes already live on disk
#[derive(Debug, Clone)]
pub struct NewAttachment {
    pub file_name: String,
    pub file_path: String,
    pub file_type: Option<String>,
    pub file_size: i64,
}

const COMPLAINT_SELECT: &str = "
    SELECT c.id, c.title, c.description, c.category, c.priority, c.status,
           c.is_anonymous, c.anonymous_email, c.created_at, c.updated_at, c.resolved_at,
           c.user_id,
           u.id, u.name, u.email, u.role,
           a.id, a.name, a.email, a.role
    FROM complaints c
    LEFT JOIN users u ON u.id = c.user_id
    LEFT JOIN users a ON a.id = c.assigned_to";

fn complaint_from_row(row: &Row<'_>) -> rusqlite::Result<Complaint> {
    Ok(Complaint {
        complaint_id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        priority: row.get(4)?,
        status: row.get(5)?,
        is_anonymous: row.get(6)?,
        anonymous_email: row.get(7)?,
        created_at: from_millis(row.get(8)?),
        updated_at: from_millis(row.get(9)?),
        resolved_at: row.get::<_, Option<i64>>(10)?.map(from_millis),
        owner_id: row.get(11)?,
        user: optional_user_from_row(row, 12)?,
        assigned_to: optional_user_from_row(row, 16)?,
    })
}

const TIMELINE_SELECT: &str = "
    SELECT t.id, t.complaint_id, t.status, t.comment, t.is_public, t.timestamp,
           u.id, u.name, u.email, u.role
    FROM timeline_entries t
    LEFT JOIN users u ON u.id = t.updated_by";

fn timeline_from_row(row: &Row<'_>) -> rusqlite::Result<TimelineEntry> {
    Ok(TimelineEntry {
        id: row.get(0)?,
        complaint_id: row.get(1)?,
        status: row.get(2)?,
        comment: row.get(3)?,
        is_public: row.get(4)?,
        timestamp: from_millis(row.get(5)?),
        updated_by: optional_user_from_row(row, 6)?,
    })
}

fn query_complaints(
    conn: &Connection,
    filter: &str,
    args: &[&dyn rusqlite::ToSql],
) -> StoreResult<Vec<Complaint>> {
    let sql = format!(
        "{} {} ORDER BY c.created_at DESC, c.id DESC",
        COMPLAINT_SELECT, filter
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let complaints = stmt
        .query_map(args, complaint_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(complaints)
}

fn fetch_complaint(conn: &Connection, id: i64) -> StoreResult<Option<Complaint>> {
    let complaint = conn
        .query_row(
            &format!("{} WHERE c.id = ?1", COMPLAINT_SELECT),
            params![id],
            complaint_from_row,
        )
        .optional()?;
    Ok(complaint)
}

fn insert_entry(
    conn: &Connection,
    complaint_id: i64,
    entry: &NewTimelineEntry,
    at: DateTime<Utc>,
) -> StoreResult<i64> {
    conn.execute(
        "INSERT INTO timeline_entries (complaint_id, status, comment, is_public, updated_by, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            complaint_id,
            entry.status,
            entry.comment,
            entry.is_public,
            entry.updated_by,
            at.timestamp_millis()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn insert_attachment(
    conn: &Connection,
    complaint_id: i64,
    new: &NewAttachment,
    at: DateTime<Utc>,
) -> StoreResult<i64> {
    conn.execute(
        "INSERT INTO attachments (complaint_id, file_name, file_path, file_type, file_size, uploaded_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            complaint_id,
            new.file_name,
            new.file_path,
            new.file_type,
            new.file_size,
            at.timestamp_millis()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

impl Database {
    /// Insert a complaint with its first timeline entry and evidence row in
    /// one transaction
    pub fn insert_complaint(
        &self,
        new: &NewComplaint,
        first_entry: Option<&NewTimelineEntry>,
        attachment: Option<&NewAttachment>,
        now: DateTime<Utc>,
    ) -> StoreResult<Complaint> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let ts = now.timestamp_millis();
            tx.execute(
                "INSERT INTO complaints (title, description, category, priority, status,
                                         is_anonymous, anonymous_email, user_id,
                                         created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
                params![
                    new.title,
                    new.description,
                    new.category,
                    new.priority,
                    Status::New,
                    new.is_anonymous,
                    new.anonymous_email,
                    new.user_id,
                    ts
                ],
            )?;
            let id = tx.last_insert_rowid();

            if let Some(entry) = first_entry {
                insert_entry(&tx, id, entry, now)?;
            }
            if let Some(attachment) = attachment {
                insert_attachment(&tx, id, attachment, now)?;
            }

            let complaint = fetch_complaint(&tx, id)?
                .ok_or_else(|| StoreError::NotFound(format!("complaint {}", id)))?;
            tx.commit()?;
            Ok(complaint)
        })
    }

    pub fn get_complaint(&self, id: i64) -> StoreResult<Option<Complaint>> {
        self.with_conn(|conn| fetch_complaint(conn, id))
    }

    /// Every complaint, newest first
    pub fn list_complaints(&self) -> StoreResult<Vec<Complaint>> {
        self.with_conn(|conn| query_complaints(conn, "", &[]))
    }

    /// Complaints owned by `user_id`, newest first
    pub fn list_complaints_by_user(&self, user_id: i64) -> StoreResult<Vec<Complaint>> {
        self.with_conn(|conn| query_complaints(conn, "WHERE c.user_id = ?1", &[&user_id]))
    }

    /// Persist the mutable fields of `complaint` and optionally append a
    /// timeline entry stamped with `complaint.updated_at`, atomically.
    ///
    /// The write only applies while the stored status is still `expected`.
    /// A complaint that moved on since it was read gives `Conflict`.
    pub fn update_complaint(
        &self,
        complaint: &Complaint,
        expected: Status,
        entry: Option<&NewTimelineEntry>,
    ) -> StoreResult<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let changed = tx.execute(
                "UPDATE complaints
                 SET title = ?2, description = ?3, category = ?4, priority = ?5, status = ?6,
                     assigned_to = ?7, updated_at = ?8, resolved_at = ?9
                 WHERE id = ?1 AND status = ?10",
                params![
                    complaint.complaint_id,
                    complaint.title,
                    complaint.description,
                    complaint.category,
                    complaint.priority,
                    complaint.status,
                    complaint.assigned_to.as_ref().map(|u| u.id),
                    complaint.updated_at.timestamp_millis(),
                    complaint.resolved_at.map(|t| t.timestamp_millis()),
                    expected,
                ],
            )?;
            if changed == 0 {
                let exists = tx
                    .query_row(
                        "SELECT 1 FROM complaints WHERE id = ?1",
                        params![complaint.complaint_id],
                        |_| Ok(()),
                    )
                    .optional()?
                    .is_some();
                return Err(if exists {
                    StoreError::Conflict(format!(
                        "complaint {} is no longer {}",
                        complaint.complaint_id, expected
                    ))
                } else {
                    StoreError::NotFound(format!("complaint {}", complaint.complaint_id))
                });
            }

            if let Some(entry) = entry {
                insert_entry(&tx, complaint.complaint_id, entry, complaint.updated_at)?;
            }
            tx.commit()?;
            Ok(())
        })
    }

    /// Delete a complaint; timeline and attachment rows cascade.
    /// Returns false when nothing was deleted.
    pub fn delete_complaint(&self, id: i64) -> StoreResult<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM complaints WHERE id = ?1", params![id])?;
            Ok(changed > 0)
        })
    }

    /// Complaints in one of `statuses` created before `before`, oldest first
    pub fn find_stale_complaints(
        &self,
        statuses: &[Status],
        before: DateTime<Utc>,
    ) -> StoreResult<Vec<Complaint>> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }
        self.with_conn(|conn| {
            let placeholders = (0..statuses.len())
                .map(|i| format!("?{}", i + 2))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!(
                "{} WHERE c.created_at < ?1 AND c.status IN ({}) ORDER BY c.created_at, c.id",
                COMPLAINT_SELECT, placeholders
            );

            let mut args: Vec<Box<dyn rusqlite::ToSql>> =
                vec![Box::new(before.timestamp_millis())];
            for status in statuses {
                args.push(Box::new(*status));
            }

            let mut stmt = conn.prepare(&sql)?;
            let complaints = stmt
                .query_map(params_from_iter(args.iter()), complaint_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(complaints)
        })
    }

    /// Counts per status, optionally limited to one owner
    pub fn count_by_status(&self, user_id: Option<i64>) -> StoreResult<Vec<(Status, i64)>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT status, COUNT(*) FROM complaints
                 WHERE ?1 IS NULL OR user_id = ?1
                 GROUP BY status",
            )?;
            let counts = stmt
                .query_map(params![user_id], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(counts)
        })
    }

    /// Counts per category name, optionally limited to one owner
    pub fn count_by_category(&self, user_id: Option<i64>) -> StoreResult<BTreeMap<String, i64>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT category, COUNT(*) FROM complaints
                 WHERE ?1 IS NULL OR user_id = ?1
                 GROUP BY category",
            )?;
            let counts = stmt
                .query_map(params![user_id], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
                })?
                .collect::<Result<BTreeMap<_, _>, _>>()?;
            Ok(counts)
        })
    }

    /// Append a timeline entry outside of a status change
    pub fn insert_timeline_entry(
        &self,
        complaint_id: i64,
        entry: &NewTimelineEntry,
        at: DateTime<Utc>,
    ) -> StoreResult<i64> {
        self.with_conn(|conn| insert_entry(conn, complaint_id, entry, at))
    }

    pub fn get_timeline_entry(&self, id: i64) -> StoreResult<Option<TimelineEntry>> {
        self.with_conn(|conn| {
            let entry = conn
                .query_row(
                    &format!("{} WHERE t.id = ?1", TIMELINE_SELECT),
                    params![id],
                    timeline_from_row,
                )
                .optional()?;
            Ok(entry)
        })
    }

    /// Full history of a complaint, newest first
    pub fn list_timeline(&self, complaint_id: i64) -> StoreResult<Vec<TimelineEntry>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(&format!(
                "{} WHERE t.complaint_id = ?1 ORDER BY t.timestamp DESC, t.id DESC",
                TIMELINE_SELECT
            ))?;
            let entries = stmt
                .query_map(params![complaint_id], timeline_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(entries)
        })
    }

    pub fn list_attachments(&self, complaint_id: i64) -> StoreResult<Vec<Attachment>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT id, complaint_id, file_name, file_path, file_type, file_size, uploaded_at
                 FROM attachments WHERE complaint_id = ?1 ORDER BY id",
            )?;
            let attachments = stmt
                .query_map(params![complaint_id], |row| {
                    Ok(Attachment {
                        attachment_id: row.get(0)?,
                        complaint_id: row.get(1)?,
                        file_name: row.get(2)?,
                        file_path: row.get(3)?,
                        file_type: row.get(4)?,
                        file_size: row.get(5)?,
                        uploaded_at: from_millis(row.get(6)?),
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(attachments)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::Role;
    use chrono::Duration;

    fn draft(title: &str, category: &str, user_id: Option<i64>) -> NewComplaint {
        NewComplaint {
            title: title.to_string(),
            description: "details".to_string(),
            category: category.to_string(),
            priority: Priority::Medium,
            is_anonymous: false,
            anonymous_email: None,
            user_id,
        }
    }

    fn setup() -> (Database, i64, i64) {
        let db = Database::open_in_memory().unwrap();
        let now = Utc::now();
        let user = db
            .create_user("Student", "s@example.com", "h", Role::User, now)
            .unwrap();
        let admin = db
            .create_user("Admin", "admin@example.com", "h", Role::Admin, now)
            .unwrap();
        (db, user.id, admin.id)
    }

    #[test]
    fn test_insert_with_first_entry() {
        let (db, uid, _) = setup();
        let entry = NewTimelineEntry::system("NEW", "Complaint submitted.").by(uid);
        let complaint = db
            .insert_complaint(
                &draft("Leaky tap", "Hostel", Some(uid)),
                Some(&entry),
                None,
                Utc::now(),
            )
            .unwrap();

        assert_eq!(complaint.status, Status::New);
        assert_eq!(complaint.owner_id, Some(uid));
        assert_eq!(complaint.user.as_ref().map(|u| u.id), Some(uid));
        assert!(complaint.assigned_to.is_none());

        let timeline = db.list_timeline(complaint.complaint_id).unwrap();
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].status, "NEW");
        assert_eq!(timeline[0].updated_by.as_ref().map(|u| u.id), Some(uid));
    }

    #[test]
    fn test_update_assigns_and_appends() {
        let (db, uid, admin) = setup();
        let mut complaint = db
            .insert_complaint(&draft("Wifi", "Infrastructure", Some(uid)), None, None, Utc::now())
            .unwrap();

        complaint.status = Status::InProgress;
        complaint.assigned_to = db.get_user(admin).unwrap();
        complaint.updated_at = complaint.updated_at + Duration::seconds(5);
        let entry = NewTimelineEntry::system("IN_PROGRESS", "Complaint assigned to Admin").by(admin);
        db.update_complaint(&complaint, Status::New, Some(&entry))
            .unwrap();

        let stored = db.get_complaint(complaint.complaint_id).unwrap().unwrap();
        assert_eq!(stored.status, Status::InProgress);
        assert_eq!(stored.assigned_to.map(|u| u.name), Some("Admin".to_string()));
        assert_eq!(db.list_timeline(complaint.complaint_id).unwrap().len(), 1);
    }

    #[test]
    fn test_update_missing_complaint() {
        let (db, uid, _) = setup();
        let mut complaint = db
            .insert_complaint(&draft("x", "General", Some(uid)), None, None, Utc::now())
            .unwrap();
        complaint.complaint_id = 4242;
        let err = db
            .update_complaint(&complaint, Status::New, None)
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_timeline_newest_first() {
        let (db, uid, _) = setup();
        let now = Utc::now();
        let c = db
            .insert_complaint(&draft("x", "General", Some(uid)), None, None, now)
            .unwrap();
        db.insert_timeline_entry(c.complaint_id, &NewTimelineEntry::system("NEW", "one"), now)
            .unwrap();
        db.insert_timeline_entry(
            c.complaint_id,
            &NewTimelineEntry::system("RESOLVED", "two"),
            now + Duration::minutes(1),
        )
        .unwrap();

        let timeline = db.list_timeline(c.complaint_id).unwrap();
        assert_eq!(timeline[0].comment.as_deref(), Some("two"));
        assert_eq!(timeline[1].comment.as_deref(), Some("one"));
        assert!(timeline[1].updated_by.is_none());
    }

    #[test]
    fn test_list_by_user_and_delete_cascades() {
        let (db, uid, admin) = setup();
        let now = Utc::now();
        let photo = NewAttachment {
            file_name: "photo.png".into(),
            file_path: "/tmp/photo.png".into(),
            file_type: Some("image/png".into()),
            file_size: 12,
        };
        let mine = db
            .insert_complaint(
                &draft("mine", "General", Some(uid)),
                Some(&NewTimelineEntry::system("NEW", "submitted")),
                Some(&photo),
                now,
            )
            .unwrap();
        db.insert_complaint(&draft("theirs", "General", Some(admin)), None, None, now)
            .unwrap();

        assert_eq!(db.list_complaints().unwrap().len(), 2);
        let own = db.list_complaints_by_user(uid).unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].title, "mine");
        assert_eq!(db.list_attachments(mine.complaint_id).unwrap().len(), 1);

        assert!(db.delete_complaint(mine.complaint_id).unwrap());
        assert!(!db.delete_complaint(mine.complaint_id).unwrap());
        assert!(db.list_timeline(mine.complaint_id).unwrap().is_empty());
        assert!(db.list_attachments(mine.complaint_id).unwrap().is_empty());
    }

    #[test]
    fn test_find_stale_complaints() {
        let (db, uid, _) = setup();
        let now = Utc::now();
        let old = now - Duration::hours(72);
        let stale = db
            .insert_complaint(&draft("old", "General", Some(uid)), None, None, old)
            .unwrap();
        db.insert_complaint(&draft("fresh", "General", Some(uid)), None, None, now)
            .unwrap();
        let mut resolved = db
            .insert_complaint(&draft("done", "General", Some(uid)), None, None, old)
            .unwrap();
        resolved.status = Status::Resolved;
        db.update_complaint(&resolved, Status::New, None).unwrap();

        let found = db
            .find_stale_complaints(
                &[Status::New, Status::UnderReview],
                now - Duration::hours(48),
            )
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].complaint_id, stale.complaint_id);
        assert!(db.find_stale_complaints(&[], now).unwrap().is_empty());
    }

    #[test]
    fn test_counts_scoped_and_global() {
        let (db, uid, admin) = setup();
        let now = Utc::now();
        db.insert_complaint(&draft("a", "Hostel", Some(uid)), None, None, now)
            .unwrap();
        db.insert_complaint(&draft("b", "Hostel", Some(admin)), None, None, now)
            .unwrap();
        db.insert_complaint(&draft("c", "Academic", Some(uid)), None, None, now)
            .unwrap();

        let global = db.count_by_category(None).unwrap();
        assert_eq!(global.get("Hostel"), Some(&2));
        assert_eq!(global.get("Academic"), Some(&1));

        let scoped = db.count_by_category(Some(uid)).unwrap();
        assert_eq!(scoped.get("Hostel"), Some(&1));

        let by_status = db.count_by_status(Some(uid)).unwrap();
        assert_eq!(by_status, vec![(Status::New, 2)]);
    }

    #[test]
    fn test_update_rejects_stale_status() {
        let (db, uid, admin) = setup();
        let snapshot = db
            .insert_complaint(&draft("Lift", "Infrastructure", Some(uid)), None, None, Utc::now())
            .unwrap();

        let mut assigned = snapshot.clone();
        assigned.status = Status::InProgress;
        assigned.assigned_to = db.get_user(admin).unwrap();
        db.update_complaint(&assigned, Status::New, None).unwrap();

        let mut escalated = snapshot;
        escalated.status = Status::Escalated;
        let entry = NewTimelineEntry::system("ESCALATED", "late");
        let err = db
            .update_complaint(&escalated, Status::New, Some(&entry))
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let stored = db.get_complaint(escalated.complaint_id).unwrap().unwrap();
        assert_eq!(stored.status, Status::InProgress);
        assert_eq!(stored.assigned_to.map(|u| u.id), Some(admin));
        assert!(db.list_timeline(stored.complaint_id).unwrap().is_empty());
    }

    #[test]
    fn test_failed_attachment_rolls_back_complaint() {
        let (db, uid, _) = setup();
        let broken = NewAttachment {
            file_name: "a.png".into(),
            file_path: "/tmp/a.png".into(),
            file_type: None,
            file_size: 1,
        };
        db.with_conn(|conn| {
            conn.execute_batch("DROP TABLE attachments")?;
            Ok(())
        })
        .unwrap();

        let entry = NewTimelineEntry::system("NEW", "Complaint submitted with evidence.");
        assert!(db
            .insert_complaint(
                &draft("x", "General", Some(uid)),
                Some(&entry),
                Some(&broken),
                Utc::now(),
            )
            .is_err());
        assert!(db.list_complaints().unwrap().is_empty());
    }

    #[test]
    fn test_get_timeline_entry() {
        let (db, uid, _) = setup();
        let now = Utc::now();
        let c = db
            .insert_complaint(&draft("x", "General", Some(uid)), None, None, now)
            .unwrap();
        let id = db
            .insert_timeline_entry(
                c.complaint_id,
                &NewTimelineEntry::system("NEW", "hello").by(uid),
                now,
            )
            .unwrap();

        let entry = db.get_timeline_entry(id).unwrap().unwrap();
        assert_eq!(entry.comment.as_deref(), Some("hello"));
        assert_eq!(entry.updated_by.map(|u| u.id), Some(uid));
        assert!(db.get_timeline_entry(id + 100).unwrap().is_none());
    }
}
