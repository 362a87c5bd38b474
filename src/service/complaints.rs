//! Complaint lifecycle operations
//!
//! Every state change persists the complaint and its timeline entry in one
//! transaction, then hands notices to the configured `Notifier`. The write is
//! conditional on the status the change was checked against, so a complaint
//! that moved on in between is left alone.
//!
//! Visibility rules:
//! - staff (ADMIN, SENIOR_ADMIN) read everything
//! - everyone else reads only complaints they submitted, and only the public
//!   part of the timeline
//! - the submitter of an anonymous complaint is hidden from non-staff readers
//!   other than the submitter

use crate::auth::is_valid_email;
use crate::service::lifecycle::{next_status, Action};
use crate::service::notifier::{Notice, Notifier};
use crate::service::{ServiceError, ServiceResult};
use crate::store::{
    Attachment, Complaint, ComplaintDraft, ComplaintUpdate, Database, NewAttachment,
    NewComplaint, NewTimelineEntry, NotificationType, Priority, Stats, Status, StoreError,
    TimelineEntry, User,
};
use chrono::{DateTime, Duration, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

const MAX_TITLE_LEN: usize = 200;
const MAX_CATEGORY_LEN: usize = 50;
const DEFAULT_CATEGORY: &str = "General";

/// Lifecycle settings
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Age after which NEW/UNDER_REVIEW complaints escalate
    pub sla_hours: u64,
    /// Extra recipient of every escalation notice
    pub senior_admin_email: String,
    /// Where evidence files are written
    pub upload_dir: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            sla_hours: 48,
            senior_admin_email: "senior-admin@resolveit.com".to_string(),
            upload_dir: PathBuf::from("./data/uploads"),
        }
    }
}

/// Evidence file sent with a new complaint
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Complaint lifecycle service
pub struct ComplaintService {
    db: Arc<Database>,
    notifier: Arc<dyn Notifier>,
    config: ServiceConfig,
}

fn forbidden() -> ServiceError {
    ServiceError::Forbidden("You do not have access to this complaint".to_string())
}

fn require_staff(actor: &User) -> ServiceResult<()> {
    if actor.role.is_staff() {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(
            "This action requires an administrator".to_string(),
        ))
    }
}

fn transition(complaint: &Complaint, action: Action) -> ServiceResult<Status> {
    next_status(complaint.status, action).ok_or(ServiceError::InvalidTransition {
        from: complaint.status,
        action,
    })
}

/// Trimmed, non-empty text or None
fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

/// Keep only the final path component and a safe character set
fn sanitize_file_name(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim_matches('.').is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

impl ComplaintService {
    pub fn new(db: Arc<Database>, notifier: Arc<dyn Notifier>, config: ServiceConfig) -> Self {
        Self {
            db,
            notifier,
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn load(&self, id: i64) -> ServiceResult<Complaint> {
        self.db
            .get_complaint(id)?
            .ok_or_else(|| ServiceError::NotFound(format!("Complaint {} not found", id)))
    }

    /// Load a complaint the actor may act on as owner or staff
    fn load_for(&self, actor: &User, id: i64) -> ServiceResult<Complaint> {
        let complaint = self.load(id)?;
        if actor.role.is_staff() || complaint.is_owned_by(actor.id) {
            Ok(complaint)
        } else {
            Err(forbidden())
        }
    }

    /// Hide the submitter of an anonymous complaint from non-staff readers
    fn present(&self, mut complaint: Complaint, viewer: &User) -> Complaint {
        if complaint.is_anonymous && !viewer.role.is_staff() && !complaint.is_owned_by(viewer.id) {
            complaint.user = None;
        }
        complaint
    }

    async fn send(
        &self,
        recipient: Option<String>,
        complaint_id: i64,
        kind: NotificationType,
        title: &str,
        message: String,
    ) {
        if let Some(recipient) = recipient {
            self.notifier
                .notify(Notice::new(recipient, complaint_id, kind, title, message))
                .await;
        }
    }

    async fn store_upload(&self, upload: &Upload) -> ServiceResult<NewAttachment> {
        tokio::fs::create_dir_all(&self.config.upload_dir)
            .await
            .map_err(StoreError::from)?;

        let file_name = sanitize_file_name(&upload.file_name);
        let path = self
            .config
            .upload_dir
            .join(format!("{}-{}", Uuid::new_v4().simple(), file_name));
        tokio::fs::write(&path, &upload.bytes)
            .await
            .map_err(StoreError::from)?;

        Ok(NewAttachment {
            file_name,
            file_path: path.to_string_lossy().into_owned(),
            file_type: upload.content_type.clone(),
            file_size: upload.bytes.len() as i64,
        })
    }

    /// Submit a new complaint, optionally with one evidence file
    pub async fn create(
        &self,
        actor: &User,
        draft: ComplaintDraft,
        upload: Option<Upload>,
    ) -> ServiceResult<Complaint> {
        let title = draft.title.trim().to_string();
        let description = draft.description.trim().to_string();
        let category = non_blank(draft.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        if title.is_empty() || description.is_empty() {
            return Err(ServiceError::Validation(
                "Title and description are required".to_string(),
            ));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(ServiceError::Validation(format!(
                "Title must be at most {} characters",
                MAX_TITLE_LEN
            )));
        }
        if category.chars().count() > MAX_CATEGORY_LEN {
            return Err(ServiceError::Validation(format!(
                "Category must be at most {} characters",
                MAX_CATEGORY_LEN
            )));
        }

        let anonymous_email = if draft.is_anonymous {
            non_blank(draft.anonymous_email)
        } else {
            None
        };
        if let Some(email) = &anonymous_email {
            if !is_valid_email(email) {
                return Err(ServiceError::Validation(
                    "Contact email is not valid".to_string(),
                ));
            }
        }

        let attachment = match upload.as_ref().filter(|u| !u.bytes.is_empty()) {
            Some(upload) => Some(self.store_upload(upload).await?),
            None => None,
        };

        let first_entry = NewTimelineEntry::system(
            Status::New.as_str(),
            if attachment.is_some() {
                "Complaint submitted with evidence."
            } else {
                "Complaint submitted."
            },
        )
        .by(actor.id);

        let now = Utc::now();
        let inserted = self.db.insert_complaint(
            &NewComplaint {
                title,
                description,
                category,
                priority: draft.priority.unwrap_or_default(),
                is_anonymous: draft.is_anonymous,
                anonymous_email,
                user_id: Some(actor.id),
            },
            Some(&first_entry),
            attachment.as_ref(),
            now,
        );

        let complaint = match inserted {
            Ok(complaint) => complaint,
            Err(e) => {
                if let Some(attachment) = &attachment {
                    let _ = tokio::fs::remove_file(&attachment.file_path).await;
                }
                return Err(e.into());
            }
        };

        tracing::info!(
            complaint_id = complaint.complaint_id,
            user_id = actor.id,
            category = %complaint.category,
            anonymous = complaint.is_anonymous,
            with_evidence = attachment.is_some(),
            "Complaint submitted"
        );

        let message = if attachment.is_some() {
            format!(
                "Your complaint #{} has been received with evidence.",
                complaint.complaint_id
            )
        } else {
            format!("Your complaint #{} has been received.", complaint.complaint_id)
        };
        self.send(
            complaint.contact_email(),
            complaint.complaint_id,
            NotificationType::Submission,
            "Complaint Submitted",
            message,
        )
        .await;

        Ok(complaint)
    }

    /// One complaint, for its owner or staff
    pub fn get(&self, actor: &User, id: i64) -> ServiceResult<Complaint> {
        let complaint = self.load_for(actor, id)?;
        Ok(self.present(complaint, actor))
    }

    /// Every complaint, newest first (staff)
    pub fn list_all(&self, actor: &User) -> ServiceResult<Vec<Complaint>> {
        require_staff(actor)?;
        Ok(self
            .db
            .list_complaints()?
            .into_iter()
            .map(|c| self.present(c, actor))
            .collect())
    }

    /// Complaints the actor submitted, newest first
    pub fn list_mine(&self, actor: &User) -> ServiceResult<Vec<Complaint>> {
        Ok(self.db.list_complaints_by_user(actor.id)?)
    }

    /// Staff edit of fields and status
    pub async fn update(
        &self,
        actor: &User,
        id: i64,
        update: ComplaintUpdate,
    ) -> ServiceResult<Complaint> {
        require_staff(actor)?;
        let mut complaint = self.load(id)?;

        if let Some(title) = non_blank(update.title) {
            if title.chars().count() > MAX_TITLE_LEN {
                return Err(ServiceError::Validation(format!(
                    "Title must be at most {} characters",
                    MAX_TITLE_LEN
                )));
            }
            complaint.title = title;
        }
        if let Some(description) = non_blank(update.description) {
            complaint.description = description;
        }
        if let Some(category) = non_blank(update.category) {
            if category.chars().count() > MAX_CATEGORY_LEN {
                return Err(ServiceError::Validation(format!(
                    "Category must be at most {} characters",
                    MAX_CATEGORY_LEN
                )));
            }
            complaint.category = category;
        }
        if let Some(priority) = update.priority {
            complaint.priority = priority;
        }

        let now = Utc::now();
        let previous = complaint.status;
        let entry = match update.status {
            Some(status) if status != previous => {
                complaint.status = status;
                complaint.resolved_at = match status {
                    Status::Resolved | Status::Closed => complaint.resolved_at.or(Some(now)),
                    _ => None,
                };
                Some(
                    NewTimelineEntry::system(
                        status.as_str(),
                        format!("Status updated to {}", status),
                    )
                    .by(actor.id),
                )
            }
            _ => None,
        };
        complaint.updated_at = now;
        self.db.update_complaint(&complaint, previous, entry.as_ref())?;

        tracing::info!(
            complaint_id = id,
            by = actor.id,
            from = %previous,
            to = %complaint.status,
            "Complaint updated"
        );

        if entry.is_some() {
            self.send(
                complaint.contact_email(),
                id,
                NotificationType::StatusUpdate,
                "Complaint Status Updated",
                format!(
                    "The status of your complaint #{} is now {}.",
                    id, complaint.status
                ),
            )
            .await;
        }

        self.get(actor, id)
    }

    /// History of a complaint, newest first. Non-staff see public entries only.
    pub fn timeline(&self, actor: &User, id: i64) -> ServiceResult<Vec<TimelineEntry>> {
        self.load_for(actor, id)?;
        let entries = self.db.list_timeline(id)?;
        if actor.role.is_staff() {
            Ok(entries)
        } else {
            Ok(entries.into_iter().filter(|e| e.is_public).collect())
        }
    }

    pub fn attachments(&self, actor: &User, id: i64) -> ServiceResult<Vec<Attachment>> {
        self.load_for(actor, id)?;
        Ok(self.db.list_attachments(id)?)
    }

    /// Assign to a staff member; moves the complaint to IN_PROGRESS
    pub async fn assign(&self, actor: &User, id: i64, assignee_id: i64) -> ServiceResult<Complaint> {
        require_staff(actor)?;
        let mut complaint = self.load(id)?;
        let previous = complaint.status;
        let status = transition(&complaint, Action::Assign)?;

        let assignee = self
            .db
            .get_user(assignee_id)?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", assignee_id)))?;
        if !assignee.role.is_staff() {
            return Err(ServiceError::Validation(
                "Complaints can only be assigned to staff".to_string(),
            ));
        }

        complaint.status = status;
        complaint.assigned_to = Some(assignee.clone());
        complaint.updated_at = Utc::now();
        let entry = NewTimelineEntry::system(
            status.as_str(),
            format!("Complaint assigned to {}", assignee.name),
        )
        .by(actor.id);
        self.db.update_complaint(&complaint, previous, Some(&entry))?;

        tracing::info!(complaint_id = id, assignee = assignee.id, by = actor.id, "Complaint assigned");

        self.send(
            complaint.contact_email(),
            id,
            NotificationType::Assignment,
            "Technician Assigned",
            format!(
                "Your complaint #{} has been assigned to {}",
                id, assignee.name
            ),
        )
        .await;
        self.send(
            Some(assignee.email.clone()),
            id,
            NotificationType::Assignment,
            "New Complaint Assigned",
            format!("You have been assigned a new complaint: #{}", id),
        )
        .await;

        self.get(actor, id)
    }

    /// Add a comment without changing status. Comments by non-staff are
    /// always public.
    pub async fn comment(
        &self,
        actor: &User,
        id: i64,
        text: &str,
        is_public: bool,
    ) -> ServiceResult<TimelineEntry> {
        let complaint = self.load_for(actor, id)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(ServiceError::Validation("Comment cannot be empty".to_string()));
        }

        let is_staff = actor.role.is_staff();
        let is_public = is_public || !is_staff;
        let entry = NewTimelineEntry {
            status: complaint.status.as_str().to_string(),
            comment: Some(text.to_string()),
            is_public,
            updated_by: Some(actor.id),
        };
        let entry_id = self.db.insert_timeline_entry(id, &entry, Utc::now())?;

        tracing::info!(complaint_id = id, by = actor.id, public = is_public, "Comment added");

        if is_staff && is_public && !complaint.is_owned_by(actor.id) {
            self.send(
                complaint.contact_email(),
                id,
                NotificationType::Comment,
                "New Comment on Your Complaint",
                format!("{} commented on complaint #{}: {}", actor.name, id, text),
            )
            .await;
        } else if !is_staff {
            if let Some(assignee) = &complaint.assigned_to {
                self.send(
                    Some(assignee.email.clone()),
                    id,
                    NotificationType::Comment,
                    "New Comment on Assigned Complaint",
                    format!("The submitter commented on complaint #{}: {}", id, text),
                )
                .await;
            }
        }

        self.db
            .get_timeline_entry(entry_id)?
            .ok_or_else(|| ServiceError::NotFound(format!("Timeline entry {} not found", entry_id)))
    }

    /// Mark resolved and stamp `resolved_at`
    pub async fn resolve(
        &self,
        actor: &User,
        id: i64,
        comment: Option<String>,
    ) -> ServiceResult<Complaint> {
        require_staff(actor)?;
        let mut complaint = self.load(id)?;
        let previous = complaint.status;
        let status = transition(&complaint, Action::Resolve)?;

        let now = Utc::now();
        complaint.status = status;
        complaint.resolved_at = Some(now);
        complaint.updated_at = now;
        let entry = NewTimelineEntry::system(
            status.as_str(),
            non_blank(comment).unwrap_or_else(|| "Grievance has been resolved.".to_string()),
        )
        .by(actor.id);
        self.db.update_complaint(&complaint, previous, Some(&entry))?;

        tracing::info!(complaint_id = id, by = actor.id, "Complaint resolved");

        self.send(
            complaint.contact_email(),
            id,
            NotificationType::Resolution,
            "Grievance Resolved",
            format!(
                "Your grievance #{} has been marked as resolved. Please review the solution.",
                id
            ),
        )
        .await;

        self.get(actor, id)
    }

    /// Owner acknowledges a resolution
    pub async fn close(
        &self,
        actor: &User,
        id: i64,
        comment: Option<String>,
    ) -> ServiceResult<Complaint> {
        let mut complaint = self.load_for(actor, id)?;
        let previous = complaint.status;
        let status = transition(&complaint, Action::Close)?;

        complaint.status = status;
        complaint.updated_at = Utc::now();
        let entry = NewTimelineEntry::system(
            status.as_str(),
            non_blank(comment).unwrap_or_else(|| "User acknowledged the resolution.".to_string()),
        )
        .by(actor.id);
        self.db.update_complaint(&complaint, previous, Some(&entry))?;

        tracing::info!(complaint_id = id, by = actor.id, "Complaint closed");

        if let Some(assignee) = &complaint.assigned_to {
            self.send(
                Some(assignee.email.clone()),
                id,
                NotificationType::StatusUpdate,
                "Complaint Closed",
                format!("Complaint #{} has been closed.", id),
            )
            .await;
        }

        self.get(actor, id)
    }

    /// Owner rejects a resolution; back to IN_PROGRESS
    pub async fn reopen(&self, actor: &User, id: i64, reason: &str) -> ServiceResult<Complaint> {
        let mut complaint = self.load_for(actor, id)?;
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ServiceError::Validation(
                "A reason is required to reopen".to_string(),
            ));
        }
        let previous = complaint.status;
        let status = transition(&complaint, Action::Reopen)?;

        complaint.status = status;
        complaint.resolved_at = None;
        complaint.updated_at = Utc::now();
        let entry =
            NewTimelineEntry::system("REOPENED", format!("Grievance reopened: {}", reason))
                .by(actor.id);
        self.db.update_complaint(&complaint, previous, Some(&entry))?;

        tracing::info!(complaint_id = id, by = actor.id, "Complaint reopened");

        if let Some(assignee) = &complaint.assigned_to {
            self.send(
                Some(assignee.email.clone()),
                id,
                NotificationType::StatusUpdate,
                "Complaint Reopened",
                format!("Complaint #{} was reopened: {}", id, reason),
            )
            .await;
        }

        self.get(actor, id)
    }

    /// Remove a complaint, its history and its evidence files (staff)
    pub async fn delete(&self, actor: &User, id: i64) -> ServiceResult<()> {
        require_staff(actor)?;
        let attachments = self.db.list_attachments(id)?;
        if !self.db.delete_complaint(id)? {
            return Err(ServiceError::NotFound(format!("Complaint {} not found", id)));
        }

        for attachment in attachments {
            if let Err(e) = tokio::fs::remove_file(&attachment.file_path).await {
                tracing::warn!(
                    path = %attachment.file_path,
                    error = %e,
                    "Failed to remove attachment file"
                );
            }
        }

        tracing::info!(complaint_id = id, by = actor.id, "Complaint deleted");
        Ok(())
    }

    /// Global statistics for staff, own-complaint statistics otherwise
    pub fn stats(&self, actor: &User) -> ServiceResult<Stats> {
        let scope = if actor.role.is_staff() {
            None
        } else {
            Some(actor.id)
        };
        let by_status = self.db.count_by_status(scope)?;
        let categories = self.db.count_by_category(scope)?;
        Ok(Stats::from_counts(&by_status, categories))
    }

    /// CSV report of every complaint (staff)
    pub fn export_csv(&self, actor: &User) -> ServiceResult<String> {
        require_staff(actor)?;
        let complaints = self.db.list_complaints()?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        let csv_err = |e: csv::Error| ServiceError::Store(StoreError::Io(e.into()));

        writer
            .write_record([
                "ID",
                "Title",
                "Category",
                "Status",
                "Priority",
                "CreatedAt",
                "ResolvedAt",
                "User",
                "AssignedTo",
            ])
            .map_err(csv_err)?;

        for c in &complaints {
            let user = if c.is_anonymous {
                "Anonymous".to_string()
            } else {
                c.user.as_ref().map(|u| u.email.clone()).unwrap_or_default()
            };
            writer
                .write_record([
                    c.complaint_id.to_string(),
                    c.title.clone(),
                    c.category.clone(),
                    c.status.to_string(),
                    c.priority.to_string(),
                    c.created_at.to_rfc3339(),
                    c.resolved_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
                    user,
                    c.assigned_to
                        .as_ref()
                        .map(|u| u.name.clone())
                        .unwrap_or_default(),
                ])
                .map_err(csv_err)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ServiceError::Store(StoreError::Io(e.into_error())))?;
        tracing::info!(rows = complaints.len(), by = actor.id, "Exported complaints");
        String::from_utf8(bytes).map_err(|e| {
            ServiceError::Store(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                e,
            )))
        })
    }

    /// Escalate every NEW or UNDER_REVIEW complaint older than the SLA.
    /// Returns how many complaints were escalated.
    pub async fn check_and_escalate(&self, now: DateTime<Utc>) -> ServiceResult<usize> {
        let cutoff = now - Duration::hours(self.config.sla_hours as i64);
        let stale = self
            .db
            .find_stale_complaints(&[Status::New, Status::UnderReview], cutoff)?;

        let mut escalated = 0;
        for complaint in stale {
            let id = complaint.complaint_id;
            match self.escalate(complaint, now).await {
                Ok(true) => escalated += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(complaint_id = id, error = %e, "Failed to escalate complaint")
                }
            }
        }

        if escalated > 0 {
            tracing::info!(count = escalated, "Escalation sweep finished");
        }
        Ok(escalated)
    }

    /// Escalate one complaint as read by the sweep. Returns false when it
    /// cannot escalate or changed since it was read.
    async fn escalate(&self, mut complaint: Complaint, now: DateTime<Utc>) -> ServiceResult<bool> {
        let sla_hours = self.config.sla_hours;
        let Some(status) = next_status(complaint.status, Action::Escalate) else {
            return Ok(false);
        };
        let id = complaint.complaint_id;
        let previous = complaint.status;

        complaint.status = status;
        complaint.priority = Priority::Critical;
        complaint.updated_at = now;
        let entry = NewTimelineEntry::system(
            status.as_str(),
            format!(
                "Automatically escalated due to SLA breach ({}h).",
                sla_hours
            ),
        );
        match self.db.update_complaint(&complaint, previous, Some(&entry)) {
            Ok(()) => {}
            Err(StoreError::Conflict(_)) => {
                tracing::debug!(complaint_id = id, "Complaint changed before escalation, skipping");
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        }
        tracing::warn!(complaint_id = id, sla_hours, "Complaint escalated after SLA breach");

        self.send(
            complaint.contact_email(),
            id,
            NotificationType::Escalation,
            "Complaint Escalated",
            format!(
                "Your complaint #{} has been escalated to senior management for priority resolution.",
                id
            ),
        )
        .await;
        if let Some(assignee) = &complaint.assigned_to {
            self.send(
                Some(assignee.email.clone()),
                id,
                NotificationType::Escalation,
                "Complaint Escalated - Urgency Critical",
                format!(
                    "A complaint assigned to you (#{}) has been escalated due to SLA breach.",
                    id
                ),
            )
            .await;
        }
        self.send(
            non_blank(Some(self.config.senior_admin_email.clone())),
            id,
            NotificationType::Escalation,
            &format!("Urgent: ESCALATION #{}", id),
            format!(
                "A complaint has breached the {}h SLA and requires immediate attention.",
                sla_hours
            ),
        )
        .await;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Role;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::{tempdir, TempDir};

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<Notice>>,
    }

    impl RecordingNotifier {
        fn recipients(&self) -> Vec<String> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .map(|n| n.recipient.clone())
                .collect()
        }

        fn clear(&self) {
            self.sent.lock().unwrap().clear();
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, notice: Notice) {
            self.sent.lock().unwrap().push(notice);
        }
    }

    struct Fixture {
        service: ComplaintService,
        notifier: Arc<RecordingNotifier>,
        db: Arc<Database>,
        student: User,
        other: User,
        admin: User,
        _dir: TempDir,
    }

    fn fixture() -> Fixture {
        let dir = tempdir().unwrap();
        let db = Arc::new(Database::open_in_memory().unwrap());
        let now = Utc::now();
        let student = db
            .create_user("Student", "student@example.com", "h", Role::User, now)
            .unwrap();
        let other = db
            .create_user("Other", "other@example.com", "h", Role::User, now)
            .unwrap();
        let admin = db
            .create_user("Admin", "admin@example.com", "h", Role::Admin, now)
            .unwrap();
        let notifier = Arc::new(RecordingNotifier::default());
        let service = ComplaintService::new(
            db.clone(),
            notifier.clone(),
            ServiceConfig {
                sla_hours: 48,
                senior_admin_email: "senior@example.com".to_string(),
                upload_dir: dir.path().join("uploads"),
            },
        );
        Fixture {
            service,
            notifier,
            db,
            student,
            other,
            admin,
            _dir: dir,
        }
    }

    fn draft(title: &str) -> ComplaintDraft {
        ComplaintDraft {
            title: title.to_string(),
            description: "It is broken".to_string(),
            category: Some("Hostel".to_string()),
            priority: Some(Priority::High),
            is_anonymous: false,
            anonymous_email: None,
        }
    }

    #[tokio::test]
    async fn test_create_records_timeline_and_notifies() {
        let f = fixture();
        let complaint = f
            .service
            .create(&f.student, draft("Fan broken"), None)
            .await
            .unwrap();

        assert_eq!(complaint.status, Status::New);
        assert_eq!(complaint.priority, Priority::High);
        let timeline = f.service.timeline(&f.student, complaint.complaint_id).unwrap();
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].comment.as_deref(), Some("Complaint submitted."));
        assert_eq!(f.notifier.recipients(), vec!["student@example.com"]);
    }

    #[tokio::test]
    async fn test_create_validation_and_defaults() {
        let f = fixture();
        let mut bad = draft("   ");
        assert!(matches!(
            f.service.create(&f.student, bad.clone(), None).await,
            Err(ServiceError::Validation(_))
        ));

        bad.title = "x".repeat(201);
        assert!(matches!(
            f.service.create(&f.student, bad, None).await,
            Err(ServiceError::Validation(_))
        ));

        let mut plain = draft("No category");
        plain.category = Some("  ".to_string());
        plain.priority = None;
        let complaint = f.service.create(&f.student, plain, None).await.unwrap();
        assert_eq!(complaint.category, "General");
        assert_eq!(complaint.priority, Priority::Medium);
    }

    #[tokio::test]
    async fn test_create_with_evidence() {
        let f = fixture();
        let upload = Upload {
            file_name: "../../etc/photo 1.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![1, 2, 3, 4],
        };
        let complaint = f
            .service
            .create(&f.student, draft("Leak"), Some(upload))
            .await
            .unwrap();

        let attachments = f
            .service
            .attachments(&f.student, complaint.complaint_id)
            .unwrap();
        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].file_name, "photo_1.png");
        assert_eq!(attachments[0].file_size, 4);
        assert!(Path::new(&attachments[0].file_path).starts_with(&f.service.config().upload_dir));
        assert!(Path::new(&attachments[0].file_path).exists());

        let timeline = f.service.timeline(&f.admin, complaint.complaint_id).unwrap();
        assert_eq!(
            timeline[0].comment.as_deref(),
            Some("Complaint submitted with evidence.")
        );

        f.service.delete(&f.admin, complaint.complaint_id).await.unwrap();
        assert!(!Path::new(&attachments[0].file_path).exists());
    }

    #[tokio::test]
    async fn test_anonymous_complaint_keeps_contact_private() {
        let f = fixture();
        let mut anon = draft("Harassment");
        anon.is_anonymous = true;
        anon.anonymous_email = Some("tips@example.com".to_string());
        let complaint = f.service.create(&f.student, anon, None).await.unwrap();
        let id = complaint.complaint_id;

        assert_eq!(f.notifier.recipients(), vec!["tips@example.com"]);
        assert!(f.service.get(&f.student, id).unwrap().user.is_some());
        assert_eq!(f.service.list_mine(&f.student).unwrap().len(), 1);

        let csv = f.service.export_csv(&f.admin).unwrap();
        assert!(csv.lines().nth(1).unwrap().contains(",Anonymous,"));
    }

    #[tokio::test]
    async fn test_permissions() {
        let f = fixture();
        let complaint = f.service.create(&f.student, draft("Mine"), None).await.unwrap();
        let id = complaint.complaint_id;

        assert!(matches!(f.service.get(&f.other, id), Err(ServiceError::Forbidden(_))));
        assert!(matches!(f.service.timeline(&f.other, id), Err(ServiceError::Forbidden(_))));
        assert!(matches!(f.service.list_all(&f.student), Err(ServiceError::Forbidden(_))));
        assert!(matches!(f.service.export_csv(&f.student), Err(ServiceError::Forbidden(_))));
        assert!(matches!(
            f.service.resolve(&f.student, id, None).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            f.service.delete(&f.student, id).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(f.service.get(&f.admin, 999), Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_full_lifecycle() {
        let f = fixture();
        let id = f
            .service
            .create(&f.student, draft("Projector"), None)
            .await
            .unwrap()
            .complaint_id;
        f.notifier.clear();

        let assigned = f.service.assign(&f.admin, id, f.admin.id).await.unwrap();
        assert_eq!(assigned.status, Status::InProgress);
        assert_eq!(assigned.assigned_to.as_ref().map(|u| u.id), Some(f.admin.id));
        assert_eq!(
            f.notifier.recipients(),
            vec!["student@example.com", "admin@example.com"]
        );

        let resolved = f.service.resolve(&f.admin, id, None).await.unwrap();
        assert_eq!(resolved.status, Status::Resolved);
        assert!(resolved.resolved_at.is_some());

        assert!(matches!(
            f.service.assign(&f.admin, id, f.admin.id).await,
            Err(ServiceError::InvalidTransition { from: Status::Resolved, action: Action::Assign })
        ));

        let reopened = f.service.reopen(&f.student, id, "Still broken").await.unwrap();
        assert_eq!(reopened.status, Status::InProgress);
        assert!(reopened.resolved_at.is_none());

        f.service
            .resolve(&f.admin, id, Some("Replaced bulb".into()))
            .await
            .unwrap();
        let closed = f.service.close(&f.student, id, None).await.unwrap();
        assert_eq!(closed.status, Status::Closed);

        let labels: Vec<_> = f
            .service
            .timeline(&f.student, id)
            .unwrap()
            .into_iter()
            .map(|e| e.status)
            .collect();
        assert_eq!(
            labels,
            vec!["CLOSED", "RESOLVED", "REOPENED", "RESOLVED", "IN_PROGRESS", "NEW"]
        );

        let timeline = f.service.timeline(&f.admin, id).unwrap();
        assert_eq!(
            timeline[2].comment.as_deref(),
            Some("Grievance reopened: Still broken")
        );
        assert_eq!(timeline[0].comment.as_deref(), Some("User acknowledged the resolution."));
    }

    #[tokio::test]
    async fn test_close_and_reopen_require_resolved() {
        let f = fixture();
        let id = f.service.create(&f.student, draft("x"), None).await.unwrap().complaint_id;
        assert!(matches!(
            f.service.close(&f.student, id, None).await,
            Err(ServiceError::InvalidTransition { .. })
        ));
        assert!(matches!(
            f.service.reopen(&f.student, id, "why").await,
            Err(ServiceError::InvalidTransition { .. })
        ));
        assert!(matches!(
            f.service.reopen(&f.student, id, "  ").await,
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_assign_requires_staff_assignee() {
        let f = fixture();
        let id = f.service.create(&f.student, draft("x"), None).await.unwrap().complaint_id;
        assert!(matches!(
            f.service.assign(&f.admin, id, f.other.id).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            f.service.assign(&f.admin, id, 4040).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_internal_comments_hidden_from_owner() {
        let f = fixture();
        let id = f.service.create(&f.student, draft("x"), None).await.unwrap().complaint_id;
        f.notifier.clear();

        f.service.comment(&f.admin, id, "internal note", false).await.unwrap();
        assert!(f.notifier.recipients().is_empty());
        f.service.comment(&f.admin, id, "we are on it", true).await.unwrap();
        assert_eq!(f.notifier.recipients(), vec!["student@example.com"]);

        let forced = f
            .service
            .comment(&f.student, id, "thanks", false)
            .await
            .unwrap();
        assert!(forced.is_public);
        assert_eq!(forced.updated_by.map(|u| u.id), Some(f.student.id));

        let owner_view = f.service.timeline(&f.student, id).unwrap();
        assert_eq!(owner_view.len(), 3);
        assert!(owner_view.iter().all(|e| e.is_public));
        assert_eq!(f.service.timeline(&f.admin, id).unwrap().len(), 4);

        assert!(matches!(
            f.service.comment(&f.student, id, " ", true).await,
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_status_and_fields() {
        let f = fixture();
        let id = f.service.create(&f.student, draft("x"), None).await.unwrap().complaint_id;

        let updated = f
            .service
            .update(
                &f.admin,
                id,
                ComplaintUpdate {
                    status: Some(Status::UnderReview),
                    priority: Some(Priority::Low),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, Status::UnderReview);
        assert_eq!(updated.priority, Priority::Low);
        assert_eq!(updated.title, "x");

        let timeline = f.service.timeline(&f.admin, id).unwrap();
        assert_eq!(timeline[0].status, "UNDER_REVIEW");
        assert_eq!(timeline[0].comment.as_deref(), Some("Status updated to UNDER_REVIEW"));

        assert!(matches!(
            f.service.update(&f.student, id, ComplaintUpdate::default()).await,
            Err(ServiceError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_stats_scope() {
        let f = fixture();
        let a = f.service.create(&f.student, draft("a"), None).await.unwrap();
        f.service.create(&f.other, draft("b"), None).await.unwrap();
        f.service.resolve(&f.admin, a.complaint_id, None).await.unwrap();

        let global = f.service.stats(&f.admin).unwrap();
        assert_eq!(global.total, 2);
        assert_eq!(global.resolved, 1);
        assert_eq!(global.open, 1);
        assert_eq!(global.categories.get("Hostel"), Some(&2));

        let own = f.service.stats(&f.other).unwrap();
        assert_eq!(own.total, 1);
        assert_eq!(own.resolved, 0);
    }

    #[tokio::test]
    async fn test_export_csv_quotes_fields() {
        let f = fixture();
        f.service
            .create(&f.student, draft("Broken, \"old\" chair"), None)
            .await
            .unwrap();
        let csv = f.service.export_csv(&f.admin).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("ID,Title,Category,Status,Priority,CreatedAt,ResolvedAt,User,AssignedTo")
        );
        let row = lines.next().unwrap();
        assert!(row.contains("\"Broken, \"\"old\"\" chair\""));
        assert!(row.contains("student@example.com"));
    }

    #[tokio::test]
    async fn test_escalation_sweep() {
        let f = fixture();
        let id = f.service.create(&f.student, draft("Old"), None).await.unwrap().complaint_id;
        f.notifier.clear();

        // Inside the SLA nothing happens
        assert_eq!(f.service.check_and_escalate(Utc::now()).await.unwrap(), 0);

        let later = Utc::now() + Duration::hours(49);
        assert_eq!(f.service.check_and_escalate(later).await.unwrap(), 1);

        let complaint = f.db.get_complaint(id).unwrap().unwrap();
        assert_eq!(complaint.status, Status::Escalated);
        assert_eq!(complaint.priority, Priority::Critical);
        assert_eq!(
            f.notifier.recipients(),
            vec!["student@example.com", "senior@example.com"]
        );

        let timeline = f.service.timeline(&f.admin, id).unwrap();
        assert_eq!(
            timeline[0].comment.as_deref(),
            Some("Automatically escalated due to SLA breach (48h).")
        );
        assert!(timeline[0].updated_by.is_none());

        // Already escalated complaints are not picked up again
        assert_eq!(f.service.check_and_escalate(later).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_staff_see_anonymous_submitter() {
        let f = fixture();
        let mut anon = draft("Ragging");
        anon.is_anonymous = true;
        let id = f
            .service
            .create(&f.student, anon, None)
            .await
            .unwrap()
            .complaint_id;

        let seen = f.service.get(&f.admin, id).unwrap();
        assert_eq!(seen.user.map(|u| u.id), Some(f.student.id));
        let listed = f.service.list_all(&f.admin).unwrap();
        assert_eq!(listed[0].user.as_ref().map(|u| u.id), Some(f.student.id));

        let assigned = f.service.assign(&f.admin, id, f.admin.id).await.unwrap();
        assert!(assigned.user.is_some());

        // A plain user reading someone else's complaint is refused outright
        assert!(matches!(f.service.get(&f.other, id), Err(ServiceError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_escalation_skips_complaint_assigned_meanwhile() {
        let f = fixture();
        let id = f
            .service
            .create(&f.student, draft("Old"), None)
            .await
            .unwrap()
            .complaint_id;
        let later = Utc::now() + Duration::hours(49);
        let snapshot = f
            .db
            .find_stale_complaints(&[Status::New, Status::UnderReview], later)
            .unwrap()
            .remove(0);

        f.service.assign(&f.admin, id, f.admin.id).await.unwrap();
        f.notifier.clear();

        assert!(!f.service.escalate(snapshot, later).await.unwrap());
        let stored = f.db.get_complaint(id).unwrap().unwrap();
        assert_eq!(stored.status, Status::InProgress);
        assert_eq!(stored.priority, Priority::High);
        assert_eq!(stored.assigned_to.map(|u| u.id), Some(f.admin.id));
        assert!(f.notifier.recipients().is_empty());
        assert_eq!(f.service.timeline(&f.admin, id).unwrap()[0].status, "IN_PROGRESS");
    }

    #[tokio::test]
    async fn test_concurrent_resolves_record_once() {
        let f = fixture();
        let id = f
            .service
            .create(&f.student, draft("Heater"), None)
            .await
            .unwrap()
            .complaint_id;

        let (a, b) = tokio::join!(
            f.service.resolve(&f.admin, id, Some("first".into())),
            f.service.resolve(&f.admin, id, Some("second".into())),
        );
        assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);

        let resolved = f
            .service
            .timeline(&f.admin, id)
            .unwrap()
            .into_iter()
            .filter(|e| e.status == "RESOLVED")
            .count();
        assert_eq!(resolved, 1);
    }

    #[tokio::test]
    async fn test_stale_lifecycle_write_is_rejected() {
        let f = fixture();
        let id = f
            .service
            .create(&f.student, draft("Door"), None)
            .await
            .unwrap()
            .complaint_id;
        let mut snapshot = f.db.get_complaint(id).unwrap().unwrap();

        f.service.resolve(&f.admin, id, None).await.unwrap();

        snapshot.status = Status::InProgress;
        let err = f.db.update_complaint(&snapshot, Status::New, None).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(f.db.get_complaint(id).unwrap().unwrap().status, Status::Resolved);
    }

    #[tokio::test]
    async fn test_failed_submission_leaves_nothing_behind() {
        let f = fixture();
        f.db.with_conn(|conn| {
            conn.execute_batch("DROP TABLE attachments")?;
            Ok(())
        })
        .unwrap();

        let upload = Upload {
            file_name: "photo.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![9, 9, 9],
        };
        assert!(f
            .service
            .create(&f.student, draft("Leak"), Some(upload))
            .await
            .is_err());

        assert!(f.service.list_mine(&f.student).unwrap().is_empty());
        assert!(f.notifier.recipients().is_empty());
        let upload_dir = &f.service.config().upload_dir;
        assert_eq!(std::fs::read_dir(upload_dir).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_comment_returns_inserted_entry() {
        let f = fixture();
        let id = f.service.create(&f.student, draft("x"), None).await.unwrap().complaint_id;
        f.service.comment(&f.admin, id, "first", true).await.unwrap();

        let entry = f
            .service
            .comment(&f.admin, id, "second", false)
            .await
            .unwrap();
        assert_eq!(entry.complaint_id, id);
        assert_eq!(entry.comment.as_deref(), Some("second"));
        assert!(!entry.is_public);
        assert_eq!(entry.status, "NEW");
    }
}
