//! Core data types for the ResolveIT store
//!
//! These are the records shared by the store, the lifecycle service, the HTTP
//! API and the typed client:
//! - `User` and `Role`: accounts and their authority
//! - `Complaint`, `Status`, `Priority`: the grievance record and its lifecycle
//! - `TimelineEntry`: one audit event in a complaint's history
//! - `Student`, `Category`, `Notification`, `Attachment`: supporting records
//!
//! JSON field names are camelCase to match the browser contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Admin,
    SeniorAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
            Role::SeniorAdmin => "SENIOR_ADMIN",
        }
    }

    /// Case-insensitive parse of the wire name
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "USER" => Some(Role::User),
            "ADMIN" => Some(Role::Admin),
            "SENIOR_ADMIN" => Some(Role::SeniorAdmin),
            _ => None,
        }
    }

    /// Staff may read every complaint and drive the lifecycle
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::SeniorAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complaint priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Critical => "CRITICAL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "LOW" => Some(Priority::Low),
            "MEDIUM" => Some(Priority::Medium),
            "HIGH" => Some(Priority::High),
            "CRITICAL" => Some(Priority::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complaint status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    New,
    UnderReview,
    InProgress,
    Resolved,
    Closed,
    Escalated,
}

impl Default for Status {
    fn default() -> Self {
        Status::New
    }
}

impl Status {
    pub const ALL: [Status; 6] = [
        Status::New,
        Status::UnderReview,
        Status::InProgress,
        Status::Resolved,
        Status::Closed,
        Status::Escalated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::New => "NEW",
            Status::UnderReview => "UNDER_REVIEW",
            Status::InProgress => "IN_PROGRESS",
            Status::Resolved => "RESOLVED",
            Status::Closed => "CLOSED",
            Status::Escalated => "ESCALATED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "NEW" => Some(Status::New),
            "UNDER_REVIEW" => Some(Status::UnderReview),
            "IN_PROGRESS" => Some(Status::InProgress),
            "RESOLVED" => Some(Status::Resolved),
            "CLOSED" => Some(Status::Closed),
            "ESCALATED" => Some(Status::Escalated),
            _ => None,
        }
    }

    /// Counted as "open" in statistics
    pub fn is_open(&self) -> bool {
        matches!(self, Status::New | Status::UnderReview | Status::InProgress)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of notification sent to a recipient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    Submission,
    StatusUpdate,
    Escalation,
    Assignment,
    Resolution,
    Comment,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Submission => "SUBMISSION",
            NotificationType::StatusUpdate => "STATUS_UPDATE",
            NotificationType::Escalation => "ESCALATION",
            NotificationType::Assignment => "ASSIGNMENT",
            NotificationType::Resolution => "RESOLUTION",
            NotificationType::Comment => "COMMENT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SUBMISSION" => Some(NotificationType::Submission),
            "STATUS_UPDATE" => Some(NotificationType::StatusUpdate),
            "ESCALATION" => Some(NotificationType::Escalation),
            "ASSIGNMENT" => Some(NotificationType::Assignment),
            "RESOLUTION" => Some(NotificationType::Resolution),
            "COMMENT" => Some(NotificationType::Comment),
            _ => None,
        }
    }
}

/// Public view of an account. The password hash never leaves the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// A grievance record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub complaint_id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: Priority,
    pub status: Status,
    pub is_anonymous: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anonymous_email: Option<String>,
    /// Submitter; hidden from non-staff readers other than the owner when anonymous
    pub user: Option<User>,
    pub assigned_to: Option<User>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
    /// Owning account id, kept even when `user` is redacted
    #[serde(skip)]
    pub owner_id: Option<i64>,
}

impl Complaint {
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.owner_id == Some(user_id)
    }

    /// Address that should receive notices about this complaint. Anonymous
    /// complaints prefer the contact email given at submission.
    pub fn contact_email(&self) -> Option<String> {
        let anonymous_contact = self
            .anonymous_email
            .as_deref()
            .map(str::trim)
            .filter(|e| self.is_anonymous && !e.is_empty());

        match (anonymous_contact, &self.user) {
            (Some(email), _) => Some(email.to_string()),
            (None, Some(user)) => Some(user.email.clone()),
            (None, None) => None,
        }
    }
}

/// Fields supplied when submitting a complaint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub anonymous_email: Option<String>,
}

/// Staff edit of an existing complaint; absent fields stay unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub status: Option<Status>,
}

/// One audit event in a complaint's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub id: i64,
    pub complaint_id: i64,
    /// Status name or a lifecycle label such as `REOPENED`
    pub status: String,
    #[serde(default)]
    pub comment: Option<String>,
    pub is_public: bool,
    #[serde(default)]
    pub updated_by: Option<User>,
    pub timestamp: DateTime<Utc>,
}

/// Timeline entry before it is stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewTimelineEntry {
    pub status: String,
    pub comment: Option<String>,
    pub is_public: bool,
    pub updated_by: Option<i64>,
}

impl NewTimelineEntry {
    /// Public system entry
    pub fn system(status: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            comment: Some(comment.into()),
            is_public: true,
            updated_by: None,
        }
    }

    /// Builder method: record the author
    pub fn by(mut self, user_id: i64) -> Self {
        self.updated_by = Some(user_id);
        self
    }
}

/// Student directory record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub department: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Student fields for create and update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Complaint category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub category_id: i64,
    pub category_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub is_active: bool,
}

/// In-app notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub recipient: String,
    #[serde(default)]
    pub complaint_id: Option<i64>,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Evidence file attached to a complaint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub attachment_id: i64,
    pub complaint_id: i64,
    pub file_name: String,
    #[serde(skip)]
    pub file_path: String,
    #[serde(default)]
    pub file_type: Option<String>,
    pub file_size: i64,
    pub uploaded_at: DateTime<Utc>,
}

/// Aggregate complaint statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub total: i64,
    pub open: i64,
    pub resolved: i64,
    pub closed: i64,
    pub escalated: i64,
    pub categories: BTreeMap<String, i64>,
}

impl Stats {
    /// Build from per-status and per-category counts
    pub fn from_counts(by_status: &[(Status, i64)], categories: BTreeMap<String, i64>) -> Self {
        let count = |wanted: fn(&Status) -> bool| -> i64 {
            by_status
                .iter()
                .filter(|(s, _)| wanted(s))
                .map(|(_, n)| *n)
                .sum()
        };

        Self {
            total: by_status.iter().map(|(_, n)| *n).sum(),
            open: count(Status::is_open),
            resolved: count(|s| *s == Status::Resolved),
            closed: count(|s| *s == Status::Closed),
            escalated: count(|s| *s == Status::Escalated),
            categories,
        }
    }

    /// Resolved share of all complaints, rounded percent
    pub fn resolution_rate(&self) -> u32 {
        if self.total <= 0 {
            return 0;
        }
        ((self.resolved as f64 / self.total as f64) * 100.0).round() as u32
    }
}

/// Convert stored milliseconds to a UTC timestamp
pub(crate) fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_and_staff() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("SENIOR_ADMIN"), Some(Role::SeniorAdmin));
        assert_eq!(Role::parse("janitor"), None);
        assert!(Role::Admin.is_staff());
        assert!(!Role::User.is_staff());
    }

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&Status::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
        for status in Status::ALL {
            assert_eq!(Status::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_stats_from_counts() {
        let counts = [
            (Status::New, 2),
            (Status::InProgress, 1),
            (Status::Resolved, 3),
            (Status::Closed, 1),
            (Status::Escalated, 1),
        ];
        let stats = Stats::from_counts(&counts, BTreeMap::new());
        assert_eq!(stats.total, 8);
        assert_eq!(stats.open, 3);
        assert_eq!(stats.resolved, 3);
        assert_eq!(stats.escalated, 1);
        assert_eq!(stats.resolution_rate(), 38);
        assert_eq!(Stats::default().resolution_rate(), 0);
    }

    #[test]
    fn test_complaint_json_is_camel_case() {
        let now = Utc::now();
        let complaint = Complaint {
            complaint_id: 1,
            title: "Broken fan".into(),
            description: "Room 4".into(),
            category: "Hostel".into(),
            priority: Priority::High,
            status: Status::New,
            is_anonymous: false,
            anonymous_email: None,
            user: None,
            assigned_to: None,
            created_at: now,
            updated_at: now,
            resolved_at: None,
            owner_id: Some(3),
        };
        let value = serde_json::to_value(&complaint).unwrap();
        assert_eq!(value["complaintId"], 1);
        assert_eq!(value["isAnonymous"], false);
        assert!(value.get("ownerId").is_none());
        assert!(value.get("owner_id").is_none());
    }

    #[test]
    fn test_contact_email_for_anonymous_complaints() {
        let draft_user = User {
            id: 1,
            name: "Imaya".into(),
            email: "imaya@example.com".into(),
            role: Role::User,
        };
        let now = Utc::now();
        let mut complaint = Complaint {
            complaint_id: 1,
            title: "t".into(),
            description: "d".into(),
            category: "General".into(),
            priority: Priority::Medium,
            status: Status::New,
            is_anonymous: true,
            anonymous_email: Some("anon@example.com".into()),
            user: Some(draft_user),
            assigned_to: None,
            created_at: now,
            updated_at: now,
            resolved_at: None,
            owner_id: Some(1),
        };
        assert_eq!(complaint.contact_email().as_deref(), Some("anon@example.com"));
        complaint.anonymous_email = Some("  ".into());
        assert_eq!(complaint.contact_email().as_deref(), Some("imaya@example.com"));
        complaint.user = None;
        assert_eq!(complaint.contact_email(), None);
        complaint.is_anonymous = false;
        complaint.anonymous_email = Some("anon@example.com".into());
        assert_eq!(complaint.contact_email(), None);
    }
}
