//! Wire Models
//!
//! Records exchanged with the ResolveIT API. Field names follow the API's
//! camelCase JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl User {
    /// ADMIN and SENIOR_ADMIN can manage every complaint
    pub fn is_staff(&self) -> bool {
        matches!(self.role.as_str(), "ADMIN" | "SENIOR_ADMIN")
    }
}

/// Signed-in user and bearer token, kept in memory only
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub complaint_id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub status: String,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub anonymous_email: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub assigned_to: Option<User>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Complaint {
    /// Staff actions stop once a complaint is resolved or closed
    pub fn is_actionable(&self) -> bool {
        !matches!(self.status.as_str(), "RESOLVED" | "CLOSED")
    }

    pub fn is_owned_by(&self, user: &User) -> bool {
        self.user.as_ref().is_some_and(|u| u.id == user.id)
    }
}

/// Body of the `complaint` part when submitting
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub is_anonymous: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anonymous_email: Option<String>,
}

/// Evidence metadata; file contents are not served
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub attachment_id: i64,
    pub file_name: String,
    #[serde(default)]
    pub file_type: Option<String>,
    pub file_size: i64,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default = "default_true")]
    pub is_public: bool,
    #[serde(default)]
    pub updated_by: Option<User>,
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub department: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Student create/update body
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StudentInput {
    pub name: String,
    pub email: String,
    pub department: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub category_id: i64,
    pub category_name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    #[serde(default)]
    pub complaint_id: Option<i64>,
    pub title: String,
    pub message: String,
    pub notification_type: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub open: i64,
    #[serde(default)]
    pub resolved: i64,
    #[serde(default)]
    pub closed: i64,
    #[serde(default)]
    pub escalated: i64,
    #[serde(default)]
    pub categories: BTreeMap<String, i64>,
}

impl Stats {
    /// Resolved share of all complaints, rounded to a whole percent
    pub fn resolution_rate(&self) -> i64 {
        percent(self.resolved, self.total)
    }

    /// (label, count) rows for the by-status chart
    pub fn status_rows(&self) -> Vec<(&'static str, i64)> {
        vec![
            ("Open", self.open),
            ("Resolved", self.resolved),
            ("Closed", self.closed),
            ("Escalated", self.escalated),
        ]
    }
}

/// `part / whole` as a rounded percentage; 0 when `whole` is 0
pub fn percent(part: i64, whole: i64) -> i64 {
    if whole <= 0 {
        0
    } else {
        ((part as f64 / whole as f64) * 100.0).round() as i64
    }
}

/// Status label for display, `UNDER_REVIEW` → `UNDER REVIEW`
pub fn status_label(status: &str) -> String {
    status.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complaint_from_api_json() {
        let json = r#"{
            "complaintId": 7,
            "title": "Leaking tap",
            "description": "Block B",
            "category": "Hostel",
            "priority": "HIGH",
            "status": "UNDER_REVIEW",
            "isAnonymous": true,
            "user": null,
            "assignedTo": {"id": 2, "name": "Ravi", "email": "ravi@uni.edu", "role": "ADMIN"},
            "createdAt": "2024-03-01T10:00:00Z",
            "updatedAt": "2024-03-01T10:00:00Z"
        }"#;
        let complaint: Complaint = serde_json::from_str(json).unwrap();
        assert_eq!(complaint.complaint_id, 7);
        assert!(complaint.is_anonymous);
        assert!(complaint.is_actionable());
        assert!(complaint.assigned_to.unwrap().is_staff());
    }

    #[test]
    fn test_stats_rates() {
        let stats = Stats {
            total: 3,
            open: 1,
            resolved: 2,
            ..Default::default()
        };
        assert_eq!(stats.resolution_rate(), 67);
        assert_eq!(Stats::default().resolution_rate(), 0);
        assert_eq!(percent(1, 8), 13);
        assert_eq!(stats.status_rows()[1], ("Resolved", 2));
    }

    #[test]
    fn test_draft_serialization() {
        let draft = ComplaintDraft {
            title: "Wifi".into(),
            description: "Down".into(),
            category: "General".into(),
            priority: "MEDIUM".into(),
            is_anonymous: false,
            anonymous_email: None,
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["isAnonymous"], false);
        assert!(json.get("anonymousEmail").is_none());
    }

    #[test]
    fn test_status_label() {
        assert_eq!(status_label("IN_PROGRESS"), "IN PROGRESS");
        assert_eq!(status_label("NEW"), "NEW");
    }
}
