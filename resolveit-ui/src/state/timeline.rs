//! Timeline Mapping
//!
//! Turns audit entries from the API into display items.

use chrono::{DateTime, Local, Utc};

use super::models::{status_label, TimelineEntry};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimelineIcon {
    Document,
    Check,
    Search,
}

impl TimelineIcon {
    pub fn for_status(status: &str) -> Self {
        match status {
            "NEW" => TimelineIcon::Document,
            "RESOLVED" => TimelineIcon::Check,
            _ => TimelineIcon::Search,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            TimelineIcon::Document => "📄",
            TimelineIcon::Check => "✅",
            TimelineIcon::Search => "🔍",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimelineItem {
    pub title: String,
    pub date: String,
    pub icon: TimelineIcon,
    pub content: Option<String>,
    pub is_public: bool,
    pub author: String,
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%d %b %Y, %H:%M").to_string()
}

/// One item per entry, order preserved
pub fn build_timeline(entries: &[TimelineEntry]) -> Vec<TimelineItem> {
    entries
        .iter()
        .map(|entry| TimelineItem {
            title: status_label(&entry.status),
            date: format_timestamp(&entry.timestamp),
            icon: TimelineIcon::for_status(&entry.status),
            content: entry.comment.clone().filter(|c| !c.trim().is_empty()),
            is_public: entry.is_public,
            author: entry
                .updated_by
                .as_ref()
                .map(|u| u.name.clone())
                .unwrap_or_else(|| "System".to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::models::User;
    use chrono::TimeZone;

    fn entry(status: &str, comment: Option<&str>, by: Option<&str>) -> TimelineEntry {
        TimelineEntry {
            status: status.to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 2, 9, 30, 0).unwrap(),
            comment: comment.map(str::to_string),
            is_public: by.is_none(),
            updated_by: by.map(|name| User {
                id: 1,
                name: name.to_string(),
                email: "staff@uni.edu".to_string(),
                role: "ADMIN".to_string(),
            }),
        }
    }

    #[test]
    fn test_build_timeline_maps_fields() {
        let entries = vec![
            entry("RESOLVED", Some("Replaced pipe"), Some("Ravi")),
            entry("UNDER_REVIEW", Some(""), None),
            entry("NEW", Some("Complaint submitted."), None),
        ];
        let items = build_timeline(&entries);

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].title, "RESOLVED");
        assert_eq!(items[0].icon, TimelineIcon::Check);
        assert_eq!(items[0].author, "Ravi");
        assert!(!items[0].is_public);

        assert_eq!(items[1].title, "UNDER REVIEW");
        assert_eq!(items[1].icon, TimelineIcon::Search);
        assert_eq!(items[1].content, None);
        assert_eq!(items[1].author, "System");

        assert_eq!(items[2].icon, TimelineIcon::Document);
        assert_eq!(items[2].date, format_timestamp(&entries[2].timestamp));
    }

    #[test]
    fn test_reopened_label_uses_search_icon() {
        let items = build_timeline(&[entry("REOPENED", Some("Still leaking"), None)]);
        assert_eq!(items[0].icon, TimelineIcon::Search);
        assert_eq!(items[0].content.as_deref(), Some("Still leaking"));
    }
}
