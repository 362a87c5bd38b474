//! Complaint status transitions

use crate::store::Status;
use std::fmt;

/// A lifecycle operation that moves a complaint between statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Assign,
    Resolve,
    Close,
    Reopen,
    Escalate,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Assign => "assign",
            Action::Resolve => "resolve",
            Action::Close => "close",
            Action::Reopen => "reopen",
            Action::Escalate => "escalate",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status a complaint moves to, or `None` when `action` is not allowed from `from`
pub fn next_status(from: Status, action: Action) -> Option<Status> {
    match (action, from) {
        (Action::Assign, Status::Resolved | Status::Closed) => None,
        (Action::Assign, _) => Some(Status::InProgress),
        (Action::Resolve, Status::Resolved | Status::Closed) => None,
        (Action::Resolve, _) => Some(Status::Resolved),
        (Action::Close, Status::Resolved) => Some(Status::Closed),
        (Action::Reopen, Status::Resolved) => Some(Status::InProgress),
        (Action::Escalate, Status::New | Status::UnderReview) => Some(Status::Escalated),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_and_resolve_blocked_once_finished() {
        for action in [Action::Assign, Action::Resolve] {
            assert_eq!(next_status(Status::Resolved, action), None);
            assert_eq!(next_status(Status::Closed, action), None);
        }
        assert_eq!(next_status(Status::New, Action::Assign), Some(Status::InProgress));
        assert_eq!(next_status(Status::Escalated, Action::Assign), Some(Status::InProgress));
        assert_eq!(next_status(Status::InProgress, Action::Resolve), Some(Status::Resolved));
    }

    #[test]
    fn test_close_and_reopen_only_from_resolved() {
        assert_eq!(next_status(Status::Resolved, Action::Close), Some(Status::Closed));
        assert_eq!(next_status(Status::Resolved, Action::Reopen), Some(Status::InProgress));
        for from in [Status::New, Status::InProgress, Status::Closed, Status::Escalated] {
            assert_eq!(next_status(from, Action::Close), None);
            assert_eq!(next_status(from, Action::Reopen), None);
        }
    }

    #[test]
    fn test_escalation_sources() {
        let escalatable: Vec<_> = Status::ALL
            .into_iter()
            .filter(|s| next_status(*s, Action::Escalate).is_some())
            .collect();
        assert_eq!(escalatable, vec![Status::New, Status::UnderReview]);
    }
}
