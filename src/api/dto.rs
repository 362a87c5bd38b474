//! Data Transfer Objects
//!
//! Request and response types for the API endpoints that are not domain
//! records themselves. Domain records (`Complaint`, `Student`, ...) are
//! serialized directly from `crate::store`.

use serde::{Deserialize, Serialize};

use crate::auth::Session;
use crate::store::User;

// ============================================
// AUTH DTOs
// ============================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login response. Bad credentials are reported in-band with
/// `status: "error"` rather than as an HTTP error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LoginResponse {
    pub fn success(session: Session) -> Self {
        Self {
            status: "success".to_string(),
            token: Some(session.token),
            user: Some(session.user),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            token: None,
            user: None,
            message: Some(message.into()),
        }
    }
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

pub const REGISTERED: &str = "Registered Successfully";
pub const EMAIL_TAKEN: &str = "Email already registered";

// ============================================
// COMPLAINT ACTION DTOs
// ============================================

/// POST /complaints/:id/assign
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub user_id: i64,
}

/// POST /complaints/:id/comment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    #[serde(default)]
    pub comment: String,
    #[serde(default = "default_public")]
    pub is_public: bool,
}

fn default_public() -> bool {
    true
}

/// POST /complaints/:id/resolve and /close
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteRequest {
    #[serde(default)]
    pub comment: Option<String>,
}

/// POST /complaints/:id/reopen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReopenRequest {
    #[serde(default)]
    pub reason: String,
}

// ============================================
// ADMIN DTOs
// ============================================

/// Result of a manual escalation sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationRunResponse {
    pub escalated: usize,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: "healthy" or "unhealthy"
    pub status: String,
    /// Database status: "ok" or "error"
    pub database: String,
    /// Uptime in seconds
    pub uptime_seconds: u64,
    /// Server version
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_error_shape() {
        let json = serde_json::to_value(LoginResponse::error("Invalid Email")).unwrap();
        assert_eq!(json, serde_json::json!({"status": "error", "message": "Invalid Email"}));
    }

    #[test]
    fn test_comment_defaults_public() {
        let req: CommentRequest = serde_json::from_str(r#"{"comment": "hi"}"#).unwrap();
        assert!(req.is_public);
        let req: CommentRequest =
            serde_json::from_str(r#"{"comment": "hi", "isPublic": false}"#).unwrap();
        assert!(!req.is_public);
    }

    #[test]
    fn test_assign_camel_case() {
        let req: AssignRequest = serde_json::from_str(r#"{"userId": 4}"#).unwrap();
        assert_eq!(req.user_id, 4);
    }
}
