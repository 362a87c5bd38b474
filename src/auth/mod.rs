//! Accounts and bearer-token authentication
//!
//! - **password**: Salted PBKDF2-HMAC-SHA256 password hashes
//! - **token**: HMAC-SHA256 signed bearer tokens
//!
//! `AuthService` ties both to the user table.

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{TokenError, TokenSigner};

use crate::store::{Database, Role, StoreError, User};
use chrono::{Duration, Utc};
use std::sync::{Arc, OnceLock};
use thiserror::Error;

/// Authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid Email")]
    InvalidEmail,

    #[error("Invalid Password")]
    InvalidPassword,

    #[error("Email already registered")]
    EmailTaken,

    #[error("{0}")]
    Validation(String),

    #[error("Invalid token: {0}")]
    Token(#[from] TokenError),

    #[error("Unknown user")]
    UnknownUser,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Successful login
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Loose shape check: something@something.tld
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Option<regex::Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| regex::Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok())
        .as_ref()
        .map(|re| re.is_match(email.trim()))
        .unwrap_or(false)
}

/// Registration, login and token checks
pub struct AuthService {
    db: Arc<Database>,
    signer: TokenSigner,
}

impl AuthService {
    pub fn new(db: Arc<Database>, secret: impl Into<Vec<u8>>, ttl_hours: u64) -> Self {
        Self {
            db,
            signer: TokenSigner::new(secret, Duration::hours(ttl_hours as i64)),
        }
    }

    /// Create an account. Unknown role strings fall back to USER.
    pub fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Option<&str>,
    ) -> Result<User, AuthError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(AuthError::Validation("Name is required".to_string()));
        }
        if !is_valid_email(email) {
            return Err(AuthError::Validation("A valid email is required".to_string()));
        }
        if password.is_empty() {
            return Err(AuthError::Validation("Password is required".to_string()));
        }

        if self.db.find_user_by_email(email)?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let role = role.and_then(Role::parse).unwrap_or(Role::User);
        let user = self
            .db
            .create_user(name, email, &hash_password(password), role, Utc::now())
            .map_err(|e| match e {
                StoreError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Store(other),
            })?;

        tracing::info!(user_id = user.id, role = %user.role, "Registered user");
        Ok(user)
    }

    /// Check credentials and issue a token
    pub fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let stored = self
            .db
            .find_user_by_email(email)?
            .ok_or(AuthError::InvalidEmail)?;

        if !verify_password(password, &stored.password_hash) {
            tracing::warn!(user_id = stored.user.id, "Failed login");
            return Err(AuthError::InvalidPassword);
        }

        let token = self.signer.issue(stored.user.id, Utc::now());
        tracing::info!(user_id = stored.user.id, "User logged in");
        Ok(Session {
            token,
            user: stored.user,
        })
    }

    pub fn issue_token(&self, user_id: i64) -> String {
        self.signer.issue(user_id, Utc::now())
    }

    pub fn verify_token(&self, token: &str) -> Result<i64, AuthError> {
        Ok(self.signer.verify(token, Utc::now())?)
    }

    /// Resolve a bearer token to a live account
    pub fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let user_id = self.verify_token(token)?;
        self.db.get_user(user_id)?.ok_or(AuthError::UnknownUser)
    }

    /// Create the configured admin account if it does not exist yet.
    /// Returns true when an account was created.
    pub fn bootstrap_admin(&self, email: &str, password: &str) -> Result<bool, AuthError> {
        if self.db.find_user_by_email(email)?.is_some() {
            return Ok(false);
        }
        let user = self.register("Administrator", email, password, Some("ADMIN"))?;
        tracing::info!(user_id = user.id, email = %user.email, "Bootstrapped admin account");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        let db = Arc::new(Database::open_in_memory().unwrap());
        AuthService::new(db, "secret", 24)
    }

    #[test]
    fn test_register_and_login() {
        let auth = service();
        let user = auth
            .register("Meera", "meera@example.com", "pw123", None)
            .unwrap();
        assert_eq!(user.role, Role::User);

        let session = auth.login("MEERA@example.com", "pw123").unwrap();
        assert_eq!(session.user.id, user.id);
        assert_eq!(auth.authenticate(&session.token).unwrap(), user);
    }

    #[test]
    fn test_login_errors() {
        let auth = service();
        auth.register("Meera", "meera@example.com", "pw123", None)
            .unwrap();

        let err = auth.login("nobody@example.com", "pw123").unwrap_err();
        assert_eq!(err.to_string(), "Invalid Email");

        let err = auth.login("meera@example.com", "wrong").unwrap_err();
        assert_eq!(err.to_string(), "Invalid Password");
    }

    #[test]
    fn test_register_duplicate_and_roles() {
        let auth = service();
        let admin = auth
            .register("Boss", "boss@example.com", "pw", Some("senior_admin"))
            .unwrap();
        assert_eq!(admin.role, Role::SeniorAdmin);

        let err = auth
            .register("Boss2", "BOSS@example.com", "pw", None)
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
        assert_eq!(err.to_string(), "Email already registered");

        let user = auth
            .register("X", "x@example.com", "pw", Some("wizard"))
            .unwrap();
        assert_eq!(user.role, Role::User);
    }

    #[test]
    fn test_register_validation() {
        let auth = service();
        assert!(matches!(
            auth.register("", "a@example.com", "pw", None),
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            auth.register("A", "not-an-email", "pw", None),
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            auth.register("A", "a@example.com", "", None),
            Err(AuthError::Validation(_))
        ));
    }

    #[test]
    fn test_bootstrap_admin_once() {
        let auth = service();
        assert!(auth.bootstrap_admin("root@example.com", "pw").unwrap());
        assert!(!auth.bootstrap_admin("root@example.com", "pw").unwrap());
        let session = auth.login("root@example.com", "pw").unwrap();
        assert_eq!(session.user.role, Role::Admin);
    }

    #[test]
    fn test_token_for_deleted_user() {
        let auth = service();
        let token = auth.issue_token(999);
        assert!(matches!(
            auth.authenticate(&token),
            Err(AuthError::UnknownUser)
        ));
        assert!(matches!(
            auth.authenticate("garbage"),
            Err(AuthError::Token(TokenError::Malformed))
        ));
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("a.b@uni.edu"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@uni.edu"));
        assert!(!is_valid_email("a b@uni.edu"));
    }
}
