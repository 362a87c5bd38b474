//! # ResolveIT
//!
//! Grievance tracking service: complaints are submitted, assigned, resolved
//! and closed or reopened, with a public timeline, notifications and SLA
//! escalation.
//!
//! ## Modules
//!
//! - [`store`]: SQLite persistence for accounts, complaints and directories
//! - [`auth`]: Password hashing, signed bearer tokens, registration and login
//! - [`service`]: Complaint lifecycle, notifications and escalation
//! - [`api`]: REST API server with Axum
//! - [`client`]: Typed HTTP client for the REST API
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use resolveit::api::{serve, ApiConfig, AppState};
//! use resolveit::auth::AuthService;
//! use resolveit::service::{ComplaintService, ServiceConfig, StoreNotifier};
//! use resolveit::store::Database;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Arc::new(Database::open("data/resolveit.db".as_ref())?);
//!     db.seed_default_categories()?;
//!
//!     let auth = Arc::new(AuthService::new(db.clone(), "change-me", 24));
//!     let notifier = Arc::new(StoreNotifier::new(db.clone()));
//!     let complaints = Arc::new(ComplaintService::new(
//!         db.clone(),
//!         notifier,
//!         ServiceConfig::default(),
//!     ));
//!
//!     let config = ApiConfig::default();
//!     serve(AppState::new(db, auth, complaints, config.clone()), &config).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod service;
pub mod store;

// Re-export top-level types for convenience
pub use store::{
    Category, Complaint, ComplaintDraft, ComplaintUpdate, Database, Priority, Role, Stats,
    Status, StoreError, StoreResult, Student, TimelineEntry, User,
};

pub use auth::{AuthError, AuthService, Session};

pub use service::{ComplaintService, EscalationScheduler, ServiceConfig, ServiceError};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use client::{ClientError, ResolveClient};

pub use config::Config;
