//! ResolveIT REST API
//!
//! HTTP API layer for ResolveIT, built with Axum. Every route except auth,
//! categories and health requires `Authorization: Bearer <token>`.
//!
//! # Endpoints
//!
//! ## Auth
//! - `POST /api/auth/login` - Exchange credentials for a token
//! - `POST /api/auth/register` - Create an account
//!
//! ## Complaints
//! - `GET /api/complaints` - All complaints (staff)
//! - `POST /api/complaints` - Submit (multipart)
//! - `GET /api/complaints/me` - Caller's complaints
//! - `GET /api/complaints/stats` - Statistics
//! - `GET /api/complaints/export` - CSV report (staff)
//! - `GET /api/complaints/:id` - Read one
//! - `PUT /api/complaints/:id` - Edit (staff)
//! - `DELETE /api/complaints/:id` - Delete (staff)
//! - `GET /api/complaints/:id/timeline` - History
//! - `GET /api/complaints/:id/attachments` - Evidence metadata
//! - `POST /api/complaints/:id/assign` - Assign to staff
//! - `POST /api/complaints/:id/comment` - Add a comment
//! - `POST /api/complaints/:id/resolve` - Resolve (staff)
//! - `POST /api/complaints/:id/close` - Acknowledge a resolution
//! - `POST /api/complaints/:id/reopen` - Reject a resolution
//!
//! ## Students
//! - `GET /api/students` - List
//! - `POST /api/students` - Create
//! - `GET /api/students/:id` - Read
//! - `PUT /api/students/:id` - Update
//! - `DELETE /api/students/:id` - Delete
//!
//! ## Directory and notifications
//! - `GET /api/categories` - Active categories
//! - `GET /api/users` - Accounts (staff)
//! - `GET /api/notifications/me` - Caller's notifications
//! - `POST /api/notifications/:id/read` - Mark read
//!
//! ## Admin
//! - `POST /api/admin/escalations/run` - Run the SLA sweep (staff)
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status

pub mod dto;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use extract::AuthUser;
pub use state::{ApiConfig, AppState};

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Permissive when no origins are configured, otherwise an allow list
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(allowed)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Auth routes
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/register", post(routes::auth::register))
        // Complaint routes
        .route(
            "/complaints",
            get(routes::complaints::list_complaints).post(routes::complaints::create_complaint),
        )
        .route("/complaints/me", get(routes::complaints::my_complaints))
        .route("/complaints/stats", get(routes::complaints::complaint_stats))
        .route("/complaints/export", get(routes::export::export_complaints))
        .route(
            "/complaints/:id",
            get(routes::complaints::get_complaint)
                .put(routes::complaints::update_complaint)
                .delete(routes::complaints::delete_complaint),
        )
        .route(
            "/complaints/:id/timeline",
            get(routes::complaints::complaint_timeline),
        )
        .route(
            "/complaints/:id/attachments",
            get(routes::complaints::complaint_attachments),
        )
        .route("/complaints/:id/assign", post(routes::complaints::assign_complaint))
        .route("/complaints/:id/comment", post(routes::complaints::comment_complaint))
        .route("/complaints/:id/resolve", post(routes::complaints::resolve_complaint))
        .route("/complaints/:id/close", post(routes::complaints::close_complaint))
        .route("/complaints/:id/reopen", post(routes::complaints::reopen_complaint))
        // Student routes
        .route(
            "/students",
            get(routes::students::list_students).post(routes::students::create_student),
        )
        .route(
            "/students/:id",
            get(routes::students::get_student)
                .put(routes::students::update_student)
                .delete(routes::students::delete_student),
        )
        // Directory routes
        .route("/categories", get(routes::directory::list_categories))
        .route("/users", get(routes::directory::list_users))
        // Notification routes
        .route("/notifications/me", get(routes::notifications::my_notifications))
        .route("/notifications/:id/read", post(routes::notifications::mark_read))
        // Admin routes
        .route("/admin/escalations/run", post(routes::admin::run_escalations))
        // Evidence uploads ride on the complaint form
        .layer(DefaultBodyLimit::max(state.config.max_body_size));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config.cors_origins);
    let timeout = TimeoutLayer::new(state.config.request_timeout);

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(timeout)
        .layer(cors)
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("ResolveIT API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("ResolveIT API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
