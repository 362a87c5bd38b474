//! Notification Routes
//!
//! - GET /api/notifications/me - Caller's notifications, newest first
//! - POST /api/notifications/:id/read - Mark one as read

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::AuthUser;
use crate::api::state::AppState;
use crate::store::Notification;

/// GET /api/notifications/me
pub async fn my_notifications(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<Vec<Notification>>> {
    Ok(Json(state.db.list_notifications_for_user(user.id)?))
}

/// POST /api/notifications/:id/read
///
/// Someone else's notification looks the same as a missing one.
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !state.db.mark_notification_read(id, user.id)? {
        return Err(ApiError::NotFound(format!("Notification {} not found", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}
