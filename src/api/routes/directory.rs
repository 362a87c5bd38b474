//! Directory Routes
//!
//! Read-only lookups used by forms.
//!
//! - GET /api/categories - Active complaint categories
//! - GET /api/users - All accounts (staff), for the assignment picker

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::extract::AuthUser;
use crate::api::state::AppState;
use crate::store::{Category, User};

/// GET /api/categories
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.db.list_categories(false)?))
}

/// GET /api/users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Vec<User>>> {
    user.require_staff()?;
    Ok(Json(state.db.list_users()?))
}
