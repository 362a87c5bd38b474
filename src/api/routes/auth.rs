//! Auth Routes
//!
//! - POST /api/auth/login - Exchange credentials for a bearer token
//! - POST /api/auth/register - Create an account

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{LoginRequest, LoginResponse, RegisterRequest, EMAIL_TAKEN, REGISTERED};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::auth::AuthError;

/// POST /api/auth/login
///
/// Unknown email and wrong password answer 200 with `status: "error"`.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    match state.auth.login(&req.email, &req.password) {
        Ok(session) => Ok(Json(LoginResponse::success(session))),
        Err(e @ (AuthError::InvalidEmail | AuthError::InvalidPassword)) => {
            Ok(Json(LoginResponse::error(e.to_string())))
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /api/auth/register
///
/// Answers with a plain-text message; a taken email is not an HTTP error.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<String> {
    match state
        .auth
        .register(&req.name, &req.email, &req.password, req.role.as_deref())
    {
        Ok(_) => Ok(REGISTERED.to_string()),
        Err(AuthError::EmailTaken) => Ok(EMAIL_TAKEN.to_string()),
        Err(e) => Err(e.into()),
    }
}
