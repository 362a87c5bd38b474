//! Export Routes
//!
//! Complaint report download.
//!
//! - GET /api/complaints/export - All complaints as CSV (staff)

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::extract::AuthUser;
use crate::api::state::AppState;

/// GET /api/complaints/export
///
/// CSV attachment with one row per complaint.
pub async fn export_complaints(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> ApiResult<Response> {
    let body = state.complaints.export_csv(&user)?;

    let disposition = format!(
        "attachment; filename=\"complaints_report_{}.csv\"",
        Utc::now().format("%Y%m%d_%H%M%S")
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, disposition.as_str()),
        ],
        Body::from(body),
    )
        .into_response())
}
