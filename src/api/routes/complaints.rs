//! Complaint Routes
//!
//! - GET /api/complaints - All complaints (staff)
//! - GET /api/complaints/me - Caller's complaints
//! - GET /api/complaints/stats - Aggregate statistics
//! - POST /api/complaints - Submit (multipart: `complaint` JSON + optional `file`)
//! - GET /api/complaints/:id - Read one
//! - PUT /api/complaints/:id - Edit (staff)
//! - DELETE /api/complaints/:id - Delete (staff)
//! - GET /api/complaints/:id/timeline - History
//! - GET /api/complaints/:id/attachments - Evidence metadata
//! - POST /api/complaints/:id/{assign,comment,resolve,close,reopen} - Lifecycle actions

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{AssignRequest, CommentRequest, NoteRequest, ReopenRequest};
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::AuthUser;
use crate::api::state::AppState;
use crate::service::Upload;
use crate::store::{Attachment, Complaint, ComplaintDraft, ComplaintUpdate, Stats, TimelineEntry};

/// GET /api/complaints
pub async fn list_complaints(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<Vec<Complaint>>> {
    Ok(Json(state.complaints.list_all(&user)?))
}

/// GET /api/complaints/me
pub async fn my_complaints(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<Vec<Complaint>>> {
    Ok(Json(state.complaints.list_mine(&user)?))
}

/// GET /api/complaints/stats
///
/// Global for staff, scoped to the caller's own complaints otherwise.
pub async fn complaint_stats(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<Stats>> {
    Ok(Json(state.complaints.stats(&user)?))
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::Validation(format!("Invalid multipart body: {}", e))
}

/// POST /api/complaints
///
/// Multipart form with a `complaint` part holding the JSON draft and an
/// optional `file` part with one evidence file.
pub async fn create_complaint(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Complaint>)> {
    let mut draft: Option<ComplaintDraft> = None;
    let mut upload: Option<Upload> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("complaint") => {
                let text = field.text().await.map_err(multipart_error)?;
                let parsed = serde_json::from_str(&text)
                    .map_err(|e| ApiError::Validation(format!("Invalid complaint JSON: {}", e)))?;
                draft = Some(parsed);
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if !bytes.is_empty() {
                    upload = Some(Upload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            other => {
                tracing::debug!(field = ?other, "Ignoring unknown multipart field");
            }
        }
    }

    let draft = draft.ok_or_else(|| {
        ApiError::Validation("Missing 'complaint' part in multipart body".to_string())
    })?;
    let complaint = state.complaints.create(&user, draft, upload).await?;
    Ok((StatusCode::CREATED, Json(complaint)))
}

/// GET /api/complaints/:id
pub async fn get_complaint(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Complaint>> {
    Ok(Json(state.complaints.get(&user, id)?))
}

/// PUT /api/complaints/:id
pub async fn update_complaint(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Json(update): Json<ComplaintUpdate>,
) -> ApiResult<Json<Complaint>> {
    Ok(Json(state.complaints.update(&user, id, update).await?))
}

/// DELETE /api/complaints/:id
pub async fn delete_complaint(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.complaints.delete(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/complaints/:id/timeline
pub async fn complaint_timeline(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<TimelineEntry>>> {
    Ok(Json(state.complaints.timeline(&user, id)?))
}

/// GET /api/complaints/:id/attachments
pub async fn complaint_attachments(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<Attachment>>> {
    Ok(Json(state.complaints.attachments(&user, id)?))
}

/// POST /api/complaints/:id/assign
pub async fn assign_complaint(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<AssignRequest>,
) -> ApiResult<Json<Complaint>> {
    Ok(Json(state.complaints.assign(&user, id, req.user_id).await?))
}

/// POST /api/complaints/:id/comment
pub async fn comment_complaint(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<CommentRequest>,
) -> ApiResult<(StatusCode, Json<TimelineEntry>)> {
    let entry = state
        .complaints
        .comment(&user, id, &req.comment, req.is_public)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// POST /api/complaints/:id/resolve
pub async fn resolve_complaint(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<NoteRequest>,
) -> ApiResult<Json<Complaint>> {
    Ok(Json(state.complaints.resolve(&user, id, req.comment).await?))
}

/// POST /api/complaints/:id/close
pub async fn close_complaint(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<NoteRequest>,
) -> ApiResult<Json<Complaint>> {
    Ok(Json(state.complaints.close(&user, id, req.comment).await?))
}

/// POST /api/complaints/:id/reopen
pub async fn reopen_complaint(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<ReopenRequest>,
) -> ApiResult<Json<Complaint>> {
    Ok(Json(state.complaints.reopen(&user, id, &req.reason).await?))
}
