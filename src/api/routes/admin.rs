//! Admin Routes
//!
//! - POST /api/admin/escalations/run - Run the SLA escalation sweep now

use axum::{extract::State, Json};
use chrono::Utc;
use std::sync::Arc;

use crate::api::dto::EscalationRunResponse;
use crate::api::error::ApiResult;
use crate::api::extract::AuthUser;
use crate::api::state::AppState;

/// POST /api/admin/escalations/run
pub async fn run_escalations(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<EscalationRunResponse>> {
    user.require_staff()?;
    let escalated = state.complaints.check_and_escalate(Utc::now()).await?;
    tracing::info!(by = user.0.id, escalated, "Manual escalation sweep");
    Ok(Json(EscalationRunResponse { escalated }))
}
