//! Operator lifecycle endpoints.

use axum::Json;
use axum::extract::State;

use idlewatch_entity::lifecycle::InactivityStats;
use idlewatch_service::CycleResult;

use crate::dto::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AdminUser;
use crate::state::AppState;

/// POST /api/admin/lifecycle/run
///
/// Runs a cycle and waits for it. An overlapping trigger returns
/// `success: false` with the reason rather than an error status.
pub async fn run_cycle(
    State(state): State<AppState>,
    admin: AdminUser,
) -> Json<CycleResult> {
    tracing::info!(user_id = %admin.user_id, "Manual lifecycle cycle requested");
    Json(state.engine.run_cycle().await)
}

/// GET /api/admin/lifecycle/stats
pub async fn stats(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<ApiResponse<InactivityStats>>, ApiError> {
    let stats = state.engine.stats().await?;
    Ok(Json(ApiResponse::ok(stats)))
}
