//! Notification handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use idlewatch_service::notification::NotificationList;

use crate::dto::{ApiResponse, CountResponse, MarkManyReadRequest, ReadStateResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

type Changed = Result<Json<ApiResponse<ReadStateResponse>>, ApiError>;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<NotificationList>>, ApiError> {
    let page = params.page_request(&state.config.notifications);
    let list = state
        .notifications
        .list(&auth, &page, params.unread_only)
        .await?;
    Ok(Json(ApiResponse::ok(list)))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.notifications.unread_count(&auth).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// PUT /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Changed {
    let change = state.notifications.mark_read(&auth, id).await?;
    Ok(Json(ApiResponse::ok(change.into())))
}

/// PUT /api/notifications/read
pub async fn mark_many_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<MarkManyReadRequest>,
) -> Changed {
    let change = state.notifications.mark_many_read(&auth, &req.ids).await?;
    Ok(Json(ApiResponse::ok(change.into())))
}

/// PUT /api/notifications/read-all
pub async fn mark_all_read(State(state): State<AppState>, auth: AuthUser) -> Changed {
    let change = state.notifications.mark_all_read(&auth).await?;
    Ok(Json(ApiResponse::ok(change.into())))
}

/// DELETE /api/notifications/{id}
pub async fn delete_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Changed {
    let change = state.notifications.delete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(change.into())))
}

/// DELETE /api/notifications
pub async fn delete_all(State(state): State<AppState>, auth: AuthUser) -> Changed {
    let change = state.notifications.delete_all(&auth).await?;
    Ok(Json(ApiResponse::ok(change.into())))
}
