use axum::extract::{Query, State};
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::*;
use tracing::instrument;

use crate::entity::notification;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::notification::{
    MarkAllReadResponse, MarkReadRequest, NotificationQuery, NotificationResponse,
};
use crate::models::shared::{ApiResponse, ok};
use crate::state::AppState;

const DEFAULT_LIMIT: u64 = 50;
const MAX_LIMIT: u64 = 200;

/// Admin inbox, newest first.
#[utoipa::path(
    get,
    path = "/admin/notifications",
    tag = "Notifications",
    operation_id = "listNotifications",
    summary = "List notifications",
    params(NotificationQuery),
    responses(
        (status = 200, description = "Notifications", body = ApiResponse<Vec<NotificationResponse>>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_notifications(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<NotificationQuery>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let mut select = notification::Entity::find();
    if query.unread == Some(true) {
        select = select.filter(notification::Column::IsRead.eq(false));
    }

    let items = select
        .order_by_desc(notification::Column::CreatedAt)
        .order_by_desc(notification::Column::Id)
        .limit(Ord::min(query.limit.unwrap_or(DEFAULT_LIMIT), MAX_LIMIT))
        .offset(query.offset.unwrap_or(0))
        .all(&state.db)
        .await?;

    let body: Vec<NotificationResponse> = items.into_iter().map(Into::into).collect();
    Ok(ok("Notifications fetched successfully", body))
}

#[utoipa::path(
    post,
    path = "/admin/notifications/mark-read",
    tag = "Notifications",
    operation_id = "markNotificationRead",
    summary = "Mark one notification as read",
    request_body = MarkReadRequest,
    responses(
        (status = 200, description = "Marked read", body = ApiResponse<NotificationResponse>),
        (status = 404, description = "Notification not found", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(notification_id = payload.id))]
pub async fn mark_read(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<MarkReadRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let model = notification::Entity::find_by_id(payload.id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Notification not found".into()))?;

    let mut active: notification::ActiveModel = model.into();
    active.is_read = Set(true);
    let model = active.update(&state.db).await?;

    Ok(ok(
        "Notification marked as read",
        NotificationResponse::from(model),
    ))
}

#[utoipa::path(
    post,
    path = "/admin/notifications/mark-all-read",
    tag = "Notifications",
    operation_id = "markAllNotificationsRead",
    summary = "Mark every unread notification as read",
    responses(
        (status = 200, description = "Marked read", body = ApiResponse<MarkAllReadResponse>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn mark_all_read(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let result = notification::Entity::update_many()
        .col_expr(notification::Column::IsRead, Expr::value(true))
        .filter(notification::Column::IsRead.eq(false))
        .exec(&state.db)
        .await?;

    Ok(ok(
        "All notifications marked as read",
        MarkAllReadResponse {
            updated: result.rows_affected,
        },
    ))
}
