use axum::extract::State;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{advertisement, category, news, notification, operator, sub_category};
use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::models::dashboard::DashboardStats;
use crate::models::news::{STATUS_APPROVED, STATUS_PENDING, STATUS_REJECTED};
use crate::models::shared::{ApiResponse, ok};
use crate::state::AppState;

/// Aggregate counts for the admin dashboard.
#[utoipa::path(
    get,
    path = "/admin/dashboard",
    tag = "Dashboard",
    operation_id = "dashboardStats",
    summary = "Dashboard statistics",
    responses(
        (status = 200, description = "Statistics", body = ApiResponse<DashboardStats>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn stats(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    let db = &state.db;

    let news_count = |status: &str| {
        news::Entity::find()
            .filter(news::Column::Status.eq(status))
            .count(db)
    };

    let body = DashboardStats {
        total_news: news::Entity::find().count(db).await?,
        pending_news: news_count(STATUS_PENDING).await?,
        approved_news: news_count(STATUS_APPROVED).await?,
        rejected_news: news_count(STATUS_REJECTED).await?,
        total_operators: operator::Entity::find().count(db).await?,
        active_operators: operator::Entity::find()
            .filter(operator::Column::IsActive.eq(true))
            .count(db)
            .await?,
        total_categories: category::Entity::find().count(db).await?,
        total_sub_categories: sub_category::Entity::find().count(db).await?,
        total_advertisements: advertisement::Entity::find().count(db).await?,
        unread_notifications: notification::Entity::find()
            .filter(notification::Column::IsRead.eq(false))
            .count(db)
            .await?,
    };

    Ok(ok("Dashboard statistics fetched successfully", body))
}
