use std::collections::{BTreeMap, HashMap};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{news, news_image, notification, operator, sub_category};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, Role};
use crate::extractors::json::AppJson;
use crate::models::news::*;
use crate::models::notification::{KIND_NEWS_APPROVED, KIND_NEWS_PENDING, KIND_NEWS_REJECTED};
use crate::models::shared::{ApiResponse, ok};
use crate::state::AppState;
use crate::utils::{slug, upload};

const DEFAULT_LIMIT: u64 = 20;
const MAX_LIMIT: u64 = 100;

/// Look up a news item or 404.
pub(crate) async fn find_news<C: ConnectionTrait>(db: &C, id: i32) -> Result<news::Model, AppError> {
    news::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("News not found".into()))
}

/// First slug candidate not yet taken, probing `base`, `base-1`, ...
async fn free_slug<C: ConnectionTrait>(db: &C, title: &str) -> Result<String, AppError> {
    let base = slug::derive_slug(title);
    for candidate in slug::candidates(&base) {
        let taken = news::Entity::find()
            .filter(news::Column::Slug.eq(&candidate))
            .count(db)
            .await?
            > 0;
        if !taken {
            return Ok(candidate);
        }
    }
    Err(AppError::Internal(format!(
        "Could not derive a unique slug from '{base}'"
    )))
}

async fn ensure_sub_category<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<sub_category::Model, AppError> {
    sub_category::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| {
            AppError::FieldValidation(BTreeMap::from([(
                "sub_category_id".to_string(),
                "The selected sub_category_id is invalid".to_string(),
            )]))
        })
}

pub(crate) async fn push_notification<C: ConnectionTrait>(
    db: &C,
    kind: &str,
    title: &str,
    message: String,
    news_id: i32,
) -> Result<(), AppError> {
    notification::ActiveModel {
        kind: Set(kind.to_string()),
        title: Set(title.to_string()),
        message: Set(message),
        related_id: Set(Some(news_id)),
        related_type: Set(Some("news".to_string())),
        is_read: Set(false),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(())
}

/// Resolve denormalized names and ordered images for a single item.
pub(crate) async fn news_response<C: ConnectionTrait>(
    db: &C,
    m: news::Model,
) -> Result<NewsResponse, AppError> {
    let operator_name = match m.operator_id {
        Some(id) => operator::Entity::find_by_id(id)
            .one(db)
            .await?
            .map(|o| o.name),
        None => None,
    };
    let sub_category_name = match m.sub_category_id {
        Some(id) => sub_category::Entity::find_by_id(id)
            .one(db)
            .await?
            .map(|s| s.name),
        None => None,
    };
    let images = news_image::Entity::find()
        .filter(news_image::Column::NewsId.eq(m.id))
        .order_by_asc(news_image::Column::DisplayOrder)
        .order_by_asc(news_image::Column::Id)
        .all(db)
        .await?;
    Ok(NewsResponse::from_parts(
        m,
        operator_name,
        sub_category_name,
        images,
    ))
}

/// Resolve names and images for a page of items with batched lookups.
async fn news_responses<C: ConnectionTrait>(
    db: &C,
    items: Vec<news::Model>,
) -> Result<Vec<NewsResponse>, AppError> {
    let news_ids: Vec<i32> = items.iter().map(|m| m.id).collect();
    let operator_ids: Vec<i32> = items.iter().filter_map(|m| m.operator_id).collect();
    let sub_category_ids: Vec<i32> = items.iter().filter_map(|m| m.sub_category_id).collect();

    let operator_names: HashMap<i32, String> = operator::Entity::find()
        .filter(operator::Column::Id.is_in(operator_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|o| (o.id, o.name))
        .collect();
    let sub_category_names: HashMap<i32, String> = sub_category::Entity::find()
        .filter(sub_category::Column::Id.is_in(sub_category_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.id, s.name))
        .collect();

    let mut images_by_news: HashMap<i32, Vec<news_image::Model>> = HashMap::new();
    let all_images = news_image::Entity::find()
        .filter(news_image::Column::NewsId.is_in(news_ids))
        .order_by_asc(news_image::Column::DisplayOrder)
        .order_by_asc(news_image::Column::Id)
        .all(db)
        .await?;
    for img in all_images {
        images_by_news.entry(img.news_id).or_default().push(img);
    }

    Ok(items
        .into_iter()
        .map(|m| {
            let operator_name = m.operator_id.and_then(|id| operator_names.get(&id).cloned());
            let sub_category_name = m
                .sub_category_id
                .and_then(|id| sub_category_names.get(&id).cloned());
            let images = images_by_news.remove(&m.id).unwrap_or_default();
            NewsResponse::from_parts(m, operator_name, sub_category_name, images)
        })
        .collect())
}

fn page(limit: Option<u64>, offset: Option<u64>) -> (u64, u64) {
    (
        Ord::min(limit.unwrap_or(DEFAULT_LIMIT), MAX_LIMIT),
        offset.unwrap_or(0),
    )
}

/// Create a news item. Admins publish immediately; operators submit
/// for approval, which raises a pending notification.
#[utoipa::path(
    post,
    path = "/news",
    tag = "News",
    operation_id = "createNews",
    summary = "Create a news item",
    request_body = CreateNewsRequest,
    responses(
        (status = 201, description = "News created", body = ApiResponse<NewsResponse>),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 409, description = "Slug already taken (CONFLICT)", body = ErrorBody),
        (status = 422, description = "Validation error", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(title = %payload.title, role = auth_user.role.as_str()))]
pub async fn create_news(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateNewsRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    if let Some(sub_category_id) = payload.sub_category_id {
        ensure_sub_category(&state.db, sub_category_id).await?;
    }

    let title = payload.title.trim().to_string();
    let slug = free_slug(&state.db, &title).await?;
    let now = chrono::Utc::now();

    let txn = state.db.begin().await?;

    // Status is derived from the caller's role, never client-supplied.
    let (status, operator_id, approved_by, approved_at) = match auth_user.role {
        Role::Admin => {
            // Admin-authored items are attributed to the first active
            // operator when one exists.
            let author = operator::Entity::find()
                .filter(operator::Column::IsActive.eq(true))
                .order_by_asc(operator::Column::Id)
                .one(&txn)
                .await?;
            (
                STATUS_APPROVED,
                author.map(|o| o.id),
                Some(auth_user.id),
                Some(now),
            )
        }
        Role::Operator => (STATUS_PENDING, Some(auth_user.id), None, None),
    };

    let model = news::ActiveModel {
        title: Set(title.clone()),
        sub_title: Set(payload.sub_title),
        slug: Set(slug),
        content: Set(payload.content),
        status: Set(status.to_string()),
        operator_id: Set(operator_id),
        sub_category_id: Set(payload.sub_category_id),
        approved_by: Set(approved_by),
        approved_at: Set(approved_at),
        rejected_reason: Set(None),
        views: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("A news item with this slug already exists".into())
        }
        _ => AppError::from(e),
    })?;

    if status == STATUS_PENDING {
        push_notification(
            &txn,
            KIND_NEWS_PENDING,
            "News pending approval",
            format!("{} submitted \"{}\" for approval", auth_user.name, title),
            model.id,
        )
        .await?;
    }

    txn.commit().await?;

    let body = news_response(&state.db, model).await?;
    Ok((
        StatusCode::CREATED,
        ok("News created successfully", body),
    ))
}

/// Update a news item. Operators may only touch their own pending items.
#[utoipa::path(
    put,
    path = "/news/{id}",
    tag = "News",
    operation_id = "updateNews",
    summary = "Update a news item",
    params(("id" = i32, Path, description = "News ID")),
    request_body = UpdateNewsRequest,
    responses(
        (status = 200, description = "News updated", body = ApiResponse<NewsResponse>),
        (status = 403, description = "Not the owner or not editable", body = ErrorBody),
        (status = 404, description = "News not found", body = ErrorBody),
        (status = 409, description = "Slug already taken", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(news_id = id))]
pub async fn update_news(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateNewsRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let model = find_news(&state.db, id).await?;

    if auth_user.role == Role::Operator {
        if model.operator_id != Some(auth_user.id) {
            return Err(AppError::PermissionDenied(
                "You can only edit your own news".into(),
            ));
        }
        if model.status != STATUS_PENDING {
            return Err(AppError::PermissionDenied(
                "Only pending news can be edited".into(),
            ));
        }
    }

    if let Some(Some(sub_category_id)) = payload.sub_category_id {
        ensure_sub_category(&state.db, sub_category_id).await?;
    }

    let mut active: news::ActiveModel = model.into();
    if let Some(title) = payload.title {
        let title = title.trim().to_string();
        // Regenerated without the collision probe; a clash surfaces as 409.
        active.slug = Set(slug::derive_slug(&title));
        active.title = Set(title);
    }
    if let Some(sub_title) = payload.sub_title {
        active.sub_title = Set(sub_title);
    }
    if let Some(content) = payload.content {
        active.content = Set(content);
    }
    if let Some(sub_category_id) = payload.sub_category_id {
        active.sub_category_id = Set(sub_category_id);
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&state.db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("A news item with this slug already exists".into())
        }
        _ => AppError::from(e),
    })?;

    let body = news_response(&state.db, model).await?;
    Ok(ok("News updated successfully", body))
}

/// Approve a pending news item.
#[utoipa::path(
    post,
    path = "/admin/news/{id}/approve",
    tag = "News",
    operation_id = "approveNews",
    summary = "Approve a pending news item",
    params(("id" = i32, Path, description = "News ID")),
    responses(
        (status = 200, description = "News approved", body = ApiResponse<NewsResponse>),
        (status = 404, description = "News not found", body = ErrorBody),
        (status = 409, description = "Item is not pending", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(news_id = id, admin_id = auth_user.id))]
pub async fn approve_news(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let txn = state.db.begin().await?;
    let model = find_news(&txn, id).await?;

    if model.status != STATUS_PENDING {
        return Err(AppError::Conflict(format!(
            "Only pending news can be approved (current status: {})",
            model.status
        )));
    }

    let title = model.title.clone();
    let mut active: news::ActiveModel = model.into();
    active.status = Set(STATUS_APPROVED.to_string());
    active.approved_by = Set(Some(auth_user.id));
    active.approved_at = Set(Some(chrono::Utc::now()));
    active.updated_at = Set(chrono::Utc::now());
    let model = active.update(&txn).await?;

    push_notification(
        &txn,
        KIND_NEWS_APPROVED,
        "News approved",
        format!("\"{}\" was approved by {}", title, auth_user.name),
        model.id,
    )
    .await?;

    txn.commit().await?;

    let body = news_response(&state.db, model).await?;
    Ok(ok("News approved successfully", body))
}

/// Reject a pending news item, optionally with a reason.
#[utoipa::path(
    post,
    path = "/admin/news/{id}/reject",
    tag = "News",
    operation_id = "rejectNews",
    summary = "Reject a pending news item",
    params(("id" = i32, Path, description = "News ID")),
    request_body = RejectNewsRequest,
    responses(
        (status = 200, description = "News rejected", body = ApiResponse<NewsResponse>),
        (status = 404, description = "News not found", body = ErrorBody),
        (status = 409, description = "Item is not pending", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(news_id = id, admin_id = auth_user.id))]
pub async fn reject_news(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<RejectNewsRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let reason = payload.reason.filter(|r| !r.trim().is_empty());

    let txn = state.db.begin().await?;
    let model = find_news(&txn, id).await?;

    if model.status != STATUS_PENDING {
        return Err(AppError::Conflict(format!(
            "Only pending news can be rejected (current status: {})",
            model.status
        )));
    }

    let title = model.title.clone();
    let mut active: news::ActiveModel = model.into();
    active.status = Set(STATUS_REJECTED.to_string());
    active.approved_by = Set(Some(auth_user.id));
    active.rejected_reason = Set(reason.clone());
    active.updated_at = Set(chrono::Utc::now());
    let model = active.update(&txn).await?;

    let mut message = format!("\"{}\" was rejected by {}", title, auth_user.name);
    if let Some(reason) = &reason {
        message.push_str(&format!(": {reason}"));
    }
    push_notification(&txn, KIND_NEWS_REJECTED, "News rejected", message, model.id).await?;

    txn.commit().await?;

    let body = news_response(&state.db, model).await?;
    Ok(ok("News rejected successfully", body))
}

/// Delete a news item with its images and backing files.
#[utoipa::path(
    delete,
    path = "/admin/news/{id}",
    tag = "News",
    operation_id = "deleteNews",
    summary = "Delete a news item",
    params(("id" = i32, Path, description = "News ID")),
    responses(
        (status = 200, description = "News deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "News not found", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(news_id = id))]
pub async fn delete_news(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let txn = state.db.begin().await?;
    let model = find_news(&txn, id).await?;

    let images = news_image::Entity::find()
        .filter(news_image::Column::NewsId.eq(model.id))
        .all(&txn)
        .await?;

    news_image::Entity::delete_many()
        .filter(news_image::Column::NewsId.eq(model.id))
        .exec(&txn)
        .await?;
    news::Entity::delete_by_id(model.id).exec(&txn).await?;

    txn.commit().await?;

    // File cleanup happens after commit and never fails the request.
    for image in images {
        if let Err(e) = upload::delete_image(&state.config.storage.upload_dir, &image.image_path).await
        {
            tracing::warn!("Failed to delete image file {}: {e}", image.image_path);
        }
    }

    Ok(ok("News deleted successfully", serde_json::json!({})))
}

/// Public list of approved news.
#[utoipa::path(
    get,
    path = "/news",
    tag = "News",
    operation_id = "listPublicNews",
    summary = "List approved news",
    params(PublicNewsQuery),
    responses(
        (status = 200, description = "Approved news", body = ApiResponse<Vec<NewsResponse>>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_public_news(
    State(state): State<AppState>,
    Query(query): Query<PublicNewsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut select = news::Entity::find().filter(news::Column::Status.eq(STATUS_APPROVED));

    if let Some(sub_category_id) = query.sub_category_id {
        select = select.filter(news::Column::SubCategoryId.eq(sub_category_id));
    } else if let Some(category_id) = query.category_id {
        let sub_ids: Vec<i32> = sub_category::Entity::find()
            .filter(sub_category::Column::CategoryId.eq(category_id))
            .all(&state.db)
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();
        select = select.filter(news::Column::SubCategoryId.is_in(sub_ids));
    }

    let (limit, offset) = page(query.limit, query.offset);
    let items = select
        .order_by_desc(news::Column::CreatedAt)
        .limit(limit)
        .offset(offset)
        .all(&state.db)
        .await?;

    let body = news_responses(&state.db, items).await?;
    Ok(ok("News fetched successfully", body))
}

/// Public fetch of a single approved item.
#[utoipa::path(
    get,
    path = "/news/{id}",
    tag = "News",
    operation_id = "getPublicNews",
    summary = "Get an approved news item",
    params(("id" = i32, Path, description = "News ID")),
    responses(
        (status = 200, description = "News item", body = ApiResponse<NewsResponse>),
        (status = 404, description = "News not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_public_news(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let model = find_news(&state.db, id).await?;
    if model.status != STATUS_APPROVED {
        return Err(AppError::NotFound("News not found".into()));
    }
    let body = news_response(&state.db, model).await?;
    Ok(ok("News fetched successfully", body))
}

/// Record one view on an approved item.
#[utoipa::path(
    post,
    path = "/news/{id}/views",
    tag = "News",
    operation_id = "incrementNewsViews",
    summary = "Increment the view counter",
    params(("id" = i32, Path, description = "News ID")),
    responses(
        (status = 200, description = "Counter incremented", body = ApiResponse<ViewsResponse>),
        (status = 404, description = "News not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn increment_views(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let result = news::Entity::update_many()
        .col_expr(
            news::Column::Views,
            Expr::col(news::Column::Views).add(1),
        )
        .filter(news::Column::Id.eq(id))
        .filter(news::Column::Status.eq(STATUS_APPROVED))
        .exec(&state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("News not found".into()));
    }

    let model = find_news(&state.db, id).await?;
    Ok(ok("View recorded", ViewsResponse { views: model.views }))
}

/// Admin list across all statuses with filters.
#[utoipa::path(
    get,
    path = "/admin/news",
    tag = "News",
    operation_id = "listAdminNews",
    summary = "List news with status and author filters",
    params(AdminNewsQuery),
    responses(
        (status = 200, description = "News list", body = ApiResponse<Vec<NewsResponse>>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_admin_news(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<AdminNewsQuery>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let mut select = news::Entity::find();
    if let Some(status) = &query.status {
        select = select.filter(news::Column::Status.eq(status));
    }
    if let Some(operator_id) = query.operator_id {
        select = select.filter(news::Column::OperatorId.eq(operator_id));
    }

    let (limit, offset) = page(query.limit, query.offset);
    let items = select
        .order_by_desc(news::Column::CreatedAt)
        .limit(limit)
        .offset(offset)
        .all(&state.db)
        .await?;

    let body = news_responses(&state.db, items).await?;
    Ok(ok("News fetched successfully", body))
}

/// Admin fetch of any item regardless of status.
#[utoipa::path(
    get,
    path = "/admin/news/{id}",
    tag = "News",
    operation_id = "getAdminNews",
    summary = "Get a news item in any status",
    params(("id" = i32, Path, description = "News ID")),
    responses(
        (status = 200, description = "News item", body = ApiResponse<NewsResponse>),
        (status = 404, description = "News not found", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn get_admin_news(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    let model = find_news(&state.db, id).await?;
    let body = news_response(&state.db, model).await?;
    Ok(ok("News fetched successfully", body))
}

/// Operator's own items, any status.
#[utoipa::path(
    get,
    path = "/operator/news",
    tag = "News",
    operation_id = "listOperatorNews",
    summary = "List the calling operator's news",
    params(AdminNewsQuery),
    responses(
        (status = 200, description = "News list", body = ApiResponse<Vec<NewsResponse>>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(operator_id = auth_user.id))]
pub async fn list_operator_news(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<AdminNewsQuery>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_operator()?;

    // The own-items filter is forced; the operator_id query param is ignored.
    let mut select = news::Entity::find().filter(news::Column::OperatorId.eq(auth_user.id));
    if let Some(status) = &query.status {
        select = select.filter(news::Column::Status.eq(status));
    }

    let (limit, offset) = page(query.limit, query.offset);
    let items = select
        .order_by_desc(news::Column::CreatedAt)
        .limit(limit)
        .offset(offset)
        .all(&state.db)
        .await?;

    let body = news_responses(&state.db, items).await?;
    Ok(ok("News fetched successfully", body))
}
