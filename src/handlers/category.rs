use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{category, sub_category};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::category::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest};
use crate::models::shared::{ApiResponse, ok};
use crate::state::AppState;
use crate::utils::slug;

pub(crate) async fn find_category<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<category::Model, AppError> {
    category::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".into()))
}

async fn free_slug<C: ConnectionTrait>(
    db: &C,
    name: &str,
    exclude_id: Option<i32>,
) -> Result<String, AppError> {
    let base = slug::derive_slug(name);
    for candidate in slug::candidates(&base) {
        let mut select = category::Entity::find().filter(category::Column::Slug.eq(&candidate));
        if let Some(id) = exclude_id {
            select = select.filter(category::Column::Id.ne(id));
        }
        if select.count(db).await? == 0 {
            return Ok(candidate);
        }
    }
    Err(AppError::Internal(format!(
        "Could not derive a unique slug from '{base}'"
    )))
}

#[utoipa::path(
    post,
    path = "/admin/categories",
    tag = "Categories",
    operation_id = "createCategory",
    summary = "Create a category",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryResponse>),
        (status = 409, description = "Slug already taken", body = ErrorBody),
        (status = 422, description = "Validation error", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_category(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    payload.validate()?;

    let name = payload.name.trim().to_string();
    let slug = free_slug(&state.db, &name, None).await?;

    let model = category::ActiveModel {
        name: Set(name),
        slug: Set(slug),
        description: Set(payload.description),
        is_active: Set(payload.is_active),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("A category with this slug already exists".into())
        }
        _ => AppError::from(e),
    })?;

    Ok((
        StatusCode::CREATED,
        ok("Category created successfully", CategoryResponse::from(model)),
    ))
}

#[utoipa::path(
    put,
    path = "/admin/categories/{id}",
    tag = "Categories",
    operation_id = "updateCategory",
    summary = "Update a category",
    params(("id" = i32, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<CategoryResponse>),
        (status = 404, description = "Category not found", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(category_id = id))]
pub async fn update_category(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    payload.validate()?;

    let model = find_category(&state.db, id).await?;
    let mut active: category::ActiveModel = model.into();

    if let Some(name) = payload.name {
        let name = name.trim().to_string();
        active.slug = Set(free_slug(&state.db, &name, Some(id)).await?);
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }

    let model = active.update(&state.db).await?;
    Ok(ok("Category updated successfully", CategoryResponse::from(model)))
}

#[utoipa::path(
    delete,
    path = "/admin/categories/{id}",
    tag = "Categories",
    operation_id = "deleteCategory",
    summary = "Delete a category without dependents",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Category not found", body = ErrorBody),
        (status = 409, description = "Sub-categories still attached", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(category_id = id))]
pub async fn delete_category(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let model = find_category(&state.db, id).await?;

    let dependents = sub_category::Entity::find()
        .filter(sub_category::Column::CategoryId.eq(model.id))
        .count(&state.db)
        .await?;
    if dependents > 0 {
        return Err(AppError::Conflict(
            "Cannot delete a category that still has sub-categories".into(),
        ));
    }

    category::Entity::delete_by_id(model.id)
        .exec(&state.db)
        .await?;
    Ok(ok("Category deleted successfully", serde_json::json!({})))
}

#[utoipa::path(
    get,
    path = "/admin/categories",
    tag = "Categories",
    operation_id = "listAdminCategories",
    summary = "List all categories",
    responses(
        (status = 200, description = "Categories", body = ApiResponse<Vec<CategoryResponse>>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_admin_categories(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let items = category::Entity::find()
        .order_by_asc(category::Column::Name)
        .all(&state.db)
        .await?;
    let body: Vec<CategoryResponse> = items.into_iter().map(Into::into).collect();
    Ok(ok("Categories fetched successfully", body))
}

/// Public list of active categories.
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Categories",
    operation_id = "listPublicCategories",
    summary = "List active categories",
    responses(
        (status = 200, description = "Categories", body = ApiResponse<Vec<CategoryResponse>>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_public_categories(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let items = category::Entity::find()
        .filter(category::Column::IsActive.eq(true))
        .order_by_asc(category::Column::Name)
        .all(&state.db)
        .await?;
    let body: Vec<CategoryResponse> = items.into_iter().map(Into::into).collect();
    Ok(ok("Categories fetched successfully", body))
}

#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "Categories",
    operation_id = "getPublicCategory",
    summary = "Get an active category",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category", body = ApiResponse<CategoryResponse>),
        (status = 404, description = "Category not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_public_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let model = find_category(&state.db, id).await?;
    if !model.is_active {
        return Err(AppError::NotFound("Category not found".into()));
    }
    Ok(ok("Category fetched successfully", CategoryResponse::from(model)))
}
