use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{category, news, sub_category};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::shared::{ApiResponse, ok};
use crate::models::sub_category::{
    CreateSubCategoryRequest, SubCategoryResponse, UpdateSubCategoryRequest,
};
use crate::state::AppState;
use crate::utils::slug;

use super::category::find_category;

async fn find_sub_category<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<sub_category::Model, AppError> {
    sub_category::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Sub-category not found".into()))
}

/// Slug uniqueness is scoped to the parent category.
async fn free_slug<C: ConnectionTrait>(
    db: &C,
    category_id: i32,
    name: &str,
    exclude_id: Option<i32>,
) -> Result<String, AppError> {
    let base = slug::derive_slug(name);
    for candidate in slug::candidates(&base) {
        let mut select = sub_category::Entity::find()
            .filter(sub_category::Column::CategoryId.eq(category_id))
            .filter(sub_category::Column::Slug.eq(&candidate));
        if let Some(id) = exclude_id {
            select = select.filter(sub_category::Column::Id.ne(id));
        }
        if select.count(db).await? == 0 {
            return Ok(candidate);
        }
    }
    Err(AppError::Internal(format!(
        "Could not derive a unique slug from '{base}'"
    )))
}

async fn with_category_name<C: ConnectionTrait>(
    db: &C,
    m: sub_category::Model,
) -> Result<SubCategoryResponse, AppError> {
    let category_name = category::Entity::find_by_id(m.category_id)
        .one(db)
        .await?
        .map(|c| c.name);
    Ok(SubCategoryResponse::from_parts(m, category_name))
}

#[utoipa::path(
    post,
    path = "/admin/sub-categories",
    tag = "Sub-categories",
    operation_id = "createSubCategory",
    summary = "Create a sub-category",
    request_body = CreateSubCategoryRequest,
    responses(
        (status = 201, description = "Sub-category created", body = ApiResponse<SubCategoryResponse>),
        (status = 404, description = "Parent category not found", body = ErrorBody),
        (status = 422, description = "Validation error", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_sub_category(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateSubCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    payload.validate()?;

    let parent = find_category(&state.db, payload.category_id).await?;

    let name = payload.name.trim().to_string();
    let slug = free_slug(&state.db, parent.id, &name, None).await?;

    let model = sub_category::ActiveModel {
        category_id: Set(parent.id),
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
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(
            "A sub-category with this slug already exists in the category".into(),
        ),
        _ => AppError::from(e),
    })?;

    let body = SubCategoryResponse::from_parts(model, Some(parent.name));
    Ok((
        StatusCode::CREATED,
        ok("Sub-category created successfully", body),
    ))
}

#[utoipa::path(
    put,
    path = "/admin/sub-categories/{id}",
    tag = "Sub-categories",
    operation_id = "updateSubCategory",
    summary = "Update a sub-category",
    params(("id" = i32, Path, description = "Sub-category ID")),
    request_body = UpdateSubCategoryRequest,
    responses(
        (status = 200, description = "Sub-category updated", body = ApiResponse<SubCategoryResponse>),
        (status = 404, description = "Sub-category not found", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(sub_category_id = id))]
pub async fn update_sub_category(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateSubCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    payload.validate()?;

    let model = find_sub_category(&state.db, id).await?;
    let mut category_id = model.category_id;
    if let Some(new_parent) = payload.category_id {
        find_category(&state.db, new_parent).await?;
        category_id = new_parent;
    }

    let mut active: sub_category::ActiveModel = model.into();
    active.category_id = Set(category_id);
    if let Some(name) = payload.name {
        let name = name.trim().to_string();
        active.slug = Set(free_slug(&state.db, category_id, &name, Some(id)).await?);
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }

    let model = active.update(&state.db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(
            "A sub-category with this slug already exists in the category".into(),
        ),
        _ => AppError::from(e),
    })?;
    let body = with_category_name(&state.db, model).await?;
    Ok(ok("Sub-category updated successfully", body))
}

#[utoipa::path(
    delete,
    path = "/admin/sub-categories/{id}",
    tag = "Sub-categories",
    operation_id = "deleteSubCategory",
    summary = "Delete a sub-category without dependents",
    params(("id" = i32, Path, description = "Sub-category ID")),
    responses(
        (status = 200, description = "Sub-category deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Sub-category not found", body = ErrorBody),
        (status = 409, description = "News still attached", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(sub_category_id = id))]
pub async fn delete_sub_category(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let model = find_sub_category(&state.db, id).await?;

    let dependents = news::Entity::find()
        .filter(news::Column::SubCategoryId.eq(model.id))
        .count(&state.db)
        .await?;
    if dependents > 0 {
        return Err(AppError::Conflict(
            "Cannot delete a sub-category that still has news".into(),
        ));
    }

    sub_category::Entity::delete_by_id(model.id)
        .exec(&state.db)
        .await?;
    Ok(ok("Sub-category deleted successfully", serde_json::json!({})))
}

#[utoipa::path(
    get,
    path = "/admin/sub-categories",
    tag = "Sub-categories",
    operation_id = "listAdminSubCategories",
    summary = "List all sub-categories",
    responses(
        (status = 200, description = "Sub-categories", body = ApiResponse<Vec<SubCategoryResponse>>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_admin_sub_categories(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    let items = sub_category::Entity::find()
        .order_by_asc(sub_category::Column::Name)
        .all(&state.db)
        .await?;
    let body = with_category_names(&state.db, items).await?;
    Ok(ok("Sub-categories fetched successfully", body))
}

/// Sub-categories of one parent category.
#[utoipa::path(
    get,
    path = "/admin/categories/{id}/sub-categories",
    tag = "Sub-categories",
    operation_id = "listCategorySubCategories",
    summary = "List sub-categories of a category",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Sub-categories", body = ApiResponse<Vec<SubCategoryResponse>>),
        (status = 404, description = "Category not found", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(category_id = id))]
pub async fn list_category_sub_categories(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    let parent = find_category(&state.db, id).await?;

    let items = sub_category::Entity::find()
        .filter(sub_category::Column::CategoryId.eq(parent.id))
        .order_by_asc(sub_category::Column::Name)
        .all(&state.db)
        .await?;
    let body: Vec<SubCategoryResponse> = items
        .into_iter()
        .map(|m| SubCategoryResponse::from_parts(m, Some(parent.name.clone())))
        .collect();
    Ok(ok("Sub-categories fetched successfully", body))
}

/// Public list of active sub-categories.
#[utoipa::path(
    get,
    path = "/sub-categories",
    tag = "Sub-categories",
    operation_id = "listPublicSubCategories",
    summary = "List active sub-categories",
    responses(
        (status = 200, description = "Sub-categories", body = ApiResponse<Vec<SubCategoryResponse>>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_public_sub_categories(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let items = sub_category::Entity::find()
        .filter(sub_category::Column::IsActive.eq(true))
        .order_by_asc(sub_category::Column::Name)
        .all(&state.db)
        .await?;
    let body = with_category_names(&state.db, items).await?;
    Ok(ok("Sub-categories fetched successfully", body))
}

#[utoipa::path(
    get,
    path = "/sub-categories/{id}",
    tag = "Sub-categories",
    operation_id = "getPublicSubCategory",
    summary = "Get an active sub-category",
    params(("id" = i32, Path, description = "Sub-category ID")),
    responses(
        (status = 200, description = "Sub-category", body = ApiResponse<SubCategoryResponse>),
        (status = 404, description = "Sub-category not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_public_sub_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let model = find_sub_category(&state.db, id).await?;
    if !model.is_active {
        return Err(AppError::NotFound("Sub-category not found".into()));
    }
    let body = with_category_name(&state.db, model).await?;
    Ok(ok("Sub-category fetched successfully", body))
}

async fn with_category_names<C: ConnectionTrait>(
    db: &C,
    items: Vec<sub_category::Model>,
) -> Result<Vec<SubCategoryResponse>, AppError> {
    let category_ids: Vec<i32> = items.iter().map(|s| s.category_id).collect();
    let names: std::collections::HashMap<i32, String> = category::Entity::find()
        .filter(category::Column::Id.is_in(category_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    Ok(items
        .into_iter()
        .map(|m| {
            let name = names.get(&m.category_id).cloned();
            SubCategoryResponse::from_parts(m, name)
        })
        .collect())
}
