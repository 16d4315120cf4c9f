use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{news, operator};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::operator::{
    CreateOperatorRequest, CreatedOperatorResponse, OperatorResponse, UpdateOperatorRequest,
};
use crate::models::shared::{ApiResponse, ok};
use crate::state::AppState;
use crate::utils::{credentials, hash};

async fn find_operator<C: ConnectionTrait>(db: &C, id: i32) -> Result<operator::Model, AppError> {
    operator::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Operator not found".into()))
}

/// First generated login id not yet taken, retried a bounded number
/// of times since the random suffix can collide.
async fn free_login_id<C: ConnectionTrait>(
    db: &C,
    name: &str,
    area: &str,
) -> Result<String, AppError> {
    for _ in 0..credentials::MAX_LOGIN_ID_ATTEMPTS {
        let candidate = credentials::generate_login_id(name, area);
        let taken = operator::Entity::find()
            .filter(operator::Column::LoginId.eq(&candidate))
            .count(db)
            .await?
            > 0;
        if !taken {
            return Ok(candidate);
        }
    }
    Err(AppError::Internal(
        "Could not generate a unique login id".into(),
    ))
}

/// Provision an operator with generated credentials. The plaintext
/// password appears in this response only.
#[utoipa::path(
    post,
    path = "/admin/operators",
    tag = "Operators",
    operation_id = "createOperator",
    summary = "Create an operator with generated credentials",
    request_body = CreateOperatorRequest,
    responses(
        (status = 201, description = "Operator created", body = ApiResponse<CreatedOperatorResponse>),
        (status = 409, description = "Login id race lost", body = ErrorBody),
        (status = 422, description = "Validation error", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_operator(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateOperatorRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    payload.validate()?;

    let name = payload.name.trim().to_string();
    let area = payload.area.trim().to_string();

    let login_id = free_login_id(&state.db, &name, &area).await?;
    let password = credentials::generate_password();
    let password_hash = hash::hash_password(&password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {e}")))?;

    let now = chrono::Utc::now();
    let model = operator::ActiveModel {
        login_id: Set(login_id),
        password: Set(password_hash),
        name: Set(name),
        area: Set(area),
        post: Set(payload.post.trim().to_string()),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("Login id already taken, retry the request".into())
        }
        _ => AppError::from(e),
    })?;

    let body = CreatedOperatorResponse {
        operator: model.into(),
        password,
    };
    Ok((
        StatusCode::CREATED,
        ok("Operator created successfully", body),
    ))
}

#[utoipa::path(
    put,
    path = "/admin/operators/{id}",
    tag = "Operators",
    operation_id = "updateOperator",
    summary = "Update an operator's profile",
    params(("id" = i32, Path, description = "Operator ID")),
    request_body = UpdateOperatorRequest,
    responses(
        (status = 200, description = "Operator updated", body = ApiResponse<OperatorResponse>),
        (status = 404, description = "Operator not found", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(operator_id = id))]
pub async fn update_operator(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateOperatorRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    payload.validate()?;

    let model = find_operator(&state.db, id).await?;
    let mut active: operator::ActiveModel = model.into();

    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(area) = payload.area {
        active.area = Set(area.trim().to_string());
    }
    if let Some(post) = payload.post {
        active.post = Set(post.trim().to_string());
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&state.db).await?;
    Ok(ok(
        "Operator updated successfully",
        OperatorResponse::from(model),
    ))
}

/// Flip an operator's active flag; inactive operators cannot log in.
#[utoipa::path(
    post,
    path = "/admin/operators/{id}/toggle-active",
    tag = "Operators",
    operation_id = "toggleOperatorActive",
    summary = "Toggle whether an operator can log in",
    params(("id" = i32, Path, description = "Operator ID")),
    responses(
        (status = 200, description = "Flag toggled", body = ApiResponse<OperatorResponse>),
        (status = 404, description = "Operator not found", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(operator_id = id))]
pub async fn toggle_operator_active(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let model = find_operator(&state.db, id).await?;
    let next = !model.is_active;
    let mut active: operator::ActiveModel = model.into();
    active.is_active = Set(next);
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&state.db).await?;
    let message = if model.is_active {
        "Operator activated"
    } else {
        "Operator deactivated"
    };
    Ok(ok(message, OperatorResponse::from(model)))
}

#[utoipa::path(
    delete,
    path = "/admin/operators/{id}",
    tag = "Operators",
    operation_id = "deleteOperator",
    summary = "Delete an operator without news",
    params(("id" = i32, Path, description = "Operator ID")),
    responses(
        (status = 200, description = "Operator deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Operator not found", body = ErrorBody),
        (status = 409, description = "News still attributed", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(operator_id = id))]
pub async fn delete_operator(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let model = find_operator(&state.db, id).await?;

    let dependents = news::Entity::find()
        .filter(news::Column::OperatorId.eq(model.id))
        .count(&state.db)
        .await?;
    if dependents > 0 {
        return Err(AppError::Conflict(
            "Cannot delete an operator with attributed news".into(),
        ));
    }

    operator::Entity::delete_by_id(model.id)
        .exec(&state.db)
        .await?;
    Ok(ok("Operator deleted successfully", serde_json::json!({})))
}

#[utoipa::path(
    get,
    path = "/admin/operators",
    tag = "Operators",
    operation_id = "listOperators",
    summary = "List all operators",
    responses(
        (status = 200, description = "Operators", body = ApiResponse<Vec<OperatorResponse>>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_operators(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let items = operator::Entity::find()
        .order_by_asc(operator::Column::Id)
        .all(&state.db)
        .await?;
    let body: Vec<OperatorResponse> = items.into_iter().map(Into::into).collect();
    Ok(ok("Operators fetched successfully", body))
}

#[utoipa::path(
    get,
    path = "/admin/operators/{id}",
    tag = "Operators",
    operation_id = "getOperator",
    summary = "Get an operator",
    params(("id" = i32, Path, description = "Operator ID")),
    responses(
        (status = 200, description = "Operator", body = ApiResponse<OperatorResponse>),
        (status = 404, description = "Operator not found", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(operator_id = id))]
pub async fn get_operator(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    let model = find_operator(&state.db, id).await?;
    Ok(ok(
        "Operator fetched successfully",
        OperatorResponse::from(model),
    ))
}
