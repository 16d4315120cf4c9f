use axum::{Json, extract::State};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{admin, operator};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::auth::{AccountSummary, LoginRequest, LoginResponse};
use crate::models::shared::{ApiResponse, ok};
use crate::state::AppState;
use crate::utils::{hash, jwt};

/// Handle login for both admins and operators.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    operation_id = "login",
    summary = "Log in as an admin or operator",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Wrong credentials (INVALID_CREDENTIALS)", body = ErrorBody),
        (status = 403, description = "Deactivated operator (ACCOUNT_DISABLED)", body = ErrorBody),
        (status = 422, description = "Missing fields (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(role = %payload.role))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    payload.validate()?;

    let identifier = payload.identifier.trim();

    let (id, subject, role, name, stored_hash) = match payload.role.as_str() {
        "admin" => {
            let admin = admin::Entity::find()
                .filter(
                    Condition::any()
                        .add(admin::Column::Username.eq(identifier))
                        .add(admin::Column::Email.eq(identifier)),
                )
                .one(&state.db)
                .await?
                .ok_or(AppError::InvalidCredentials)?;
            (
                admin.id,
                admin.username,
                "admin",
                admin.name,
                admin.password,
            )
        }
        _ => {
            let op = operator::Entity::find()
                .filter(operator::Column::LoginId.eq(identifier))
                .one(&state.db)
                .await?
                .ok_or(AppError::InvalidCredentials)?;
            if !op.is_active {
                return Err(AppError::AccountDisabled);
            }
            (op.id, op.login_id, "operator", op.name, op.password)
        }
    };

    if !hash::verify_password(&payload.password, &stored_hash) {
        return Err(AppError::InvalidCredentials);
    }

    let token = jwt::sign(
        &state.config.auth.jwt_secret,
        state.config.auth.token_ttl_hours,
        id,
        &subject,
        role,
        &name,
    )
    .map_err(|e| AppError::Internal(format!("JWT sign error: {e}")))?;

    Ok(ok(
        "Login successful",
        LoginResponse {
            token,
            user: AccountSummary {
                id,
                name,
                role: role.to_string(),
            },
        },
    ))
}
