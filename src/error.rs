use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Always `false`; mirrors the success envelope shape.
    pub success: bool,
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `TOKEN_MISSING`,
    /// `TOKEN_INVALID`, `INVALID_CREDENTIALS`, `ACCOUNT_DISABLED`,
    /// `PERMISSION_DENIED`, `NOT_FOUND`, `CONFLICT`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Title is required")]
    pub message: String,
    /// Per-field messages, present only on 422 validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, String>>,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    /// Field-level validation failures, rendered as a 422 with a field map.
    FieldValidation(BTreeMap<String, String>),
    TokenMissing,
    TokenInvalid,
    InvalidCredentials,
    AccountDisabled,
    PermissionDenied(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    success: false,
                    code: "VALIDATION_ERROR",
                    message: msg,
                    errors: None,
                },
            ),
            AppError::FieldValidation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody {
                    success: false,
                    code: "VALIDATION_ERROR",
                    message: "Validation Error".into(),
                    errors: Some(errors),
                },
            ),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    success: false,
                    code: "TOKEN_MISSING",
                    message: "Authorization header is missing".into(),
                    errors: None,
                },
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    success: false,
                    code: "TOKEN_INVALID",
                    message: "Invalid or expired token".into(),
                    errors: None,
                },
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    success: false,
                    code: "INVALID_CREDENTIALS",
                    message: "Invalid credentials".into(),
                    errors: None,
                },
            ),
            AppError::AccountDisabled => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    success: false,
                    code: "ACCOUNT_DISABLED",
                    message: "Account is deactivated".into(),
                    errors: None,
                },
            ),
            AppError::PermissionDenied(msg) => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    success: false,
                    code: "PERMISSION_DENIED",
                    message: msg,
                    errors: None,
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    success: false,
                    code: "NOT_FOUND",
                    message: msg,
                    errors: None,
                },
            ),
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorBody {
                    success: false,
                    code: "CONFLICT",
                    message: msg,
                    errors: None,
                },
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                // Surfaced to the caller: this is an internal admin tool.
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        success: false,
                        code: "INTERNAL_ERROR",
                        message: detail,
                        errors: None,
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}
