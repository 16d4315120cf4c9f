use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Account role carried inside the JWT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Operator,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Operator => "operator",
        }
    }
}

/// Authenticated account extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication.
/// Role checks happen via `require_admin()` in the handler body.
pub struct AuthUser {
    pub id: i32,
    pub subject: String,
    pub role: Role,
    pub name: String,
}

impl AuthUser {
    /// Returns `Ok(())` for admins, `Err(PermissionDenied)` otherwise.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(AppError::PermissionDenied(
                "Admin access required".to_string(),
            ))
        }
    }

    /// Returns `Ok(())` for operators, `Err(PermissionDenied)` otherwise.
    pub fn require_operator(&self) -> Result<(), AppError> {
        if self.role == Role::Operator {
            Ok(())
        } else {
            Err(AppError::PermissionDenied(
                "Operator access required".to_string(),
            ))
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let claims = jwt::verify(&state.config.auth.jwt_secret, token)
            .map_err(|_| AppError::TokenInvalid)?;

        let role = match claims.role.as_str() {
            "admin" => Role::Admin,
            "operator" => Role::Operator,
            _ => return Err(AppError::TokenInvalid),
        };

        Ok(AuthUser {
            id: claims.uid,
            subject: claims.sub,
            role,
            name: claims.name,
        })
    }
}
