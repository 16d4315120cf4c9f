use serde::{Deserialize, Serialize};

use crate::error::AppError;

use super::shared::FieldErrors;

/// Login request for both actor kinds. Admins identify by username or
/// email; operators by their generated login id.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    /// `admin` or `operator`.
    #[schema(example = "operator")]
    pub role: String,
    /// Username/email (admin) or login id (operator).
    #[schema(example = "ravikumche123")]
    pub identifier: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = FieldErrors::new();
        errors.require("identifier", &self.identifier);
        errors.require("password", &self.password);
        if !matches!(self.role.as_str(), "admin" | "operator") {
            errors.push("role", "The role must be either admin or operator");
        }
        errors.into_result()
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AccountSummary {
    pub id: i32,
    pub name: String,
    #[schema(example = "operator")]
    pub role: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: AccountSummary,
}
