use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::operator;
use crate::error::AppError;

use super::shared::FieldErrors;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateOperatorRequest {
    #[schema(example = "Ravi Kumar")]
    pub name: String,
    #[schema(example = "Chennai North")]
    pub area: String,
    #[schema(example = "Field Reporter")]
    pub post: String,
}

impl CreateOperatorRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = FieldErrors::new();
        errors.require("name", &self.name);
        errors.max_len("name", &self.name, 255);
        errors.require("area", &self.area);
        errors.max_len("area", &self.area, 255);
        errors.require("post", &self.post);
        errors.max_len("post", &self.post, 255);
        errors.into_result()
    }
}

#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct UpdateOperatorRequest {
    pub name: Option<String>,
    pub area: Option<String>,
    pub post: Option<String>,
}

impl UpdateOperatorRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.area.is_none() && self.post.is_none()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.is_empty() {
            return Err(AppError::Validation("No fields to update".into()));
        }
        let mut errors = FieldErrors::new();
        for (field, value) in [
            ("name", &self.name),
            ("area", &self.area),
            ("post", &self.post),
        ] {
            if let Some(value) = value {
                errors.require(field, value);
                errors.max_len(field, value, 255);
            }
        }
        errors.into_result()
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct OperatorResponse {
    pub id: i32,
    pub login_id: String,
    pub name: String,
    pub area: String,
    pub post: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<operator::Model> for OperatorResponse {
    fn from(m: operator::Model) -> Self {
        Self {
            id: m.id,
            login_id: m.login_id,
            name: m.name,
            area: m.area,
            post: m.post,
            is_active: m.is_active,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Returned once at creation; the plaintext password is never stored
/// or shown again.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CreatedOperatorResponse {
    #[serde(flatten)]
    pub operator: OperatorResponse,
    pub password: String,
}
