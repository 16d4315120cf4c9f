use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::sub_category;
use crate::error::AppError;

use super::shared::{FieldErrors, double_option};

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateSubCategoryRequest {
    pub category_id: i32,
    #[schema(example = "City Council")]
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl CreateSubCategoryRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = FieldErrors::new();
        errors.require("name", &self.name);
        errors.max_len("name", &self.name, 255);
        if self.category_id <= 0 {
            errors.push("category_id", "The category_id field is required");
        }
        errors.into_result()
    }
}

#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct UpdateSubCategoryRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub category_id: Option<i32>,
}

impl UpdateSubCategoryRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.is_active.is_none()
            && self.category_id.is_none()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.is_empty() {
            return Err(AppError::Validation("No fields to update".into()));
        }
        let mut errors = FieldErrors::new();
        if let Some(name) = &self.name {
            errors.require("name", name);
            errors.max_len("name", name, 255);
        }
        errors.into_result()
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SubCategoryResponse {
    pub id: i32,
    pub category_id: i32,
    pub category_name: Option<String>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl SubCategoryResponse {
    pub fn from_parts(m: sub_category::Model, category_name: Option<String>) -> Self {
        Self {
            id: m.id,
            category_id: m.category_id,
            category_name,
            name: m.name,
            slug: m.slug,
            description: m.description,
            is_active: m.is_active,
            created_at: m.created_at,
        }
    }
}
