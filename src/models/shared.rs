use std::collections::BTreeMap;

use axum::Json;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

/// Success envelope returned by all endpoints.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ApiResponse<T> {
    /// Always `true`; mirrors the error envelope shape.
    pub success: bool,
    #[schema(example = "News created successfully")]
    pub message: String,
    pub data: T,
}

/// Wrap a payload in the success envelope.
pub fn ok<T: Serialize>(message: &str, data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        message: message.to_string(),
        data,
    })
}

/// Serde helper for PATCH semantics on nullable fields.
///
/// * JSON field absent  => `None`          (don't update)
/// * JSON field = null  => `Some(None)`    (set to NULL)
/// * JSON field = value => `Some(Some(v))` (set to value)
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

/// Accumulates per-field validation messages for a 422 response.
#[derive(Default)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flag `field` when `value` is empty or whitespace-only.
    pub fn require(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.0
                .insert(field.to_string(), format!("The {field} field is required"));
        }
    }

    /// Flag `field` when `value` exceeds `max` characters.
    pub fn max_len(&mut self, field: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.0.insert(
                field.to_string(),
                format!("The {field} field must not exceed {max} characters"),
            );
        }
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    /// `Err(FieldValidation)` when any field was flagged.
    pub fn into_result(self) -> Result<(), AppError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::FieldValidation(self.0))
        }
    }
}
