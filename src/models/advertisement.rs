use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::advertisement;
use crate::error::AppError;

use super::shared::double_option;

#[derive(Serialize, utoipa::ToSchema)]
pub struct AdvertisementResponse {
    pub id: i32,
    pub title: Option<String>,
    pub image_path: String,
    pub image_url: String,
    pub cropped_image_path: Option<String>,
    pub cropped_image_url: Option<String>,
    pub link_url: Option<String>,
    pub is_active: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<advertisement::Model> for AdvertisementResponse {
    fn from(m: advertisement::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            image_path: m.image_path,
            image_url: m.image_url,
            cropped_image_path: m.cropped_image_path,
            cropped_image_url: m.cropped_image_url,
            link_url: m.link_url,
            is_active: m.is_active,
            display_order: m.display_order,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct UpdateAdvertisementRequest {
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub link_url: Option<Option<String>>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

impl UpdateAdvertisementRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.link_url.is_none()
            && self.display_order.is_none()
            && self.is_active.is_none()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.is_empty() {
            return Err(AppError::Validation("No fields to update".into()));
        }
        Ok(())
    }
}

/// Pixel rectangle for the crop operation, relative to the source image.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CropRequest {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.width == 0 || self.height == 0 {
            return Err(AppError::Validation(
                "Crop width and height must be positive".into(),
            ));
        }
        Ok(())
    }
}
