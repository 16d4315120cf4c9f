use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{news, news_image};
use crate::error::AppError;

use super::shared::{FieldErrors, double_option};

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_REJECTED: &str = "rejected";

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateNewsRequest {
    #[schema(example = "Flood relief camps open in the northern wards")]
    pub title: String,
    pub sub_title: Option<String>,
    pub content: String,
    pub sub_category_id: Option<i32>,
}

impl CreateNewsRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = FieldErrors::new();
        errors.require("title", &self.title);
        errors.max_len("title", &self.title, 255);
        errors.require("content", &self.content);
        if let Some(sub_title) = &self.sub_title {
            errors.max_len("sub_title", sub_title, 255);
        }
        errors.into_result()
    }
}

#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct UpdateNewsRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub sub_title: Option<Option<String>>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub sub_category_id: Option<Option<i32>>,
}

impl UpdateNewsRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.sub_title.is_none()
            && self.content.is_none()
            && self.sub_category_id.is_none()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.is_empty() {
            return Err(AppError::Validation("No fields to update".into()));
        }
        let mut errors = FieldErrors::new();
        if let Some(title) = &self.title {
            errors.require("title", title);
            errors.max_len("title", title, 255);
        }
        if let Some(Some(sub_title)) = &self.sub_title {
            errors.max_len("sub_title", sub_title, 255);
        }
        if let Some(content) = &self.content {
            errors.require("content", content);
        }
        errors.into_result()
    }
}

#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct RejectNewsRequest {
    #[schema(example = "Unverified sources")]
    pub reason: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct NewsImageResponse {
    pub id: i32,
    pub image_path: String,
    pub image_url: String,
    pub display_order: i32,
}

impl From<news_image::Model> for NewsImageResponse {
    fn from(m: news_image::Model) -> Self {
        Self {
            id: m.id,
            image_path: m.image_path,
            image_url: m.image_url,
            display_order: m.display_order,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct NewsResponse {
    pub id: i32,
    pub title: String,
    pub sub_title: Option<String>,
    pub slug: String,
    pub content: String,
    #[schema(example = "pending")]
    pub status: String,
    pub views: i32,
    pub operator_id: Option<i32>,
    pub operator_name: Option<String>,
    pub sub_category_id: Option<i32>,
    pub sub_category_name: Option<String>,
    pub approved_by: Option<i32>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_reason: Option<String>,
    pub images: Vec<NewsImageResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewsResponse {
    pub fn from_parts(
        m: news::Model,
        operator_name: Option<String>,
        sub_category_name: Option<String>,
        images: Vec<news_image::Model>,
    ) -> Self {
        Self {
            id: m.id,
            title: m.title,
            sub_title: m.sub_title,
            slug: m.slug,
            content: m.content,
            status: m.status,
            views: m.views,
            operator_id: m.operator_id,
            operator_name,
            sub_category_id: m.sub_category_id,
            sub_category_name,
            approved_by: m.approved_by,
            approved_at: m.approved_at,
            rejected_reason: m.rejected_reason,
            images: images.into_iter().map(Into::into).collect(),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct PublicNewsQuery {
    pub category_id: Option<i32>,
    pub sub_category_id: Option<i32>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct AdminNewsQuery {
    /// Filter by workflow status (`pending`, `approved`, `rejected`).
    pub status: Option<String>,
    pub operator_id: Option<i32>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ViewsResponse {
    pub views: i32,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AttachImagesResponse {
    pub attached: Vec<NewsImageResponse>,
    /// Per-file failure messages; present even when some files succeed.
    pub errors: Vec<String>,
}
