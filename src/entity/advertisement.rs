use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "advertisement")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: Option<String>,

    /// Banner image path relative to the upload directory.
    pub image_path: String,
    pub image_url: String,
    /// Cropped variant derived from `image_path`, when one exists.
    pub cropped_image_path: Option<String>,
    pub cropped_image_url: Option<String>,

    pub link_url: Option<String>,
    pub is_active: bool,
    pub display_order: i32,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
