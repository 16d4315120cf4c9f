use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "news_image")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub news_id: i32,
    #[sea_orm(belongs_to, from = "news_id", to = "id")]
    pub news: HasOne<super::news::Entity>,

    /// Stored path relative to the upload directory.
    pub image_path: String,
    /// Absolute URL clients fetch the file from.
    pub image_url: String,
    /// Display ordering is (display_order asc, id asc).
    pub display_order: i32,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
