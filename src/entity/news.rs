use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "news")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    pub sub_title: Option<String>,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,

    /// One of `pending`, `approved`, `rejected`.
    pub status: String,

    pub operator_id: Option<i32>,
    #[sea_orm(belongs_to, from = "operator_id", to = "id")]
    pub operator: HasOne<super::operator::Entity>,

    pub sub_category_id: Option<i32>,
    #[sea_orm(belongs_to, from = "sub_category_id", to = "id")]
    pub sub_category: HasOne<super::sub_category::Entity>,

    /// Admin who approved or rejected; unset while pending.
    pub approved_by: Option<i32>,
    #[sea_orm(belongs_to, from = "approved_by", to = "id")]
    pub approver: HasOne<super::admin::Entity>,
    pub approved_at: Option<DateTimeUtc>,
    pub rejected_reason: Option<String>,

    pub views: i32,

    #[sea_orm(has_many)]
    pub images: HasMany<super::news_image::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
