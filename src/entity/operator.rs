use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "operator")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Generated at creation; the operator's login credential.
    #[sea_orm(unique)]
    pub login_id: String,
    pub password: String,

    pub name: String,
    pub area: String,
    pub post: String,

    /// Inactive operators cannot authenticate.
    pub is_active: bool,

    #[sea_orm(has_many)]
    pub news: HasMany<super::news::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
