use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::*;
use tracing::info;

use crate::entity::{admin, sub_category};
use crate::utils::hash;

const DEFAULT_USERNAME: &str = "admin";
const DEFAULT_EMAIL: &str = "admin@civicast.local";
const DEFAULT_NAME: &str = "Administrator";
const DEFAULT_PASSWORD: &str = "admin12345";

/// Seed the default admin account when no admin exists yet. The
/// password should be changed right after the first deployment.
pub async fn seed_default_admin(db: &DatabaseConnection) -> anyhow::Result<()> {
    if admin::Entity::find().count(db).await? > 0 {
        return Ok(());
    }

    let model = admin::ActiveModel {
        username: Set(DEFAULT_USERNAME.to_string()),
        email: Set(DEFAULT_EMAIL.to_string()),
        name: Set(DEFAULT_NAME.to_string()),
        password: Set(hash::hash_password(DEFAULT_PASSWORD)?),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let result = admin::Entity::insert(model)
        .on_conflict(
            sea_orm::sea_query::OnConflict::column(admin::Column::Username)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;

    match result {
        Ok(_) => {
            info!("Seeded default admin '{DEFAULT_USERNAME}'");
            Ok(())
        }
        Err(DbErr::RecordNotInserted) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Ensure database indexes that schema-sync can't express.
///
/// Sub-category slugs are unique per parent category rather than
/// globally, so the backstop for the create/update races is a
/// composite unique index created manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_sub_category_category_slug")
        .table(sub_category::Entity)
        .col(sub_category::Column::CategoryId)
        .col(sub_category::Column::Slug)
        .unique()
        .to_string(PostgresQueryBuilder);

    db.execute_unprepared(&stmt).await?;
    info!("Ensured index idx_sub_category_category_slug exists");
    Ok(())
}
