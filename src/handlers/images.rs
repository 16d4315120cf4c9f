use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::news_image;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, Role};
use crate::models::news::{AttachImagesResponse, NewsImageResponse};
use crate::models::shared::{ApiResponse, ok};
use crate::state::AppState;
use crate::utils::upload;

use super::news::find_news;

/// Body cap for multipart image uploads; the per-file size limit from
/// config applies on top of this.
pub fn image_upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(32 * 1024 * 1024)
}

/// Attach uploaded images to a news item. Files are processed
/// independently; failures collect into `errors` without failing the
/// batch.
#[utoipa::path(
    post,
    path = "/news/{id}/images",
    tag = "News images",
    operation_id = "attachNewsImages",
    summary = "Attach images to a news item",
    params(("id" = i32, Path, description = "News ID")),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Batch processed", body = ApiResponse<AttachImagesResponse>),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "News not found", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(news_id = id))]
pub async fn attach_images(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let model = find_news(&state.db, id).await?;

    if auth_user.role == Role::Operator && model.operator_id != Some(auth_user.id) {
        return Err(AppError::PermissionDenied(
            "You can only attach images to your own news".into(),
        ));
    }

    let existing = news_image::Entity::find()
        .filter(news_image::Column::NewsId.eq(model.id))
        .count(&state.db)
        .await?;

    let news_dir = state.config.storage.upload_dir.join("news");
    let prefix = format!("news_{}", model.id);
    let mut attached: Vec<NewsImageResponse> = Vec::new();
    let mut errors: Vec<String> = Vec::new();
    let mut position = existing as i32;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("images") {
            continue;
        }
        let original_name = field.file_name().unwrap_or("upload").to_string();
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                errors.push(format!("{original_name}: failed to read upload: {e}"));
                continue;
            }
        };

        let stored = match upload::save_image(
            &news_dir,
            &prefix,
            &original_name,
            &bytes,
            state.config.storage.max_upload_size,
        )
        .await
        {
            Ok(stored) => stored,
            Err(e) => {
                errors.push(format!("{original_name}: {e}"));
                continue;
            }
        };

        let image_path = format!("news/{stored}");
        let image_url = format!(
            "{}/uploads/{image_path}",
            state.config.storage.public_base_url
        );
        let row = news_image::ActiveModel {
            news_id: Set(model.id),
            image_path: Set(image_path),
            image_url: Set(image_url),
            display_order: Set(position),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(&state.db)
        .await?;

        position += 1;
        attached.push(row.into());
    }

    let message = if errors.is_empty() {
        "Images uploaded successfully"
    } else {
        "Images uploaded with some failures"
    };
    Ok((
        StatusCode::CREATED,
        ok(message, AttachImagesResponse { attached, errors }),
    ))
}

/// Detach one image: delete the row and best-effort delete the file.
#[utoipa::path(
    delete,
    path = "/news/{news_id}/images/{image_id}",
    tag = "News images",
    operation_id = "detachNewsImage",
    summary = "Remove an image from a news item",
    params(
        ("news_id" = i32, Path, description = "News ID"),
        ("image_id" = i32, Path, description = "Image ID"),
    ),
    responses(
        (status = 200, description = "Image removed", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "News or image not found", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(news_id, image_id))]
pub async fn detach_image(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((news_id, image_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    let model = find_news(&state.db, news_id).await?;

    if auth_user.role == Role::Operator && model.operator_id != Some(auth_user.id) {
        return Err(AppError::PermissionDenied(
            "You can only remove images from your own news".into(),
        ));
    }

    let image = news_image::Entity::find_by_id(image_id)
        .filter(news_image::Column::NewsId.eq(model.id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Image not found".into()))?;

    news_image::Entity::delete_by_id(image.id)
        .exec(&state.db)
        .await?;

    // A missing file is fine; the row is the source of truth.
    if let Err(e) = upload::delete_image(&state.config.storage.upload_dir, &image.image_path).await {
        tracing::warn!("Failed to delete image file {}: {e}", image.image_path);
    }

    Ok(ok("Image removed successfully", serde_json::json!({})))
}
