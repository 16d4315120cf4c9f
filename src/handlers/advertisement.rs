use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::advertisement;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::advertisement::{
    AdvertisementResponse, CropRequest, UpdateAdvertisementRequest,
};
use crate::models::shared::{ApiResponse, ok};
use crate::state::AppState;
use crate::utils::upload;

const AD_DIR: &str = "advertisements";

async fn find_advertisement<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<advertisement::Model, AppError> {
    advertisement::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Advertisement not found".into()))
}

fn public_url(state: &AppState, path: &str) -> String {
    format!("{}/uploads/{path}", state.config.storage.public_base_url)
}

/// Create an advertisement from a multipart form: an `image` file part
/// plus optional `title`, `link_url` and `display_order` text parts.
#[utoipa::path(
    post,
    path = "/admin/advertisements",
    tag = "Advertisements",
    operation_id = "createAdvertisement",
    summary = "Create an advertisement with a banner image",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Advertisement created", body = ApiResponse<AdvertisementResponse>),
        (status = 400, description = "Missing or invalid image", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart))]
pub async fn create_advertisement(
    auth_user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let mut title: Option<String> = None;
    let mut link_url: Option<String> = None;
    let mut display_order: i32 = 0;
    let mut image: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("image") => {
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
                image = Some((original_name, bytes.to_vec()));
            }
            Some("title") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Malformed title field: {e}")))?;
                title = Some(text).filter(|t| !t.trim().is_empty());
            }
            Some("link_url") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Malformed link_url field: {e}")))?;
                link_url = Some(text).filter(|t| !t.trim().is_empty());
            }
            Some("display_order") => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Malformed display_order field: {e}"))
                })?;
                display_order = text
                    .trim()
                    .parse()
                    .map_err(|_| AppError::Validation("display_order must be an integer".into()))?;
            }
            _ => {}
        }
    }

    let (original_name, bytes) =
        image.ok_or_else(|| AppError::Validation("The image field is required".into()))?;

    let stored = upload::save_image(
        &state.config.storage.upload_dir.join(AD_DIR),
        "ad",
        &original_name,
        &bytes,
        state.config.storage.max_upload_size,
    )
    .await
    .map_err(|e| AppError::Validation(e.to_string()))?;

    let image_path = format!("{AD_DIR}/{stored}");
    let image_url = public_url(&state, &image_path);

    let now = chrono::Utc::now();
    let model = advertisement::ActiveModel {
        title: Set(title),
        image_path: Set(image_path),
        image_url: Set(image_url),
        cropped_image_path: Set(None),
        cropped_image_url: Set(None),
        link_url: Set(link_url),
        is_active: Set(true),
        display_order: Set(display_order),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((
        StatusCode::CREATED,
        ok(
            "Advertisement created successfully",
            AdvertisementResponse::from(model),
        ),
    ))
}

#[utoipa::path(
    put,
    path = "/admin/advertisements/{id}",
    tag = "Advertisements",
    operation_id = "updateAdvertisement",
    summary = "Update advertisement metadata",
    params(("id" = i32, Path, description = "Advertisement ID")),
    request_body = UpdateAdvertisementRequest,
    responses(
        (status = 200, description = "Advertisement updated", body = ApiResponse<AdvertisementResponse>),
        (status = 404, description = "Advertisement not found", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(advertisement_id = id))]
pub async fn update_advertisement(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateAdvertisementRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    payload.validate()?;

    let model = find_advertisement(&state.db, id).await?;
    let mut active: advertisement::ActiveModel = model.into();

    if let Some(title) = payload.title {
        active.title = Set(title);
    }
    if let Some(link_url) = payload.link_url {
        active.link_url = Set(link_url);
    }
    if let Some(display_order) = payload.display_order {
        active.display_order = Set(display_order);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&state.db).await?;
    Ok(ok(
        "Advertisement updated successfully",
        AdvertisementResponse::from(model),
    ))
}

/// Crop the source banner into a derived `_cropped` file. The source
/// image is never modified; re-cropping replaces the derived file.
#[utoipa::path(
    post,
    path = "/admin/advertisements/{id}/crop",
    tag = "Advertisements",
    operation_id = "cropAdvertisement",
    summary = "Crop the banner into a derived image",
    params(("id" = i32, Path, description = "Advertisement ID")),
    request_body = CropRequest,
    responses(
        (status = 200, description = "Cropped", body = ApiResponse<AdvertisementResponse>),
        (status = 400, description = "Rectangle outside the image or undecodable source", body = ErrorBody),
        (status = 404, description = "Advertisement not found", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(advertisement_id = id))]
pub async fn crop_advertisement(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<CropRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    payload.validate()?;

    let model = find_advertisement(&state.db, id).await?;

    // Decode and re-encode happen off the async runtime.
    let upload_dir = state.config.storage.upload_dir.clone();
    let source = model.image_path.clone();
    let cropped = tokio::task::spawn_blocking(move || {
        upload::crop_image(
            &upload_dir,
            &source,
            payload.x,
            payload.y,
            payload.width,
            payload.height,
        )
    })
    .await
    .map_err(|e| AppError::Internal(format!("Crop task failed: {e}")))?
    .map_err(|e| AppError::Validation(e.to_string()))?;

    // The derived name keeps the source's directory prefix.
    let cropped_path = cropped;
    let cropped_url = public_url(&state, &cropped_path);

    let previous = model.cropped_image_path.clone();
    let mut active: advertisement::ActiveModel = model.into();
    active.cropped_image_path = Set(Some(cropped_path.clone()));
    active.cropped_image_url = Set(Some(cropped_url));
    active.updated_at = Set(chrono::Utc::now());
    let model = active.update(&state.db).await?;

    if let Some(previous) = previous
        && previous != cropped_path
        && let Err(e) = upload::delete_image(&state.config.storage.upload_dir, &previous).await
    {
        tracing::warn!("Failed to delete stale cropped file {previous}: {e}");
    }

    Ok(ok(
        "Advertisement cropped successfully",
        AdvertisementResponse::from(model),
    ))
}

#[utoipa::path(
    post,
    path = "/admin/advertisements/{id}/toggle-active",
    tag = "Advertisements",
    operation_id = "toggleAdvertisementActive",
    summary = "Toggle an advertisement's visibility",
    params(("id" = i32, Path, description = "Advertisement ID")),
    responses(
        (status = 200, description = "Flag toggled", body = ApiResponse<AdvertisementResponse>),
        (status = 404, description = "Advertisement not found", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(advertisement_id = id))]
pub async fn toggle_advertisement_active(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let model = find_advertisement(&state.db, id).await?;
    let next = !model.is_active;
    let mut active: advertisement::ActiveModel = model.into();
    active.is_active = Set(next);
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&state.db).await?;
    let message = if model.is_active {
        "Advertisement activated"
    } else {
        "Advertisement deactivated"
    };
    Ok(ok(message, AdvertisementResponse::from(model)))
}

#[utoipa::path(
    delete,
    path = "/admin/advertisements/{id}",
    tag = "Advertisements",
    operation_id = "deleteAdvertisement",
    summary = "Delete an advertisement and its files",
    params(("id" = i32, Path, description = "Advertisement ID")),
    responses(
        (status = 200, description = "Advertisement deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Advertisement not found", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(advertisement_id = id))]
pub async fn delete_advertisement(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let model = find_advertisement(&state.db, id).await?;
    advertisement::Entity::delete_by_id(model.id)
        .exec(&state.db)
        .await?;

    for path in std::iter::once(model.image_path).chain(model.cropped_image_path) {
        if let Err(e) = upload::delete_image(&state.config.storage.upload_dir, &path).await {
            tracing::warn!("Failed to delete advertisement file {path}: {e}");
        }
    }

    Ok(ok("Advertisement deleted successfully", serde_json::json!({})))
}

#[utoipa::path(
    get,
    path = "/admin/advertisements",
    tag = "Advertisements",
    operation_id = "listAdminAdvertisements",
    summary = "List all advertisements",
    responses(
        (status = 200, description = "Advertisements", body = ApiResponse<Vec<AdvertisementResponse>>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_admin_advertisements(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    let items = advertisement::Entity::find()
        .order_by_asc(advertisement::Column::DisplayOrder)
        .order_by_asc(advertisement::Column::Id)
        .all(&state.db)
        .await?;
    let body: Vec<AdvertisementResponse> = items.into_iter().map(Into::into).collect();
    Ok(ok("Advertisements fetched successfully", body))
}

async fn active_advertisements(state: &AppState) -> Result<Vec<AdvertisementResponse>, AppError> {
    let items = advertisement::Entity::find()
        .filter(advertisement::Column::IsActive.eq(true))
        .order_by_asc(advertisement::Column::DisplayOrder)
        .order_by_asc(advertisement::Column::Id)
        .all(&state.db)
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}

/// Public list of active advertisements.
#[utoipa::path(
    get,
    path = "/advertisements",
    tag = "Advertisements",
    operation_id = "listPublicAdvertisements",
    summary = "List active advertisements",
    responses(
        (status = 200, description = "Advertisements", body = ApiResponse<Vec<AdvertisementResponse>>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_public_advertisements(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let body = active_advertisements(&state).await?;
    Ok(ok("Advertisements fetched successfully", body))
}

/// Active advertisements for the operator console.
#[utoipa::path(
    get,
    path = "/operator/advertisements",
    tag = "Advertisements",
    operation_id = "listOperatorAdvertisements",
    summary = "List active advertisements",
    responses(
        (status = 200, description = "Advertisements", body = ApiResponse<Vec<AdvertisementResponse>>),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_operator_advertisements(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_operator()?;
    let body = active_advertisements(&state).await?;
    Ok(ok("Advertisements fetched successfully", body))
}

#[utoipa::path(
    get,
    path = "/operator/advertisements/{id}",
    tag = "Advertisements",
    operation_id = "getOperatorAdvertisement",
    summary = "Get an active advertisement",
    params(("id" = i32, Path, description = "Advertisement ID")),
    responses(
        (status = 200, description = "Advertisement", body = ApiResponse<AdvertisementResponse>),
        (status = 404, description = "Advertisement not found", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(advertisement_id = id))]
pub async fn get_operator_advertisement(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_operator()?;
    let model = find_advertisement(&state.db, id).await?;
    if !model.is_active {
        return Err(AppError::NotFound("Advertisement not found".into()));
    }
    Ok(ok(
        "Advertisement fetched successfully",
        AdvertisementResponse::from(model),
    ))
}
