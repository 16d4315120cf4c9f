pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod seed;
pub mod state;
pub mod utils;

use std::time::Duration;

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CivicCast CMS API",
        version = "1.0.0",
        description = "REST backend for a local-news publisher: news workflow, categories, operators, advertisements"
    ),
    servers((url = "/api/v1")),
    paths(
        handlers::auth::login,
        handlers::news::create_news,
        handlers::news::update_news,
        handlers::news::approve_news,
        handlers::news::reject_news,
        handlers::news::delete_news,
        handlers::news::list_public_news,
        handlers::news::get_public_news,
        handlers::news::increment_views,
        handlers::news::list_admin_news,
        handlers::news::get_admin_news,
        handlers::news::list_operator_news,
        handlers::images::attach_images,
        handlers::images::detach_image,
        handlers::category::create_category,
        handlers::category::update_category,
        handlers::category::delete_category,
        handlers::category::list_admin_categories,
        handlers::category::list_public_categories,
        handlers::category::get_public_category,
        handlers::sub_category::create_sub_category,
        handlers::sub_category::update_sub_category,
        handlers::sub_category::delete_sub_category,
        handlers::sub_category::list_admin_sub_categories,
        handlers::sub_category::list_category_sub_categories,
        handlers::sub_category::list_public_sub_categories,
        handlers::sub_category::get_public_sub_category,
        handlers::operator::create_operator,
        handlers::operator::update_operator,
        handlers::operator::toggle_operator_active,
        handlers::operator::delete_operator,
        handlers::operator::list_operators,
        handlers::operator::get_operator,
        handlers::advertisement::create_advertisement,
        handlers::advertisement::update_advertisement,
        handlers::advertisement::crop_advertisement,
        handlers::advertisement::toggle_advertisement_active,
        handlers::advertisement::delete_advertisement,
        handlers::advertisement::list_admin_advertisements,
        handlers::advertisement::list_public_advertisements,
        handlers::advertisement::list_operator_advertisements,
        handlers::advertisement::get_operator_advertisement,
        handlers::notification::list_notifications,
        handlers::notification::mark_read,
        handlers::notification::mark_all_read,
        handlers::dashboard::stats,
    ),
    tags(
        (name = "Auth", description = "Admin and operator authentication"),
        (name = "News", description = "News workflow: create, moderate, publish"),
        (name = "News images", description = "Image attachments on news items"),
        (name = "Categories", description = "Category management"),
        (name = "Sub-categories", description = "Sub-category management"),
        (name = "Operators", description = "Operator provisioning"),
        (name = "Advertisements", description = "Advertisement banners"),
        (name = "Notifications", description = "Admin notification inbox"),
        (name = "Dashboard", description = "Aggregate statistics"),
    ),
    modifiers(&SecurityAddon),
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(config.server.cors.max_age));

    let origins = &config.server.cors.allow_origins;
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        layer.allow_origin(parsed)
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let cors = cors_layer(&state.config);
    let uploads = ServeDir::new(&state.config.storage.upload_dir);

    axum::Router::new()
        .nest("/api", routes::api_routes())
        .nest_service("/uploads", uploads)
        .layer(cors)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
