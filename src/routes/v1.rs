use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(public_routes())
        .merge(shared_routes())
        .nest("/operator", operator_routes())
        .nest("/admin", admin_routes())
}

/// Unauthenticated read surface plus login.
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/news", get(handlers::news::list_public_news))
        .route("/news/{id}", get(handlers::news::get_public_news))
        .route("/news/{id}/views", post(handlers::news::increment_views))
        .route("/categories", get(handlers::category::list_public_categories))
        .route("/categories/{id}", get(handlers::category::get_public_category))
        .route(
            "/sub-categories",
            get(handlers::sub_category::list_public_sub_categories),
        )
        .route(
            "/sub-categories/{id}",
            get(handlers::sub_category::get_public_sub_category),
        )
        .route(
            "/advertisements",
            get(handlers::advertisement::list_public_advertisements),
        )
}

/// Routes open to both roles; ownership rules apply inside the handlers.
fn shared_routes() -> Router<AppState> {
    Router::new()
        .route("/news", post(handlers::news::create_news))
        .route("/news/{id}", put(handlers::news::update_news))
        .route(
            "/news/{id}/images",
            post(handlers::images::attach_images)
                .layer(handlers::images::image_upload_body_limit()),
        )
        .route(
            "/news/{news_id}/images/{image_id}",
            delete(handlers::images::detach_image),
        )
}

fn operator_routes() -> Router<AppState> {
    Router::new()
        .route("/news", get(handlers::news::list_operator_news))
        .route(
            "/advertisements",
            get(handlers::advertisement::list_operator_advertisements),
        )
        .route(
            "/advertisements/{id}",
            get(handlers::advertisement::get_operator_advertisement),
        )
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .nest("/news", admin_news_routes())
        .nest("/categories", admin_category_routes())
        .nest("/sub-categories", admin_sub_category_routes())
        .nest("/operators", admin_operator_routes())
        .nest("/advertisements", admin_advertisement_routes())
        .route("/dashboard", get(handlers::dashboard::stats))
        .nest("/notifications", admin_notification_routes())
}

fn admin_news_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::news::list_admin_news))
        .route(
            "/{id}",
            get(handlers::news::get_admin_news).delete(handlers::news::delete_news),
        )
        .route("/{id}/approve", post(handlers::news::approve_news))
        .route("/{id}/reject", post(handlers::news::reject_news))
}

fn admin_category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::category::list_admin_categories)
                .post(handlers::category::create_category),
        )
        .route(
            "/{id}",
            put(handlers::category::update_category).delete(handlers::category::delete_category),
        )
        .route(
            "/{id}/sub-categories",
            get(handlers::sub_category::list_category_sub_categories),
        )
}

fn admin_sub_category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::sub_category::list_admin_sub_categories)
                .post(handlers::sub_category::create_sub_category),
        )
        .route(
            "/{id}",
            put(handlers::sub_category::update_sub_category)
                .delete(handlers::sub_category::delete_sub_category),
        )
}

fn admin_operator_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::operator::list_operators).post(handlers::operator::create_operator),
        )
        .route(
            "/{id}",
            get(handlers::operator::get_operator)
                .put(handlers::operator::update_operator)
                .delete(handlers::operator::delete_operator),
        )
        .route(
            "/{id}/toggle-active",
            post(handlers::operator::toggle_operator_active),
        )
}

fn admin_advertisement_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::advertisement::list_admin_advertisements)
                .post(handlers::advertisement::create_advertisement)
                .layer(handlers::images::image_upload_body_limit()),
        )
        .route(
            "/{id}",
            put(handlers::advertisement::update_advertisement)
                .delete(handlers::advertisement::delete_advertisement),
        )
        .route(
            "/{id}/crop",
            post(handlers::advertisement::crop_advertisement),
        )
        .route(
            "/{id}/toggle-active",
            post(handlers::advertisement::toggle_advertisement_active),
        )
}

fn admin_notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::notification::list_notifications))
        .route("/mark-read", post(handlers::notification::mark_read))
        .route(
            "/mark-all-read",
            post(handlers::notification::mark_all_read),
        )
}
