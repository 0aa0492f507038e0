mod admin_users;
mod health;
mod product_types;
mod products;
mod special_tags;

use axum::{Router, routing::get};

use crate::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .merge(product_type_routes())
        .merge(special_tag_routes())
        .merge(product_routes())
        .route("/admin/users", get(admin_users::index))
}

fn product_type_routes() -> Router<AppState> {
    Router::new()
        .route(product_types::INDEX_PATH, get(product_types::index))
        .route(
            "/admin/product-types/create",
            get(product_types::create_form).post(product_types::create),
        )
        .route(
            "/admin/product-types/edit/{id}",
            get(product_types::show).post(product_types::update),
        )
        .route("/admin/product-types/details/{id}", get(product_types::show))
        .route(
            "/admin/product-types/delete/{id}",
            get(product_types::show).post(product_types::delete),
        )
}

fn special_tag_routes() -> Router<AppState> {
    Router::new()
        .route(special_tags::INDEX_PATH, get(special_tags::index))
        .route(
            "/admin/special-tags/create",
            get(special_tags::create_form).post(special_tags::create),
        )
        .route(
            "/admin/special-tags/edit/{id}",
            get(special_tags::show).post(special_tags::update),
        )
        .route("/admin/special-tags/details/{id}", get(special_tags::show))
        .route(
            "/admin/special-tags/delete/{id}",
            get(special_tags::show).post(special_tags::delete),
        )
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route(products::INDEX_PATH, get(products::index))
        .route(
            "/admin/products/create",
            get(products::create_form).post(products::create),
        )
        .route(
            "/admin/products/edit/{id}",
            get(products::show).post(products::update),
        )
        .route("/admin/products/details/{id}", get(products::show))
        .route(
            "/admin/products/delete/{id}",
            get(products::show).post(products::delete),
        )
}
