mod admin;
mod health;
mod login;
mod products;
mod register;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::AppState;

pub fn create_router() -> Router<AppState> {
    let admin_routes = Router::new()
        .route("/products", post(admin::create_product))
        .route("/products/upload", post(admin::upload_product))
        .route(
            "/products/{id}",
            put(admin::update_product).delete(admin::delete_product),
        )
        .route("/images/normalize", post(admin::normalize_image))
        .layer(middleware::from_fn(crate::middleware::admin_middleware));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/auth/register", post(register::register_user))
        .route("/auth/login", post(login::login_user))
        .route("/products", get(products::list_products))
        .route("/products/{id}", get(products::get_product))
        .route(
            "/categories/{category}/products",
            get(products::category_products),
        )
        .nest("/admin", admin_routes)
}
