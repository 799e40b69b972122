//! HTTP route handlers for the admin console.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                      - Dashboard
//! GET  /health                - Health check
//!
//! # Auth
//! GET  /auth/login            - Login page
//! POST /auth/login            - Login action
//! POST /auth/logout           - Logout action
//!
//! # Products
//! GET  /products              - Product list
//! GET  /products/new          - Create form
//! POST /products              - Create action
//! GET  /products/{id}/edit    - Edit form
//! POST /products/{id}         - Update action
//! POST /products/{id}/delete  - Delete action
//!
//! # Orders
//! GET  /orders                - Order list (?status= filter)
//! POST /orders/{id}/status    - Status dropdown action
//! POST /orders/{id}/delete    - Delete action (restores stock)
//!
//! # Settings
//! GET  /settings              - Attributes and currency form
//! POST /settings              - Save action
//! ```

pub mod auth;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod settings;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/new", get(products::new))
        .route("/{id}", post(products::update))
        .route("/{id}/edit", get(products::edit))
        .route("/{id}/delete", post(products::delete))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}/status", post(orders::update_status))
        .route("/{id}/delete", post(orders::delete))
}

/// Create all routes for the admin console.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .nest("/products", product_routes())
        .nest("/orders", order_routes())
        .route("/settings", get(settings::show).post(settings::save))
        .nest("/auth", auth_routes())
}
