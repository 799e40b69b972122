//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                 - Product listing (home)
//! GET  /health           - Health check
//!
//! # Products
//! GET  /products         - Product listing
//! GET  /products/{id}    - Product detail
//!
//! # Cart (HTMX fragments)
//! GET  /cart             - Cart page
//! POST /cart/add         - Add one unit (returns count badge, triggers cart-updated)
//! POST /cart/update      - Update quantity (returns cart_items fragment)
//! POST /cart/remove      - Remove item (returns cart_items fragment)
//! POST /cart/clear       - Empty the cart (returns cart_items fragment)
//! GET  /cart/count       - Cart count badge (fragment)
//!
//! # Auth
//! GET  /auth/login       - Login page
//! POST /auth/login       - Login action
//! GET  /auth/register    - Register page
//! POST /auth/register    - Register action
//! POST /auth/logout      - Logout action
//! ```

pub mod auth;
pub mod cart;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page doubles as the product listing
        .route("/", get(products::index))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/auth", auth_routes())
}
