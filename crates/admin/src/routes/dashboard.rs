//! Admin dashboard - stock and order overview.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use cybee_core::OrderStatus;

use crate::error::Result;
use crate::middleware::RequireAdminAuth;
use crate::routes::{orders, products};
use crate::state::AppState;

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin_email: String,
    pub product_count: usize,
    pub order_count: usize,
    pub pending_count: usize,
    pub low_stock: Vec<products::ProductRow>,
}

/// Dashboard page handler.
#[instrument(skip_all)]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<DashboardTemplate> {
    let all_products = products::load_products(&state).await?;
    let all_orders = orders::load_orders(&state).await?;

    let pending_count = all_orders
        .iter()
        .filter(|o| o.status == OrderStatus::Pending)
        .count();

    let low_stock = all_products
        .iter()
        .filter(|p| p.is_low_stock() || p.is_out_of_stock())
        .map(products::ProductRow::from)
        .collect();

    Ok(DashboardTemplate {
        admin_email: admin.email.to_string(),
        product_count: all_products.len(),
        order_count: all_orders.len(),
        pending_count,
        low_stock,
    })
}
