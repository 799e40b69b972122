//! Order list and manual status updates.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::instrument;

use cybee_core::{LineItem, Order, OrderId, OrderStatus};
use cybee_firebase::Document;

use crate::error::{AdminError, Result};
use crate::middleware::RequireAdminAuth;
use crate::routes::products::PRODUCTS_COLLECTION;
use crate::state::AppState;

/// The orders collection.
pub const ORDERS_COLLECTION: &str = "orders";

/// Order row for the list template.
#[derive(Debug, Clone)]
pub struct OrderRow {
    pub id: String,
    pub email: String,
    pub placed_at: String,
    pub item_count: u32,
    pub total: String,
    /// Stored status string, also used as a CSS class suffix.
    pub status: String,
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            email: order.email.clone().unwrap_or_else(|| "guest".to_owned()),
            placed_at: order
                .timestamp
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            item_count: order.items.iter().map(|i| i.quantity).sum(),
            total: format!("{:.2}", order.total),
            status: order.status.as_str().to_owned(),
        }
    }
}

/// Status filter query parameters.
#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    pub status: Option<String>,
}

/// Status dropdown form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

fn order_from_document(doc: Document) -> Result<Order> {
    let id = OrderId::new(doc.id());
    let mut order: Order = serde_json::from_value(serde_json::Value::Object(doc.into_json()))
        .map_err(cybee_firebase::FirebaseError::Parse)?;
    order.id = id;
    Ok(order)
}

/// Load all orders, newest first. Malformed documents are skipped.
pub async fn load_orders(state: &AppState) -> Result<Vec<Order>> {
    let docs = state.firestore().list_documents(ORDERS_COLLECTION).await?;

    let mut orders: Vec<Order> = docs
        .into_iter()
        .filter_map(|doc| match order_from_document(doc) {
            Ok(order) => Some(order),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed order document");
                None
            }
        })
        .collect();

    // Undated orders sort last.
    orders.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(orders)
}

/// Order list page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub orders: Vec<OrderRow>,
    pub statuses: [OrderStatus; 5],
    /// The active status filter as its stored string, empty for "all".
    pub filter_value: String,
}

/// Order list page, optionally filtered by status.
#[instrument(skip_all)]
pub async fn index(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> Result<OrdersIndexTemplate> {
    let filter = match query.status.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<OrderStatus>()
                .map_err(|e| AdminError::BadRequest(e.to_string()))?,
        ),
    };

    let orders = load_orders(&state).await?;
    let rows = orders
        .iter()
        .filter(|o| filter.is_none_or(|f| o.status == f))
        .map(OrderRow::from)
        .collect();

    Ok(OrdersIndexTemplate {
        orders: rows,
        statuses: OrderStatus::ALL,
        filter_value: filter.map(|f| f.as_str().to_owned()).unwrap_or_default(),
    })
}

/// Advance an order's status from the dropdown.
///
/// Writes only the `status` field; the rest of the order document is never
/// rewritten from the console.
#[instrument(skip(state, form))]
pub async fn update_status(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect> {
    let status: OrderStatus = form
        .status
        .parse()
        .map_err(|e: cybee_core::OrderStatusError| AdminError::BadRequest(e.to_string()))?;

    let mut fields = serde_json::Map::new();
    fields.insert(
        "status".to_owned(),
        serde_json::Value::String(status.as_str().to_owned()),
    );

    state
        .firestore()
        .patch_document(ORDERS_COLLECTION, &id, fields, &["status"])
        .await?;

    tracing::info!(%id, %status, "order status updated");
    Ok(Redirect::to("/orders"))
}

/// Delete an order, restoring the stock its line items consumed.
///
/// Stock is decremented when an order is placed, so deletion adds each
/// item's quantity back onto its product before removing the order
/// document. A product that no longer exists, or whose restock write
/// fails, is logged and skipped so one broken product cannot strand the
/// order.
#[instrument(skip(state))]
pub async fn delete(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let Some(doc) = state.firestore().get_document(ORDERS_COLLECTION, &id).await? else {
        return Err(AdminError::NotFound(format!("order {id}")));
    };
    let order = order_from_document(doc)?;

    for item in &order.items {
        if item.id.as_str().is_empty() {
            continue;
        }
        if let Err(e) = restock_product(&state, item).await {
            tracing::warn!(product = %item.id, error = %e, "failed to restore stock");
        }
    }

    state
        .firestore()
        .delete_document(ORDERS_COLLECTION, &id)
        .await?;

    tracing::info!(%id, "order deleted, stock restored");
    Ok(Redirect::to("/orders"))
}

/// Add one line item's quantity back onto its product's stock.
///
/// Writes only the `stock` field. A missing product is not an error; the
/// catalog may have changed since the order was placed.
async fn restock_product(state: &AppState, item: &LineItem) -> Result<()> {
    let Some(doc) = state
        .firestore()
        .get_document(PRODUCTS_COLLECTION, item.id.as_str())
        .await?
    else {
        return Ok(());
    };

    let restored = restored_stock(doc.field_json("stock"), item.quantity);
    let mut fields = serde_json::Map::new();
    fields.insert("stock".to_owned(), serde_json::Value::Number(restored.into()));

    state
        .firestore()
        .patch_document(PRODUCTS_COLLECTION, item.id.as_str(), fields, &["stock"])
        .await?;

    tracing::info!(product = %item.id, restored, "stock restored");
    Ok(())
}

/// Restored stock count: current stock plus the quantity being returned.
///
/// Tolerates missing or string-typed stock values the way the rest of the
/// console tolerates hand-edited documents; anything unreadable counts as
/// zero on hand.
fn restored_stock(stock_field: Option<serde_json::Value>, quantity: u32) -> u32 {
    let current = match stock_field {
        Some(serde_json::Value::Number(n)) => {
            n.as_u64().and_then(|n| u32::try_from(n).ok()).unwrap_or(0)
        }
        Some(serde_json::Value::String(s)) => s.parse().unwrap_or(0),
        _ => 0,
    };
    current.saturating_add(quantity)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn order(id: &str, day: Option<u32>) -> Order {
        Order {
            id: OrderId::new(id),
            email: None,
            items: Vec::new(),
            total: "10.00".parse().expect("valid decimal"),
            status: OrderStatus::Pending,
            timestamp: day.map(|d| {
                chrono::Utc
                    .with_ymd_and_hms(2026, 8, d, 12, 0, 0)
                    .single()
                    .expect("valid date")
            }),
        }
    }

    #[test]
    fn test_newest_first_with_undated_last() {
        let mut orders = vec![order("old", Some(1)), order("new", Some(20)), order("undated", None)];
        orders.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["new", "old", "undated"]);
    }

    #[test]
    fn test_row_counts_units_not_lines() {
        let mut o = order("o1", None);
        o.items = vec![
            cybee_core::LineItem::new(cybee_core::ProductId::new("a"), "A".to_owned(), "1.00".parse().expect("valid decimal")),
            cybee_core::LineItem {
                quantity: 3,
                ..cybee_core::LineItem::new(cybee_core::ProductId::new("b"), "B".to_owned(), "2.00".parse().expect("valid decimal"))
            },
        ];

        assert_eq!(OrderRow::from(&o).item_count, 4);
    }

    #[test]
    fn test_restored_stock_adds_quantity_back() {
        assert_eq!(restored_stock(Some(serde_json::json!(7)), 3), 10);
        assert_eq!(restored_stock(Some(serde_json::json!("7")), 3), 10);
    }

    #[test]
    fn test_restored_stock_treats_unreadable_as_zero() {
        assert_eq!(restored_stock(None, 2), 2);
        assert_eq!(restored_stock(Some(serde_json::json!("n/a")), 2), 2);
        assert_eq!(restored_stock(Some(serde_json::json!(-3)), 2), 2);
    }
}
