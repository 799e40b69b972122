//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Mutations go through the [`CartService`]; store failures are logged and
//! absorbed here so the page keeps rendering (the badge then reflects the
//! pre-write state on its next read).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use cybee_core::{Currency, LineItem, ProductId, subtotal, total_quantity};

use crate::cart::{CartService, FirestoreUserStore, SessionGuestStore};
use crate::error::AppError;
use crate::middleware::MaybeUser;
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image: Option<String>,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: Currency::default().format(rust_decimal::Decimal::ZERO),
            item_count: 0,
        }
    }

    /// Render line items with the store currency.
    #[must_use]
    pub fn build(items: &[LineItem], currency: &Currency) -> Self {
        Self {
            items: items
                .iter()
                .map(|item| CartItemView {
                    id: item.id.to_string(),
                    name: item.name.clone(),
                    quantity: item.quantity,
                    price: currency.format(item.price),
                    line_price: currency.format(item.line_total()),
                    image: item.image.clone(),
                })
                .collect(),
            subtotal: currency.format(subtotal(items)),
            item_count: total_quantity(items),
        }
    }
}

// =============================================================================
// Service construction
// =============================================================================

/// Build the per-request cart service from session and app state.
pub fn cart_service(
    state: &AppState,
    session: Session,
    user: &MaybeUser,
) -> CartService<SessionGuestStore, FirestoreUserStore> {
    CartService::new(
        SessionGuestStore::new(session),
        FirestoreUserStore::new(state.firestore().clone()),
        user.0.as_ref().map(|u| u.uid.clone()),
    )
}

// =============================================================================
// Form Types
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub signed_in: bool,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
///
/// Hidden entirely at zero; the badge never renders "0".
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    user: MaybeUser,
) -> impl IntoResponse {
    let signed_in = user.0.is_some();
    let service = cart_service(&state, session, &user);

    let items = service.get().await;
    let currency = state.catalog().currency().await;

    CartShowTemplate {
        cart: CartView::build(&items, &currency),
        signed_in,
    }
}

/// Add one unit of a product to the cart (HTMX).
///
/// Looks the product up so the stored line item carries its current name
/// and price. Returns the count badge with an HTMX trigger so cart views
/// elsewhere on the page refresh themselves.
#[instrument(skip(state, session, user))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    user: MaybeUser,
    Form(form): Form<AddToCartForm>,
) -> Result<Response, AppError> {
    let product_id = ProductId::new(form.product_id);
    let product = state
        .catalog()
        .get_product(&product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    let mut item = LineItem::new(product.id.clone(), product.name.clone(), product.price);
    item.image = product.primary_image().map(ToOwned::to_owned);

    let service = cart_service(&state, session, &user);
    if let Err(e) = service.add(item).await {
        tracing::error!(error = %e, "failed to add item to cart");
    }

    let count = service.item_count().await;
    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate { count },
    )
        .into_response())
}

/// Update cart item quantity (HTMX). Zero removes the item.
#[instrument(skip(state, session, user))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    user: MaybeUser,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    let service = cart_service(&state, session, &user);

    let items = match service
        .set_quantity(&ProductId::new(form.product_id), form.quantity)
        .await
    {
        Ok(items) => items,
        Err(e) => {
            tracing::error!(error = %e, "failed to update cart");
            service.get().await
        }
    };

    let currency = state.catalog().currency().await;
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::build(&items, &currency),
        },
    )
        .into_response()
}

/// Remove item from cart (HTMX).
#[instrument(skip(state, session, user))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    user: MaybeUser,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    let service = cart_service(&state, session, &user);

    let items = match service.remove(&ProductId::new(form.product_id)).await {
        Ok(items) => items,
        Err(e) => {
            tracing::error!(error = %e, "failed to remove from cart");
            service.get().await
        }
    };

    let currency = state.catalog().currency().await;
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::build(&items, &currency),
        },
    )
        .into_response()
}

/// Empty the cart (HTMX).
#[instrument(skip(state, session, user))]
pub async fn clear(
    State(state): State<AppState>,
    session: Session,
    user: MaybeUser,
) -> Response {
    let service = cart_service(&state, session, &user);

    if let Err(e) = service.clear().await {
        tracing::error!(error = %e, "failed to clear cart");
    }

    let items = service.get().await;
    let currency = state.catalog().currency().await;
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::build(&items, &currency),
        },
    )
        .into_response()
}

/// Get cart count badge (HTMX).
#[instrument(skip_all)]
pub async fn count(
    State(state): State<AppState>,
    session: Session,
    user: MaybeUser,
) -> impl IntoResponse {
    let service = cart_service(&state, session, &user);
    let count = service.item_count().await;

    CartCountTemplate { count }
}

#[cfg(test)]
mod tests {
    use askama::Template;

    use super::*;

    fn line(id: &str, price: &str, quantity: u32) -> LineItem {
        LineItem {
            id: ProductId::new(id),
            name: id.to_uppercase(),
            price: price.parse().expect("valid decimal"),
            image: None,
            quantity,
        }
    }

    #[test]
    fn test_badge_shows_total_quantity() {
        let rendered = CartCountTemplate { count: 6 }.render().expect("render");
        assert!(rendered.contains('6'));
    }

    #[test]
    fn test_badge_hidden_at_zero() {
        let rendered = CartCountTemplate { count: 0 }.render().expect("render");
        // No visible count at all, not a "0".
        assert!(!rendered.contains('0'));
        assert!(rendered.contains("display:none") || rendered.trim().is_empty());
    }

    #[test]
    fn test_cart_view_formats_prices() {
        let items = vec![line("a", "10.00", 2), line("b", "2.50", 1)];
        let view = CartView::build(&items, &Currency::parse("EUR"));

        assert_eq!(view.item_count, 3);
        assert_eq!(view.subtotal, "\u{20ac}22.50");
        assert_eq!(view.items.first().map(|i| i.line_price.as_str()), Some("\u{20ac}20.00"));
    }

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::empty();
        assert_eq!(view.item_count, 0);
        assert_eq!(view.subtotal, "$0.00");
    }
}
