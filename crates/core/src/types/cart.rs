//! Cart line items.
//!
//! A cart is an ordered `Vec<LineItem>`. It is owned by exactly one store at
//! a time: the session-scoped guest store for anonymous visitors, or the
//! `users/{uid}` Firestore document for signed-in customers. Line-item
//! identity is the product ID; adding a product that is already present
//! accumulates its quantity instead of appending a second entry.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A single cart entry: a product plus how many of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product document ID.
    pub id: ProductId,
    /// Display name, denormalized at add time.
    pub name: String,
    /// Unit price, denormalized at add time.
    pub price: Decimal,
    /// Primary image URL, if the product has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Number of units. Always at least 1 for a stored item.
    pub quantity: u32,
}

impl LineItem {
    /// Create a line item with quantity 1.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image: None,
            quantity: 1,
        }
    }

    /// Price times quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Sum of all quantities across the cart.
///
/// This is the number shown in the navigation badge, not the number of
/// distinct products.
#[must_use]
pub fn total_quantity(items: &[LineItem]) -> u32 {
    items.iter().map(|item| item.quantity).sum()
}

/// Sum of all line totals across the cart.
#[must_use]
pub fn subtotal(items: &[LineItem]) -> Decimal {
    items.iter().map(LineItem::line_total).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> Decimal {
        value.parse().expect("valid decimal")
    }

    fn item(id: &str, price: &str, quantity: u32) -> LineItem {
        LineItem {
            id: ProductId::new(id),
            name: id.to_uppercase(),
            price: price.parse().expect("valid decimal"),
            image: None,
            quantity,
        }
    }

    #[test]
    fn test_line_total() {
        assert_eq!(item("a", "9.99", 3).line_total(), dec("29.97"));
    }

    #[test]
    fn test_total_quantity_sums_quantities() {
        let cart = vec![item("a", "1", 2), item("b", "1", 1), item("c", "1", 3)];
        assert_eq!(total_quantity(&cart), 6);
        assert_eq!(total_quantity(&[]), 0);
    }

    #[test]
    fn test_subtotal() {
        let cart = vec![item("a", "10.00", 1), item("b", "2.50", 4)];
        assert_eq!(subtotal(&cart), dec("20.00"));
    }

    #[test]
    fn test_serde_skips_missing_image() {
        let json = serde_json::to_value(item("a", "1.00", 1)).expect("serialize");
        assert!(json.get("image").is_none());

        let parsed: LineItem =
            serde_json::from_str(r#"{"id":"a","name":"A","price":"1.00","quantity":2}"#)
                .expect("deserialize");
        assert_eq!(parsed.quantity, 2);
        assert_eq!(parsed.image, None);
    }
}
