//! Product catalog entries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A product in the `products` Firestore collection.
///
/// Field names match the stored documents; everything except name and price
/// is optional because the catalog has grown fields over time and older
/// documents lack the newer ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Document ID. Not stored inside the document itself.
    #[serde(skip)]
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price in the store currency.
    pub price: Decimal,
    /// Long-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category name, one of the configured attribute options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Image URLs, first one is the card image.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    /// Units on hand.
    #[serde(default)]
    pub stock: u32,
    /// Threshold below which the admin flags the product as low stock.
    #[serde(default, rename = "minStock")]
    pub min_stock: u32,
}

impl Product {
    /// First image URL, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Whether the product has no units on hand.
    #[must_use]
    pub const fn is_out_of_stock(&self) -> bool {
        self.stock == 0
    }

    /// Whether stock is at or below the configured minimum (and nonzero).
    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.min_stock > 0 && self.stock <= self.min_stock && self.stock > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: u32, min_stock: u32) -> Product {
        Product {
            id: ProductId::new("p1"),
            name: "Honey".to_owned(),
            price: "12.50".parse().expect("valid decimal"),
            description: None,
            category: None,
            images: vec!["a.jpg".to_owned(), "b.jpg".to_owned()],
            stock,
            min_stock,
        }
    }

    #[test]
    fn test_stock_flags() {
        assert!(product(0, 0).is_out_of_stock());
        assert!(!product(0, 5).is_low_stock());
        assert!(product(3, 5).is_low_stock());
        assert!(!product(10, 5).is_low_stock());
        assert!(!product(10, 0).is_low_stock());
    }

    #[test]
    fn test_primary_image() {
        assert_eq!(product(1, 0).primary_image(), Some("a.jpg"));
    }

    #[test]
    fn test_deserialize_sparse_document() {
        let product: Product =
            serde_json::from_str(r#"{"name":"Wax","price":"3.00"}"#).expect("deserialize");
        assert_eq!(product.stock, 0);
        assert!(product.images.is_empty());
        assert_eq!(product.category, None);
        // The skipped id field defaults to empty until the caller assigns
        // the document name.
        assert_eq!(product.id.as_str(), "");
    }
}
