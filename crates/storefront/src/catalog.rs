//! Catalog and store-settings reads, with in-memory caching.
//!
//! Products and settings change rarely compared to how often they are
//! rendered, so reads go through a `moka` cache with a short TTL (the same
//! pattern the rest of the stack uses for vendor API responses). Writes
//! happen only from the admin console, which talks to Firestore directly.

use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument, warn};

use cybee_core::{Currency, Product, ProductId};
use cybee_firebase::{Document, FirebaseError, FirestoreClient};

/// Cache TTL for catalog and settings reads.
const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Cache capacity; the catalog is small, this is just a bound.
const CACHE_CAPACITY: u64 = 1_000;

#[derive(Clone)]
enum CacheValue {
    Products(Vec<Product>),
    Product(Box<Product>),
    Currency(Currency),
}

/// Read access to products and store settings.
#[derive(Clone)]
pub struct Catalog {
    firestore: FirestoreClient,
    cache: Cache<String, CacheValue>,
}

impl Catalog {
    /// Create a catalog over the given Firestore client.
    #[must_use]
    pub fn new(firestore: FirestoreClient) -> Self {
        Self {
            firestore,
            cache: Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(CACHE_TTL)
                .build(),
        }
    }

    /// All products, in listing order.
    ///
    /// Documents that fail to parse are skipped with a warning rather than
    /// failing the whole listing; the catalog has accumulated some
    /// hand-edited documents over time.
    ///
    /// # Errors
    ///
    /// Returns `FirebaseError` if the collection cannot be listed.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, FirebaseError> {
        let cache_key = "products".to_owned();

        if let Some(CacheValue::Products(products)) = self.cache.get(&cache_key).await {
            debug!("cache hit for product listing");
            return Ok(products);
        }

        let documents = self.firestore.list_documents("products").await?;
        let products: Vec<Product> = documents
            .into_iter()
            .filter_map(|doc| match product_from_document(doc) {
                Ok(product) => Some(product),
                Err(e) => {
                    warn!(error = %e, "skipping malformed product document");
                    None
                }
            })
            .collect();

        self.cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// A single product by document ID.
    ///
    /// # Errors
    ///
    /// Returns `FirebaseError` if the read fails; `Ok(None)` if the product
    /// does not exist.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, FirebaseError> {
        let cache_key = format!("product:{id}");

        if let Some(CacheValue::Product(product)) = self.cache.get(&cache_key).await {
            debug!("cache hit for product");
            return Ok(Some(*product));
        }

        let Some(doc) = self.firestore.get_document("products", id.as_str()).await? else {
            return Ok(None);
        };

        let product = product_from_document(doc)?;
        self.cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(Some(product))
    }

    /// The store display currency.
    ///
    /// Looks in `settings/pages` first, then `settings/store`, then falls
    /// back to the dollar default. Read failures also fall back rather than
    /// breaking every price on the page.
    pub async fn currency(&self) -> Currency {
        let cache_key = "currency".to_owned();

        if let Some(CacheValue::Currency(currency)) = self.cache.get(&cache_key).await {
            return currency;
        }

        let currency = match self.load_currency().await {
            Ok(currency) => currency,
            Err(e) => {
                warn!(error = %e, "currency settings unavailable, using default");
                Currency::default()
            }
        };

        self.cache
            .insert(cache_key, CacheValue::Currency(currency.clone()))
            .await;

        currency
    }

    async fn load_currency(&self) -> Result<Currency, FirebaseError> {
        for doc_id in ["pages", "store"] {
            if let Some(doc) = self.firestore.get_document("settings", doc_id).await?
                && let Some(serde_json::Value::String(code)) = doc.field_json("currency")
            {
                return Ok(Currency::parse(&code));
            }
        }
        Ok(Currency::default())
    }
}

/// Build a [`Product`] from its Firestore document.
fn product_from_document(doc: Document) -> Result<Product, FirebaseError> {
    let id = ProductId::new(doc.id());
    let json = serde_json::Value::Object(doc.into_json());
    let mut product: Product = serde_json::from_value(json).map_err(FirebaseError::Parse)?;
    product.id = id;
    Ok(product)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_from_document() {
        let doc: Document = serde_json::from_value(serde_json::json!({
            "name": "projects/p/databases/(default)/documents/products/honey-500g",
            "fields": {
                "name": {"stringValue": "Raw Honey 500g"},
                "price": {"doubleValue": 12.5},
                "stock": {"integerValue": "8"},
                "images": {"arrayValue": {"values": [{"stringValue": "honey.jpg"}]}}
            }
        }))
        .expect("deserialize");

        let product = product_from_document(doc).expect("parse product");
        assert_eq!(product.id.as_str(), "honey-500g");
        assert_eq!(product.name, "Raw Honey 500g");
        assert_eq!(product.stock, 8);
        assert_eq!(product.primary_image(), Some("honey.jpg"));
    }

    #[test]
    fn test_malformed_product_is_an_error() {
        let doc: Document = serde_json::from_value(serde_json::json!({
            "name": "projects/p/databases/(default)/documents/products/broken",
            "fields": {"name": {"stringValue": "No price"}}
        }))
        .expect("deserialize");

        assert!(product_from_document(doc).is_err());
    }
}
