//! Product CRUD for the admin console.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use cybee_core::{Product, ProductId};
use cybee_firebase::Document;

use crate::error::{AdminError, Result};
use crate::middleware::RequireAdminAuth;
use crate::routes::settings::load_attributes;
use crate::state::AppState;

/// The products collection.
pub const PRODUCTS_COLLECTION: &str = "products";

/// Product row for list templates.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub stock: u32,
    pub stock_class: &'static str,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        let stock_class = if product.is_out_of_stock() {
            "stock-out"
        } else if product.is_low_stock() {
            "stock-low"
        } else {
            "stock-ok"
        };

        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            category: product.category.clone().unwrap_or_default(),
            price: format!("{:.2}", product.price),
            stock: product.stock,
            stock_class,
        }
    }
}

/// Product create/edit form data.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    /// One image URL per line.
    #[serde(default)]
    pub images: String,
    pub stock: u32,
    pub min_stock: u32,
}

impl ProductForm {
    /// Parse the form into a product, without an ID.
    fn into_product(self) -> Result<Product> {
        let price: Decimal = self
            .price
            .trim()
            .parse()
            .map_err(|_| AdminError::BadRequest(format!("invalid price: {}", self.price)))?;

        let none_if_empty = |s: String| {
            let s = s.trim().to_owned();
            (!s.is_empty()).then_some(s)
        };

        Ok(Product {
            id: ProductId::new(String::new()),
            name: self.name.trim().to_owned(),
            price,
            description: none_if_empty(self.description),
            category: none_if_empty(self.category),
            images: self
                .images
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(ToOwned::to_owned)
                .collect(),
            stock: self.stock,
            min_stock: self.min_stock,
        })
    }
}

/// Serialize a product into Firestore document fields.
///
/// The ID is the document name, never a field. Price is stored as a JSON
/// number, matching the documents the storefront already reads.
fn product_fields(product: &Product) -> Result<serde_json::Map<String, serde_json::Value>> {
    let serde_json::Value::Object(mut fields) = serde_json::to_value(product)
        .map_err(cybee_firebase::FirebaseError::Parse)?
    else {
        return Err(AdminError::BadRequest("product did not serialize to an object".to_owned()));
    };

    if let Some(price) = rust_decimal::prelude::ToPrimitive::to_f64(&product.price) {
        if let Some(number) = serde_json::Number::from_f64(price) {
            fields.insert("price".to_owned(), serde_json::Value::Number(number));
        }
    }

    Ok(fields)
}

/// Parse a Firestore document into a product.
pub fn product_from_document(doc: Document) -> Result<Product> {
    let id = ProductId::new(doc.id());
    let mut product: Product =
        serde_json::from_value(serde_json::Value::Object(doc.into_json()))
            .map_err(cybee_firebase::FirebaseError::Parse)?;
    product.id = id;
    Ok(product)
}

/// Load the whole catalog, skipping documents that fail to parse.
pub async fn load_products(state: &AppState) -> Result<Vec<Product>> {
    let docs = state.firestore().list_documents(PRODUCTS_COLLECTION).await?;

    Ok(docs
        .into_iter()
        .filter_map(|doc| match product_from_document(doc) {
            Ok(product) => Some(product),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed product document");
                None
            }
        })
        .collect())
}

// =============================================================================
// Templates
// =============================================================================

/// Product list page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductRow>,
}

/// Product create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    /// None for the create form.
    pub id: Option<String>,
    pub name: String,
    pub price: String,
    pub description: String,
    pub category: String,
    pub images: String,
    pub stock: u32,
    pub min_stock: u32,
    pub categories: Vec<String>,
}

impl ProductFormTemplate {
    fn blank(categories: Vec<String>) -> Self {
        Self {
            id: None,
            name: String::new(),
            price: String::new(),
            description: String::new(),
            category: String::new(),
            images: String::new(),
            stock: 0,
            min_stock: 0,
            categories,
        }
    }

    fn for_product(product: &Product, categories: Vec<String>) -> Self {
        Self {
            id: Some(product.id.to_string()),
            name: product.name.clone(),
            price: format!("{:.2}", product.price),
            description: product.description.clone().unwrap_or_default(),
            category: product.category.clone().unwrap_or_default(),
            images: product.images.join("\n"),
            stock: product.stock,
            min_stock: product.min_stock,
            categories,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Product list page.
#[instrument(skip_all)]
pub async fn index(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<ProductsIndexTemplate> {
    let products = load_products(&state).await?;

    Ok(ProductsIndexTemplate {
        products: products.iter().map(ProductRow::from).collect(),
    })
}

/// Create form page.
#[instrument(skip_all)]
pub async fn new(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<ProductFormTemplate> {
    let attributes = load_attributes(&state).await?;
    Ok(ProductFormTemplate::blank(attributes.categories))
}

/// Create a product with a server-assigned ID.
#[instrument(skip_all)]
pub async fn create(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Form(form): Form<ProductForm>,
) -> Result<Redirect> {
    let product = form.into_product()?;
    let fields = product_fields(&product)?;

    state
        .firestore()
        .create_document(PRODUCTS_COLLECTION, fields)
        .await?;

    tracing::info!(name = %product.name, "product created");
    Ok(Redirect::to("/products"))
}

/// Edit form page.
#[instrument(skip(state))]
pub async fn edit(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ProductFormTemplate> {
    let doc = state
        .firestore()
        .get_document(PRODUCTS_COLLECTION, &id)
        .await?
        .ok_or_else(|| AdminError::NotFound(format!("product {id}")))?;

    let product = product_from_document(doc)?;
    let attributes = load_attributes(&state).await?;

    Ok(ProductFormTemplate::for_product(
        &product,
        attributes.categories,
    ))
}

/// Update a product. Masked write of exactly the form's fields, so fields
/// owned elsewhere survive.
#[instrument(skip(state, form))]
pub async fn update(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ProductForm>,
) -> Result<Redirect> {
    let product = form.into_product()?;
    let fields = product_fields(&product)?;
    let mask: Vec<String> = fields.keys().cloned().collect();
    let mask: Vec<&str> = mask.iter().map(String::as_str).collect();

    state
        .firestore()
        .patch_document(PRODUCTS_COLLECTION, &id, fields, &mask)
        .await?;

    tracing::info!(%id, "product updated");
    Ok(Redirect::to("/products"))
}

/// Delete a product.
#[instrument(skip(state))]
pub async fn delete(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect> {
    state
        .firestore()
        .delete_document(PRODUCTS_COLLECTION, &id)
        .await?;

    tracing::info!(%id, "product deleted");
    Ok(Redirect::to("/products"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_parses_images_per_line() {
        let form = ProductForm {
            name: " Honey ".to_owned(),
            price: "12.50".to_owned(),
            description: String::new(),
            category: "food".to_owned(),
            images: "a.jpg\n\n  b.jpg  \n".to_owned(),
            stock: 5,
            min_stock: 2,
        };

        let product = form.into_product().expect("valid form");
        assert_eq!(product.name, "Honey");
        assert_eq!(product.images, vec!["a.jpg", "b.jpg"]);
        assert_eq!(product.description, None);
        assert_eq!(product.category.as_deref(), Some("food"));
    }

    #[test]
    fn test_form_rejects_bad_price() {
        let form = ProductForm {
            name: "Honey".to_owned(),
            price: "twelve".to_owned(),
            description: String::new(),
            category: String::new(),
            images: String::new(),
            stock: 0,
            min_stock: 0,
        };

        assert!(form.into_product().is_err());
    }

    #[test]
    fn test_product_fields_store_price_as_number() {
        let form = ProductForm {
            name: "Honey".to_owned(),
            price: "12.50".to_owned(),
            description: String::new(),
            category: String::new(),
            images: String::new(),
            stock: 5,
            min_stock: 2,
        };

        let fields = product_fields(&form.into_product().expect("valid form"))
            .expect("serializes");
        assert!(fields.get("price").is_some_and(serde_json::Value::is_number));
        assert!(fields.get("id").is_none());
        assert_eq!(
            fields.get("minStock").and_then(serde_json::Value::as_u64),
            Some(2)
        );
    }

    #[test]
    fn test_form_preselects_current_category() {
        let mut template =
            ProductFormTemplate::blank(vec!["food".to_owned(), "candles".to_owned()]);
        template.category = "candles".to_owned();

        let html = template.render().expect("render");
        assert!(html.contains(r#"value="candles" selected"#));
        assert!(!html.contains(r#"value="food" selected"#));
    }
}
