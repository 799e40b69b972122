//! Product browsing routes.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tracing::instrument;

use cybee_core::{Currency, Product, ProductId};

use crate::error::AppError;
use crate::middleware::MaybeUser;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: String,
    pub image: Option<String>,
    pub out_of_stock: bool,
}

impl ProductView {
    fn build(product: &Product, currency: &Currency) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            category: product.category.clone().unwrap_or_default(),
            price: currency.format(product.price),
            image: product.primary_image().map(ToOwned::to_owned),
            out_of_stock: product.is_out_of_stock(),
        }
    }
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductView>,
    pub signed_in: bool,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductView,
    pub signed_in: bool,
}

/// Display the product listing.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    user: MaybeUser,
) -> Result<ProductsIndexTemplate, AppError> {
    let products = state.catalog().list_products().await?;
    let currency = state.catalog().currency().await;

    Ok(ProductsIndexTemplate {
        products: products
            .iter()
            .map(|p| ProductView::build(p, &currency))
            .collect(),
        signed_in: user.0.is_some(),
    })
}

/// Display a single product.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    user: MaybeUser,
    Path(id): Path<String>,
) -> Result<ProductShowTemplate, AppError> {
    let id = ProductId::new(id);
    let product = state
        .catalog()
        .get_product(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    let currency = state.catalog().currency().await;

    Ok(ProductShowTemplate {
        product: ProductView::build(&product, &currency),
        signed_in: user.0.is_some(),
    })
}
