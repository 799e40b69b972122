//! Store settings - attribute option lists and the display currency.
//!
//! Attributes live in the `settings/attributes` document, one array per
//! option list; the console owns that document outright, so saving replaces
//! it wholesale. The currency lives in `settings/store` next to fields other
//! features own, so it gets a masked write.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::Redirect};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// The settings collection.
pub const SETTINGS_COLLECTION: &str = "settings";
/// Document holding the attribute option lists.
pub const ATTRIBUTES_DOC: &str = "attributes";
/// Document holding store-wide settings such as the currency.
pub const STORE_DOC: &str = "store";

/// The attribute option lists backing product-form dropdowns.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Attributes {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
}

/// Load the attribute lists; a missing document means empty lists.
pub async fn load_attributes(state: &AppState) -> Result<Attributes> {
    let Some(doc) = state
        .firestore()
        .get_document(SETTINGS_COLLECTION, ATTRIBUTES_DOC)
        .await?
    else {
        return Ok(Attributes::default());
    };

    let attributes = serde_json::from_value(serde_json::Value::Object(doc.into_json()))
        .map_err(cybee_firebase::FirebaseError::Parse)?;
    Ok(attributes)
}

async fn load_currency_code(state: &AppState) -> Result<String> {
    let doc = state
        .firestore()
        .get_document(SETTINGS_COLLECTION, STORE_DOC)
        .await?;

    Ok(doc
        .and_then(|d| d.field_json("currency"))
        .and_then(|v| v.as_str().map(ToOwned::to_owned))
        .unwrap_or_default())
}

/// Settings form data. Option lists arrive one value per line.
#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    #[serde(default)]
    pub categories: String,
    #[serde(default)]
    pub sizes: String,
    #[serde(default)]
    pub colors: String,
    #[serde(default)]
    pub currency: String,
}

fn parse_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Settings page template.
#[derive(Template, WebTemplate)]
#[template(path = "settings.html")]
pub struct SettingsTemplate {
    pub categories: String,
    pub sizes: String,
    pub colors: String,
    pub currency: String,
}

/// Settings page.
#[instrument(skip_all)]
pub async fn show(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<SettingsTemplate> {
    let attributes = load_attributes(&state).await?;
    let currency = load_currency_code(&state).await?;

    Ok(SettingsTemplate {
        categories: attributes.categories.join("\n"),
        sizes: attributes.sizes.join("\n"),
        colors: attributes.colors.join("\n"),
        currency,
    })
}

/// Save the settings form.
#[instrument(skip_all)]
pub async fn save(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Form(form): Form<SettingsForm>,
) -> Result<Redirect> {
    let attributes = Attributes {
        categories: parse_lines(&form.categories),
        sizes: parse_lines(&form.sizes),
        colors: parse_lines(&form.colors),
    };

    let mut fields = serde_json::Map::new();
    fields.insert("categories".to_owned(), serde_json::json!(attributes.categories));
    fields.insert("sizes".to_owned(), serde_json::json!(attributes.sizes));
    fields.insert("colors".to_owned(), serde_json::json!(attributes.colors));

    state
        .firestore()
        .set_document(SETTINGS_COLLECTION, ATTRIBUTES_DOC, fields)
        .await?;

    let currency = form.currency.trim().to_uppercase();
    if !currency.is_empty() {
        let mut fields = serde_json::Map::new();
        fields.insert("currency".to_owned(), serde_json::Value::String(currency));
        state
            .firestore()
            .patch_document(SETTINGS_COLLECTION, STORE_DOC, fields, &["currency"])
            .await?;
    }

    tracing::info!("settings saved");
    Ok(Redirect::to("/settings"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lines_trims_and_drops_blanks() {
        assert_eq!(parse_lines(" honey \n\n tea \n"), ["honey", "tea"]);
        assert!(parse_lines("\n  \n").is_empty());
    }

    #[test]
    fn test_attributes_default_on_missing_fields() {
        let attributes: Attributes =
            serde_json::from_str(r#"{"categories":["food"]}"#).expect("deserialize");
        assert_eq!(attributes.categories, ["food"]);
        assert!(attributes.sizes.is_empty());
    }
}
