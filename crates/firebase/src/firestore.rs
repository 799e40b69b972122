//! Firestore v1 REST client.

use std::collections::BTreeMap;
use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::value::{self, Value};
use crate::{FirebaseConfig, FirebaseError};

const FIRESTORE_BASE: &str = "https://firestore.googleapis.com/v1";

/// A Firestore document in wire form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Full resource name
    /// (`projects/{p}/databases/(default)/documents/{collection}/{id}`).
    pub name: String,
    /// Field map; absent for empty documents.
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
    /// Server-assigned update time (RFC 3339).
    #[serde(default)]
    pub update_time: Option<String>,
}

impl Document {
    /// The document ID (last path segment of the resource name).
    #[must_use]
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Unwrap all fields into a plain JSON object.
    #[must_use]
    pub fn into_json(self) -> serde_json::Map<String, serde_json::Value> {
        value::fields_to_json(self.fields)
    }

    /// Unwrap a single field into plain JSON, if present.
    #[must_use]
    pub fn field_json(&self, field: &str) -> Option<serde_json::Value> {
        self.fields.get(field).cloned().map(Value::into_json)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<Document>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Client for the Firestore v1 REST API.
///
/// Cheaply cloneable; all clones share one connection pool.
#[derive(Clone)]
pub struct FirestoreClient {
    inner: Arc<FirestoreClientInner>,
}

struct FirestoreClientInner {
    http: reqwest::Client,
    /// `projects/{p}/databases/(default)/documents`
    documents_root: String,
    api_key: secrecy::SecretString,
}

impl FirestoreClient {
    /// Create a new client for the configured project.
    #[must_use]
    pub fn new(config: &FirebaseConfig) -> Self {
        Self {
            inner: Arc::new(FirestoreClientInner {
                http: reqwest::Client::new(),
                documents_root: format!(
                    "projects/{}/databases/(default)/documents",
                    config.project_id
                ),
                api_key: config.api_key.clone(),
            }),
        }
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!(
            "{FIRESTORE_BASE}/{}/{collection}/{id}",
            self.inner.documents_root
        )
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{FIRESTORE_BASE}/{}/{collection}", self.inner.documents_root)
    }

    /// Read a full document.
    ///
    /// Returns `Ok(None)` for a missing document; every other failure is an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns `FirebaseError` if the request fails or the response cannot
    /// be parsed.
    #[instrument(skip(self), fields(collection = %collection, id = %id))]
    pub async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, FirebaseError> {
        let response = self
            .inner
            .http
            .get(self.document_url(collection, id))
            .query(&[("key", self.inner.api_key.expose_secret())])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            debug!("document not found");
            return Ok(None);
        }

        let body = Self::check(response).await?;
        Ok(Some(serde_json::from_str(&body)?))
    }

    /// Merge-write the named fields of a document, creating it if missing.
    ///
    /// The `updateMask` lists exactly the keys of `fields`, so every other
    /// field of the document is left untouched. This is the only write path
    /// the cart subsystem is allowed to use against shared documents.
    ///
    /// # Errors
    ///
    /// Returns `FirebaseError` if the request fails.
    #[instrument(skip(self, fields), fields(collection = %collection, id = %id))]
    pub async fn patch_document(
        &self,
        collection: &str,
        id: &str,
        fields: serde_json::Map<String, serde_json::Value>,
        mask: &[&str],
    ) -> Result<Document, FirebaseError> {
        let mut query: Vec<(&str, String)> =
            vec![("key", self.inner.api_key.expose_secret().to_owned())];
        for path in mask {
            query.push(("updateMask.fieldPaths", (*path).to_owned()));
        }

        let body = serde_json::json!({ "fields": value::fields_from_json(fields) });

        let response = self
            .inner
            .http
            .patch(self.document_url(collection, id))
            .query(&query)
            .json(&body)
            .send()
            .await?;

        let body = Self::check(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Replace a document wholesale (no mask).
    ///
    /// Only for documents a single feature owns outright, such as
    /// `settings/attributes`.
    ///
    /// # Errors
    ///
    /// Returns `FirebaseError` if the request fails.
    #[instrument(skip(self, fields), fields(collection = %collection, id = %id))]
    pub async fn set_document(
        &self,
        collection: &str,
        id: &str,
        fields: serde_json::Map<String, serde_json::Value>,
    ) -> Result<Document, FirebaseError> {
        let body = serde_json::json!({ "fields": value::fields_from_json(fields) });

        let response = self
            .inner
            .http
            .patch(self.document_url(collection, id))
            .query(&[("key", self.inner.api_key.expose_secret())])
            .json(&body)
            .send()
            .await?;

        let body = Self::check(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Create a document with a server-assigned ID.
    ///
    /// # Errors
    ///
    /// Returns `FirebaseError` if the request fails.
    #[instrument(skip(self, fields), fields(collection = %collection))]
    pub async fn create_document(
        &self,
        collection: &str,
        fields: serde_json::Map<String, serde_json::Value>,
    ) -> Result<Document, FirebaseError> {
        let body = serde_json::json!({ "fields": value::fields_from_json(fields) });

        let response = self
            .inner
            .http
            .post(self.collection_url(collection))
            .query(&[("key", self.inner.api_key.expose_secret())])
            .json(&body)
            .send()
            .await?;

        let body = Self::check(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Delete a document. Deleting a missing document is not an error.
    ///
    /// # Errors
    ///
    /// Returns `FirebaseError` if the request fails.
    #[instrument(skip(self), fields(collection = %collection, id = %id))]
    pub async fn delete_document(&self, collection: &str, id: &str) -> Result<(), FirebaseError> {
        let response = self
            .inner
            .http
            .delete(self.document_url(collection, id))
            .query(&[("key", self.inner.api_key.expose_secret())])
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    /// List all documents of a collection, following pagination.
    ///
    /// # Errors
    ///
    /// Returns `FirebaseError` if any page request fails.
    #[instrument(skip(self), fields(collection = %collection))]
    pub async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, FirebaseError> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query: Vec<(&str, String)> = vec![
                ("key", self.inner.api_key.expose_secret().to_owned()),
                ("pageSize", "300".to_owned()),
            ];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let response = self
                .inner
                .http
                .get(self.collection_url(collection))
                .query(&query)
                .send()
                .await?;

            let body = Self::check(response).await?;
            let page: ListResponse = serde_json::from_str(&body)?;

            documents.extend(page.documents);
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(documents)
    }

    /// Turn a non-success response into an error, otherwise return the body.
    async fn check(response: reqwest::Response) -> Result<String, FirebaseError> {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(FirebaseError::RateLimited(retry_after));
        }

        // Read the body first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Firestore API returned non-success status"
            );
            return Err(FirebaseError::Status {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn client() -> FirestoreClient {
        FirestoreClient::new(&FirebaseConfig {
            project_id: "cybee-test".to_owned(),
            api_key: SecretString::from("test-key"),
        })
    }

    #[test]
    fn test_document_urls() {
        let client = client();
        assert_eq!(
            client.document_url("users", "abc"),
            "https://firestore.googleapis.com/v1/projects/cybee-test/databases/(default)/documents/users/abc"
        );
        assert_eq!(
            client.collection_url("products"),
            "https://firestore.googleapis.com/v1/projects/cybee-test/databases/(default)/documents/products"
        );
    }

    #[test]
    fn test_document_id_from_resource_name() {
        let doc: Document = serde_json::from_value(serde_json::json!({
            "name": "projects/p/databases/(default)/documents/users/abc123",
            "fields": {"cart": {"arrayValue": {}}}
        }))
        .expect("deserialize");
        assert_eq!(doc.id(), "abc123");
    }

    #[test]
    fn test_field_json_unwraps_envelope() {
        let doc: Document = serde_json::from_value(serde_json::json!({
            "name": "projects/p/databases/(default)/documents/settings/store",
            "fields": {"currency": {"stringValue": "EUR"}}
        }))
        .expect("deserialize");
        assert_eq!(doc.field_json("currency"), Some(serde_json::json!("EUR")));
        assert_eq!(doc.field_json("missing"), None);
    }
}
