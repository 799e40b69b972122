//! Firestore-backed user cart store.

use cybee_core::{LineItem, UserId};
use cybee_firebase::{FirebaseError, FirestoreClient};

use super::{CartError, UserCartStore};

/// Firestore collection holding the per-user documents.
const USERS_COLLECTION: &str = "users";

/// The field of the user document this store is allowed to touch.
const CART_FIELD: &str = "cart";

/// User cart persistence in the `users/{uid}` Firestore document.
///
/// The user document is shared with profile features, so writes go through
/// a field-masked merge limited to the `cart` field.
#[derive(Clone)]
pub struct FirestoreUserStore {
    client: FirestoreClient,
}

impl FirestoreUserStore {
    /// Wrap a Firestore client.
    #[must_use]
    pub const fn new(client: FirestoreClient) -> Self {
        Self { client }
    }
}

impl UserCartStore for FirestoreUserStore {
    async fn load(&self, user: &UserId) -> Result<Vec<LineItem>, CartError> {
        let Some(doc) = self
            .client
            .get_document(USERS_COLLECTION, user.as_str())
            .await?
        else {
            return Ok(Vec::new());
        };

        match doc.field_json(CART_FIELD) {
            Some(json) => {
                Ok(serde_json::from_value(json).map_err(FirebaseError::Parse)?)
            }
            None => Ok(Vec::new()),
        }
    }

    async fn store(&self, user: &UserId, items: &[LineItem]) -> Result<(), CartError> {
        let mut fields = serde_json::Map::new();
        fields.insert(
            CART_FIELD.to_owned(),
            serde_json::to_value(items).map_err(FirebaseError::Parse)?,
        );

        self.client
            .patch_document(USERS_COLLECTION, user.as_str(), fields, &[CART_FIELD])
            .await?;
        Ok(())
    }
}
