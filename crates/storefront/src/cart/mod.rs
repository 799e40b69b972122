//! Cart service: the single source of truth for "the current cart".
//!
//! A visitor's cart lives in exactly one of two places:
//!
//! - **Guest store** - the cookie-scoped session, for anonymous visitors.
//! - **User store** - the `users/{uid}` Firestore document, for signed-in
//!   customers. Writes there are always field-masked merge-writes of the
//!   `cart` field; the document also carries profile data owned by other
//!   features.
//!
//! On the guest-to-user login transition the guest cart is merged into the
//! user cart once. The merge is asymmetric: guest quantities add into
//! remote entries with the same product ID, guest-only items append,
//! remote-only items pass through. The session copy is deleted only after
//! the remote write has been re-read and verified, so a failed migration
//! never loses guest data.
//!
//! Known limit, kept from the original system: every mutation is a
//! read-modify-write with no version token, so two concurrent mutations of
//! the same cart can lose one of the updates. Last write wins.

mod remote;
mod session_store;

pub use remote::FirestoreUserStore;
pub use session_store::SessionGuestStore;

use cybee_core::{LineItem, ProductId, UserId, total_quantity};
use thiserror::Error;
use tracing::{info, instrument, warn};

use cybee_firebase::FirebaseError;

/// Errors from the cart's two backing stores.
///
/// Public cart operations mostly absorb these at the HTTP layer; they are
/// surfaced here so tests (and callers that care) can observe failure paths
/// without intercepting logs.
#[derive(Debug, Error)]
pub enum CartError {
    /// Session (guest store) failure.
    #[error("session store error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Firestore (user store) failure.
    #[error("remote store error: {0}")]
    Remote(#[from] FirebaseError),

    /// The post-migration re-read did not match what was written.
    #[error("migration write could not be verified")]
    VerifyFailed,
}

/// Where a guest's cart is persisted.
pub trait GuestCartStore {
    /// Load the guest cart; absent key means an empty cart.
    fn load(&self) -> impl Future<Output = Result<Vec<LineItem>, CartError>> + Send;

    /// Replace the stored guest cart.
    fn store(&self, items: &[LineItem]) -> impl Future<Output = Result<(), CartError>> + Send;

    /// Remove the stored guest cart entirely.
    fn clear(&self) -> impl Future<Output = Result<(), CartError>> + Send;
}

/// Where a signed-in user's cart is persisted.
pub trait UserCartStore {
    /// Load the user's cart; a missing document or `cart` field means empty.
    fn load(&self, user: &UserId)
    -> impl Future<Output = Result<Vec<LineItem>, CartError>> + Send;

    /// Write the user's cart. Must be a merge-write of the cart field only.
    fn store(
        &self,
        user: &UserId,
        items: &[LineItem],
    ) -> impl Future<Output = Result<(), CartError>> + Send;
}

/// The store currently owning the cart, chosen by auth state.
enum CartBackend<'a, G, U> {
    Guest(&'a G),
    User(&'a U, &'a UserId),
}

/// What a guest-cart migration did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// Guest items were merged into the user cart and the session copy
    /// cleared.
    Merged {
        /// The merged cart as verified on the remote side.
        items: Vec<LineItem>,
    },
    /// There was no guest cart (or no login transition) to migrate.
    NothingToMigrate,
}

/// Cart operations over whichever store currently owns the cart.
///
/// Constructed per request from the session and app state; holds no cart
/// state of its own.
pub struct CartService<G, U> {
    guest: G,
    users: U,
    current_user: Option<UserId>,
}

impl<G: GuestCartStore + Sync, U: UserCartStore + Sync> CartService<G, U> {
    /// Create a service for the given stores and auth state.
    pub const fn new(guest: G, users: U, current_user: Option<UserId>) -> Self {
        Self {
            guest,
            users,
            current_user,
        }
    }

    fn backend(&self) -> CartBackend<'_, G, U> {
        match &self.current_user {
            Some(uid) => CartBackend::User(&self.users, uid),
            None => CartBackend::Guest(&self.guest),
        }
    }

    /// The current cart.
    ///
    /// Read failures degrade to an empty cart: the storefront must keep
    /// rendering even when the backing store is unreachable.
    pub async fn get(&self) -> Vec<LineItem> {
        match self.try_get().await {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "cart read failed, treating as empty");
                Vec::new()
            }
        }
    }

    /// The current cart, surfacing read failures.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the owning store cannot be read.
    pub async fn try_get(&self) -> Result<Vec<LineItem>, CartError> {
        match self.backend() {
            CartBackend::Guest(store) => store.load().await,
            CartBackend::User(store, uid) => store.load(uid).await,
        }
    }

    /// Persist the given cart to the owning store.
    ///
    /// # Errors
    ///
    /// Returns `CartError` on write failure. The HTTP layer logs and
    /// swallows this; the next read will simply reflect the pre-write state.
    pub async fn save(&self, items: &[LineItem]) -> Result<(), CartError> {
        match self.backend() {
            CartBackend::Guest(store) => store.store(items).await,
            CartBackend::User(store, uid) => store.store(uid, items).await,
        }
    }

    /// Add one unit of a product to the cart.
    ///
    /// A product already in the cart gets its quantity bumped by 1; the
    /// incoming item's own quantity is ignored. Otherwise the item is
    /// appended with quantity 1.
    ///
    /// # Errors
    ///
    /// Returns `CartError` on write failure.
    #[instrument(skip(self, item), fields(product = %item.id))]
    pub async fn add(&self, item: LineItem) -> Result<Vec<LineItem>, CartError> {
        let mut items = self.get().await;

        if let Some(existing) = items.iter_mut().find(|entry| entry.id == item.id) {
            existing.quantity += 1;
        } else {
            items.push(LineItem { quantity: 1, ..item });
        }

        self.save(&items).await?;
        Ok(items)
    }

    /// Remove a product from the cart entirely.
    ///
    /// # Errors
    ///
    /// Returns `CartError` on write failure.
    #[instrument(skip(self), fields(product = %id))]
    pub async fn remove(&self, id: &ProductId) -> Result<Vec<LineItem>, CartError> {
        let mut items = self.get().await;
        items.retain(|entry| &entry.id != id);
        self.save(&items).await?;
        Ok(items)
    }

    /// Set a product's quantity. Zero or negative removes the product.
    ///
    /// # Errors
    ///
    /// Returns `CartError` on write failure.
    #[instrument(skip(self), fields(product = %id, quantity))]
    pub async fn set_quantity(
        &self,
        id: &ProductId,
        quantity: i64,
    ) -> Result<Vec<LineItem>, CartError> {
        if quantity <= 0 {
            return self.remove(id).await;
        }

        let mut items = self.get().await;
        if let Some(entry) = items.iter_mut().find(|entry| &entry.id == id) {
            entry.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            self.save(&items).await?;
        }
        Ok(items)
    }

    /// Empty the cart.
    ///
    /// For guests the session key is deleted; for signed-in users an empty
    /// list is merge-written.
    ///
    /// # Errors
    ///
    /// Returns `CartError` on write failure.
    pub async fn clear(&self) -> Result<(), CartError> {
        match self.backend() {
            CartBackend::Guest(store) => store.clear().await,
            CartBackend::User(store, uid) => store.store(uid, &[]).await,
        }
    }

    /// Total item count (sum of quantities), for the navigation badge.
    pub async fn item_count(&self) -> u32 {
        total_quantity(&self.get().await)
    }

    /// Record an auth-state transition.
    ///
    /// A guest-to-user transition (None to Some) triggers the one-time
    /// guest-cart migration. Logout and already-signed-in refreshes never
    /// migrate.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if migration ran and failed; the guest cart is
    /// left intact in that case.
    pub async fn set_current_user(
        &mut self,
        user: Option<UserId>,
    ) -> Result<MigrationOutcome, CartError> {
        let logged_in = self.current_user.is_none() && user.is_some();
        self.current_user = user;

        if logged_in {
            self.migrate_guest_cart().await
        } else {
            Ok(MigrationOutcome::NothingToMigrate)
        }
    }

    /// Merge the guest cart into the signed-in user's cart.
    ///
    /// The session copy is deleted only after the merged cart has been
    /// written remotely *and* re-read back intact. Any failure before that
    /// point aborts with both carts unchanged; the next login transition can
    /// retry.
    ///
    /// # Errors
    ///
    /// Returns `CartError` on any read, write, or verification failure.
    #[instrument(skip(self))]
    pub async fn migrate_guest_cart(&self) -> Result<MigrationOutcome, CartError> {
        let Some(uid) = &self.current_user else {
            return Ok(MigrationOutcome::NothingToMigrate);
        };

        let guest_items = self.guest.load().await?;
        if guest_items.is_empty() {
            // Nothing to carry over; drop the (empty) session key.
            self.guest.clear().await?;
            return Ok(MigrationOutcome::NothingToMigrate);
        }

        let remote_items = self.users.load(uid).await?;
        let merged = merge_carts(remote_items, guest_items);

        self.users.store(uid, &merged).await?;

        // Verify the write landed before the destructive step.
        let verified = self.users.load(uid).await?;
        if verified != merged {
            warn!(user = %uid, "migration verification mismatch, keeping guest cart");
            return Err(CartError::VerifyFailed);
        }

        self.guest.clear().await?;
        info!(user = %uid, items = merged.len(), "guest cart migrated");

        Ok(MigrationOutcome::Merged { items: merged })
    }
}

/// Merge a guest cart into a user cart.
///
/// Remote entries keep their position; a guest item matching a remote
/// product ID adds its quantity to that entry, and unmatched guest items
/// are appended in their guest order.
#[must_use]
pub fn merge_carts(remote: Vec<LineItem>, guest: Vec<LineItem>) -> Vec<LineItem> {
    let mut merged = remote;

    for guest_item in guest {
        if let Some(existing) = merged.iter_mut().find(|entry| entry.id == guest_item.id) {
            existing.quantity += guest_item.quantity;
        } else {
            merged.push(guest_item);
        }
    }

    merged
}

#[cfg(test)]
mod tests;
