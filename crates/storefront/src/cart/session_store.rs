//! Session-backed guest cart store.
//!
//! The anonymous visitor's cart is scoped to their browser via the session
//! cookie: it survives reloads for the lifetime of the session but does not
//! follow the visitor across browsers or devices.

use cybee_core::LineItem;
use tower_sessions::Session;

use super::{CartError, GuestCartStore};
use crate::models::session_keys;

/// Guest cart persistence in the tower-sessions session.
#[derive(Clone)]
pub struct SessionGuestStore {
    session: Session,
}

impl SessionGuestStore {
    /// Wrap the request's session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl GuestCartStore for SessionGuestStore {
    async fn load(&self) -> Result<Vec<LineItem>, CartError> {
        Ok(self
            .session
            .get::<Vec<LineItem>>(session_keys::GUEST_CART)
            .await?
            .unwrap_or_default())
    }

    async fn store(&self, items: &[LineItem]) -> Result<(), CartError> {
        self.session
            .insert(session_keys::GUEST_CART, items)
            .await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), CartError> {
        self.session
            .remove::<Vec<LineItem>>(session_keys::GUEST_CART)
            .await?;
        Ok(())
    }
}
