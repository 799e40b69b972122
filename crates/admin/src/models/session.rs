//! Session-stored admin identity.

use serde::{Deserialize, Serialize};

use cybee_core::{Email, UserId};

/// The signed-in admin, as stored in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub uid: UserId,
    pub email: Email,
}

/// Session key constants.
pub mod keys {
    /// Key for the signed-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
