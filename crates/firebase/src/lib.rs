//! Firebase REST clients for Cybee.
//!
//! # Architecture
//!
//! - Firebase is source of truth - NO local database, direct API calls
//! - [`FirestoreClient`] wraps the Firestore v1 REST API: full-document
//!   reads, field-masked merge-writes, deletes, and collection listing
//! - [`IdentityClient`] wraps the Identity Toolkit REST API: email/password
//!   sign-in and sign-up
//!
//! The Firestore client deliberately exposes a *merge-write* (`updateMask`
//! naming only the fields being written) as the primary write path. The
//! per-user document carries fields owned by several features (cart,
//! profile, addresses), so a full-document replace from any one feature
//! would clobber the others.
//!
//! # Example
//!
//! ```rust,ignore
//! use cybee_firebase::{FirebaseConfig, FirestoreClient};
//!
//! let client = FirestoreClient::new(&config);
//!
//! // Read the user document
//! let doc = client.get_document("users", "k2fQ7fGg").await?;
//!
//! // Merge-write the cart field, leaving profile fields untouched
//! client
//!     .patch_document("users", "k2fQ7fGg", fields, &["cart"])
//!     .await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod firestore;
mod identity;
pub mod value;

pub use firestore::{Document, FirestoreClient};
pub use identity::{AuthError, AuthUser, IdentityClient};

use secrecy::SecretString;
use thiserror::Error;

/// Connection settings for a Firebase project.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct FirebaseConfig {
    /// Firebase project ID (e.g. `cybee-store`).
    pub project_id: String,
    /// Web API key. Not a server secret in the Firebase model, but treated
    /// as one here so it never lands in logs.
    pub api_key: SecretString,
}

impl std::fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("project_id", &self.project_id)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Errors that can occur when talking to the Firebase REST APIs.
#[derive(Debug, Error)]
pub enum FirebaseError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Non-success status from the API.
    #[error("Firebase API error ({status}): {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body, truncated.
        message: String,
    },

    /// Rate limited by the API.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),
}
