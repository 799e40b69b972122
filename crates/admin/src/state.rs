//! Shared application state for the admin console.

use std::sync::Arc;

use cybee_firebase::{FirestoreClient, IdentityClient};

use crate::config::AdminConfig;

/// Application state shared across all admin routes.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    firestore: FirestoreClient,
    identity: IdentityClient,
}

impl AppState {
    /// Build the state and its backend clients.
    #[must_use]
    pub fn new(config: AdminConfig) -> Self {
        let firestore = FirestoreClient::new(&config.firebase);
        let identity = IdentityClient::new(&config.firebase);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                firestore,
                identity,
            }),
        }
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Firestore document client.
    #[must_use]
    pub fn firestore(&self) -> &FirestoreClient {
        &self.inner.firestore
    }

    /// Identity Toolkit client.
    #[must_use]
    pub fn identity(&self) -> &IdentityClient {
        &self.inner.identity
    }
}
