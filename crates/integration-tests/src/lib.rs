//! Integration tests for Cybee.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the servers against a test Firebase project
//! cargo run -p cybee-storefront &
//! cargo run -p cybee-admin &
//!
//! # Run the ignored live tests
//! cargo test -p cybee-integration-tests -- --ignored
//! ```
//!
//! Tests live in `tests/` and talk to running servers over HTTP with a
//! cookie-holding reqwest client. They are all `#[ignore]`d so a plain
//! `cargo test` never needs credentials or network access.

/// Base URL for the storefront (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned())
}

/// Base URL for the admin console (configurable via environment).
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_owned())
}

/// Create an HTTP client that keeps its session cookie.
#[must_use]
pub fn session_client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}
