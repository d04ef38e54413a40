//! Integration tests for Lotus.
//!
//! # Running Tests
//!
//! The tests in `tests/` exercise a running API server end-to-end and are
//! skipped unless `LOTUS_API_URL` points at one:
//!
//! ```bash
//! # Start the database and the server
//! cargo run -p lotus-cli -- migrate
//! cargo run -p lotus-api &
//!
//! # Run the integration tests against it
//! LOTUS_API_URL=http://localhost:8080 cargo test -p lotus-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `auth` - Registration and login
//! - `cart_checkout` - Stock admission control and the checkout transaction

use reqwest::Client;

/// Base URL of the API under test, if one was configured.
///
/// Tests return early (skip) when this is `None`, so a plain `cargo test`
/// without a running server stays green.
#[must_use]
pub fn api_base_url() -> Option<String> {
    std::env::var("LOTUS_API_URL")
        .ok()
        .map(|url| url.trim_end_matches('/').to_string())
}

/// Build an HTTP client for the tests.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// A unique email address for registration tests.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@test.lotus", uuid::Uuid::new_v4())
}
