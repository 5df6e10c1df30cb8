//! Integration tests for Quitanda.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the server
//! cargo run -p quitanda-server
//!
//! # Seed the demo user the authenticated tests sign in as
//! cargo run -p quitanda-cli -- seed
//!
//! # Run integration tests
//! cargo test -p quitanda-integration-tests -- --ignored
//! ```
//!
//! Authenticated tests sign their own access tokens, so `SECRET_KEY` must
//! hold the same value the server was started with. Without it (or without
//! the seeded demo user) those tests skip themselves instead of failing.

use reqwest::Client;
use secrecy::SecretString;
use serde_json::Value;

use quitanda_core::Email;
use quitanda_server::auth::TokenManager;

/// Email of the demo user created by `quitanda seed`.
pub const DEMO_USER_EMAIL: &str = "owner@example.com";

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("QUITANDA_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

/// Create an HTTP client with a cookie store.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Sign an access token for `email` the way the server does.
///
/// Returns `None` when `SECRET_KEY` is not exported to the test process,
/// letting callers skip instead of fail.
#[must_use]
pub fn access_token(email: &str, name: &str) -> Option<String> {
    let secret = std::env::var("SECRET_KEY").ok()?;
    let email = Email::parse(email).ok()?;
    TokenManager::new(&SecretString::from(secret))
        .issue(&email, name)
        .ok()
}

/// Cookie header value carrying an access token.
#[must_use]
pub fn auth_cookie(token: &str) -> String {
    format!("access_token={token}")
}

/// Sign in as the seeded demo user.
///
/// Returns the cookie header value on success, or `None` when the signing
/// secret is unavailable or the server does not know the demo user yet
/// (seed not run). Callers skip in that case.
pub async fn demo_user_cookie(client: &Client) -> Option<String> {
    let token = access_token(DEMO_USER_EMAIL, "Demo Owner")?;
    let cookie = auth_cookie(&token);

    let resp = client
        .get(format!("{}/verify-token", base_url()))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await
        .ok()?;
    let body: Value = resp.json().await.ok()?;

    (body.get("authenticated") == Some(&Value::Bool(true))).then_some(cookie)
}
