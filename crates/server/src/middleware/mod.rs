//! HTTP middleware stack.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. CORS (allowed origins from configuration)
//! 4. Session layer (tower-sessions with `SQLite` store, OAuth state only)
//!
//! Access-token authentication is an extractor rather than a layer, so
//! public routes stay free of it.

pub mod auth;
pub mod session;

pub use auth::{
    ACCESS_TOKEN_COOKIE, CurrentUser, OptionalUser, access_token_cookie,
    clear_access_token_cookie,
};
pub use session::create_session_layer;
