//! Google OAuth login and session verification handlers.
//!
//! The flow mirrors the usual server-side OAuth dance: `/login/google`
//! stashes a CSRF state in the session and redirects to Google's consent
//! page; `/auth/google` validates the state, exchanges the code, provisions
//! the user on first login, and hands back a signed access token in a
//! cookie. Browser-facing failures redirect home with an error hint instead
//! of surfacing a JSON error body.

use axum::{
    Json,
    extract::{Query, State},
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use rand::Rng;
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;

use quitanda_core::Email;

use crate::db::UserRepository;
use crate::error::clear_sentry_user;
use crate::middleware::{OptionalUser, access_token_cookie, clear_access_token_cookie};
use crate::state::AppState;

/// Session key holding the OAuth state between redirect and callback.
const OAUTH_STATE_KEY: &str = "oauth.google.state";

/// Query parameters from the Google OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange for tokens.
    pub code: Option<String>,
    /// State parameter for CSRF protection.
    pub state: Option<String>,
    /// Error code if the user denied authorization.
    pub error: Option<String>,
}

/// Generate a cryptographically secure random string.
fn generate_state(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            // SAFETY: idx is always within bounds since random_range returns 0..CHARSET.len()
            char::from(*CHARSET.get(idx).expect("idx within bounds"))
        })
        .collect()
}

/// Redirect home with an error hint the frontend can show.
fn auth_failed() -> Response {
    Redirect::to("/?error=auth_failed").into_response()
}

/// Initiate Google OAuth login.
///
/// Generates a state parameter, stores it in the session, and redirects
/// to Google's consent page.
///
/// # Route
///
/// `GET /login/google`
pub async fn login_google(State(state): State<AppState>, session: Session) -> Response {
    let oauth_state = generate_state(32);

    if let Err(e) = session.insert(OAUTH_STATE_KEY, &oauth_state).await {
        tracing::error!("Failed to store OAuth state in session: {e}");
        return auth_failed();
    }

    let auth_url = state.google().authorization_url(&oauth_state);
    Redirect::to(&auth_url).into_response()
}

/// Handle the Google OAuth callback.
///
/// Validates the state parameter, exchanges the authorization code,
/// creates the user on first login, and sets the access token cookie
/// before redirecting home.
///
/// # Route
///
/// `GET /auth/google`
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Response {
    // Check for errors from Google (e.g. the user clicked "cancel")
    if let Some(error) = query.error {
        tracing::warn!("Google OAuth error: {error}");
        return auth_failed();
    }

    let Some(code) = query.code else {
        tracing::warn!("Google OAuth callback missing code");
        return auth_failed();
    };

    // Verify state parameter (CSRF protection)
    let Some(returned_state) = query.state else {
        tracing::warn!("Google OAuth callback missing state");
        return auth_failed();
    };

    let stored_state: Option<String> = session.get(OAUTH_STATE_KEY).await.ok().flatten();
    if stored_state.as_ref() != Some(&returned_state) {
        tracing::warn!("Google OAuth state mismatch");
        return auth_failed();
    }

    // Clear the stored state (one-time use)
    let _ = session.remove::<String>(OAUTH_STATE_KEY).await;

    let google_token = match state.google().exchange_code(&code).await {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Failed to exchange Google OAuth code: {e}");
            return auth_failed();
        }
    };

    let info = match state.google().fetch_userinfo(&google_token).await {
        Ok(info) => info,
        Err(e) => {
            tracing::error!("Failed to fetch Google user info: {e}");
            return auth_failed();
        }
    };

    let email = match Email::parse(&info.email) {
        Ok(email) => email,
        Err(e) => {
            tracing::warn!("Google returned an unusable email address: {e}");
            return auth_failed();
        }
    };

    let name = info.name.unwrap_or_default();
    let user = match UserRepository::new(state.pool())
        .find_or_create(&email, &name)
        .await
    {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("Failed to provision user after Google login: {e}");
            return auth_failed();
        }
    };

    let access_token = match state.tokens().issue(&user.email, &user.name) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Failed to issue access token: {e}");
            return auth_failed();
        }
    };

    tracing::info!(user_id = %user.id, "User authenticated via Google");

    let cookie = access_token_cookie(&access_token, state.config().is_https());
    (AppendHeaders([(SET_COOKIE, cookie)]), Redirect::to("/")).into_response()
}

/// Report whether the caller holds a valid access token.
///
/// Always answers 200; the body carries the authentication state so the
/// frontend can poll it without tripping error handling.
///
/// # Route
///
/// `GET /verify-token`
pub async fn verify_token(OptionalUser(user): OptionalUser) -> Json<Value> {
    match user {
        Some(user) => Json(json!({
            "authenticated": true,
            "user": {
                "email": user.email,
                "name": user.name,
            },
        })),
        None => Json(json!({ "authenticated": false })),
    }
}

/// Clear the access token cookie.
///
/// # Route
///
/// `POST /logout`
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    clear_sentry_user();

    let cookie = clear_access_token_cookie(state.config().is_https());
    (
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(json!({ "message": "Logout successful" })),
    )
}
