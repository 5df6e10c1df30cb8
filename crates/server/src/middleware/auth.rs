//! Authentication middleware and extractors.
//!
//! Access tokens are signed JWTs carried in the `access_token` cookie.
//! Extractors re-resolve the token subject to a user row on every request,
//! so deleting a user immediately invalidates their outstanding tokens.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};

use quitanda_core::Email;

use crate::auth::TOKEN_TTL_SECS;
use crate::db::UserRepository;
use crate::error::{AppError, set_sentry_user};
use crate::models::User;
use crate::state::AppState;

/// Cookie carrying the signed access token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Extractor that requires a valid access token.
///
/// Rejects with 401 when the cookie is missing, the token fails
/// verification, or the subject no longer maps to a user row.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     CurrentUser(user): CurrentUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
#[derive(Debug)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = cookie_value(&parts.headers, ACCESS_TOKEN_COOKIE)
            .ok_or_else(|| AppError::Unauthenticated("Not authenticated".to_string()))?;

        let user = lookup_token_user(token, state)
            .await?
            .ok_or_else(|| AppError::Unauthenticated("Invalid token".to_string()))?;

        set_sentry_user(&user.id, Some(user.email.as_str()));

        Ok(Self(user))
    }
}

/// Extractor that optionally resolves the current user.
///
/// Unlike [`CurrentUser`], this never rejects; a missing or invalid token
/// yields `None`. Used by routes that report session state instead of
/// gating on it.
pub struct OptionalUser(pub Option<User>);

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = match cookie_value(&parts.headers, ACCESS_TOKEN_COOKIE) {
            Some(token) => lookup_token_user(token, state).await.ok().flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Resolve a raw token to its user row.
///
/// Verification failures collapse to `Ok(None)`; database failures
/// propagate so they surface as 500s rather than 401s.
async fn lookup_token_user(token: &str, state: &AppState) -> Result<Option<User>, AppError> {
    let Ok(claims) = state.tokens().verify(token) else {
        return Ok(None);
    };
    let Ok(email) = Email::parse(&claims.sub) else {
        return Ok(None);
    };

    let user = UserRepository::new(state.pool()).get_by_email(&email).await?;
    Ok(user)
}

/// Pull a cookie value out of the `Cookie` request header.
fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

/// Build the `Set-Cookie` value that installs the access token.
///
/// Expiry matches the token's own lifetime; the cookie outliving the token
/// would only produce avoidable 401s.
#[must_use]
pub fn access_token_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{ACCESS_TOKEN_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={TOKEN_TTL_SECS}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build the `Set-Cookie` value that expires the access token.
#[must_use]
pub fn clear_access_token_cookie(secure: bool) -> String {
    let mut cookie = format!("{ACCESS_TOKEN_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Request;
    use chrono::Utc;

    use quitanda_core::UserId;

    use super::*;
    use crate::test_support::test_state;

    fn parts_with_cookie(cookie: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/stores/");
        if let Some(value) = cookie {
            builder = builder.header(header::COOKIE, value);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    async fn seeded_user(state: &AppState) -> User {
        let user = User {
            id: UserId::new(),
            email: Email::parse("joao@example.com").unwrap(),
            name: "João".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        UserRepository::new(state.pool())
            .create(&user)
            .await
            .unwrap();
        user
    }

    #[test]
    fn test_cookie_value_finds_named_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            "quitanda_session=abc; access_token=tok123; theme=dark"
                .parse()
                .unwrap(),
        );

        assert_eq!(cookie_value(&headers, "access_token"), Some("tok123"));
        assert_eq!(cookie_value(&headers, "theme"), Some("dark"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn test_cookie_value_without_header() {
        assert_eq!(cookie_value(&HeaderMap::new(), "access_token"), None);
    }

    #[test]
    fn test_access_token_cookie_attributes() {
        let cookie = access_token_cookie("tok123", false);
        assert!(cookie.starts_with("access_token=tok123;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=1800"));
        assert!(!cookie.contains("Secure"));

        let secure = access_token_cookie("tok123", true);
        assert!(secure.ends_with("; Secure"));
    }

    #[test]
    fn test_clear_access_token_cookie_expires_immediately() {
        let cookie = clear_access_token_cookie(false);
        assert!(cookie.starts_with("access_token=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_current_user_accepts_valid_token() {
        let (state, _) = test_state().await;
        let user = seeded_user(&state).await;
        let token = state.tokens().issue(&user.email, &user.name).unwrap();

        let mut parts = parts_with_cookie(Some(&format!("access_token={token}")));
        let CurrentUser(resolved) = CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap();

        assert_eq!(resolved.id, user.id);
        assert_eq!(resolved.email, user.email);
    }

    #[tokio::test]
    async fn test_current_user_rejects_missing_cookie() {
        let (state, _) = test_state().await;

        let mut parts = parts_with_cookie(None);
        let err = CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn test_current_user_rejects_garbage_token() {
        let (state, _) = test_state().await;

        let mut parts = parts_with_cookie(Some("access_token=not-a-jwt"));
        let err = CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn test_current_user_rejects_token_for_unknown_user() {
        let (state, _) = test_state().await;
        let email = Email::parse("ghost@example.com").unwrap();
        let token = state.tokens().issue(&email, "Ghost").unwrap();

        let mut parts = parts_with_cookie(Some(&format!("access_token={token}")));
        let err = CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn test_optional_user_swallows_invalid_token() {
        let (state, _) = test_state().await;

        let mut parts = parts_with_cookie(Some("access_token=not-a-jwt"));
        let OptionalUser(user) = OptionalUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap();

        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_optional_user_resolves_valid_token() {
        let (state, _) = test_state().await;
        let user = seeded_user(&state).await;
        let token = state.tokens().issue(&user.email, &user.name).unwrap();

        let mut parts = parts_with_cookie(Some(&format!("access_token={token}")));
        let OptionalUser(resolved) = OptionalUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap();

        assert_eq!(resolved.unwrap().id, user.id);
    }
}
