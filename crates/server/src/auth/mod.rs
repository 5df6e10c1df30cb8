//! Authentication: Google OAuth on the way in, short-lived JWTs after.
//!
//! Login flows through Google's authorization-code grant
//! ([`google::GoogleClient`]); a successful callback mints a signed token
//! ([`token::TokenManager`]) that rides in the `access_token` cookie for
//! 30 minutes. There is no refresh flow: when the token expires the user
//! signs in again.

pub mod google;
pub mod token;

pub use google::{GoogleClient, GoogleUserInfo};
pub use token::{Claims, TokenManager, TOKEN_TTL_SECS};

use thiserror::Error;

/// Errors that can occur during authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Outbound HTTP call to Google failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Google answered but the payload wasn't usable.
    #[error("malformed response from Google: {0}")]
    MalformedResponse(String),

    /// Token signing failed.
    #[error("failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),

    /// Token failed validation: bad signature, expired, or garbled.
    #[error("invalid or expired token")]
    InvalidToken,
}
