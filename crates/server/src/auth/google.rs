//! Google OAuth 2.0 client (authorization-code grant).
//!
//! Three calls against Google's endpoints: build the consent-screen URL,
//! exchange the callback code for an access token, and fetch the user's
//! profile. Only `email` and `name` are kept from the profile.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::AuthError;
use crate::config::GoogleConfig;

const AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Scopes requested at the consent screen.
const SCOPES: &str = "openid email profile";

/// Profile fields returned by the userinfo endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUserInfo {
    /// Verified email address of the Google account.
    pub email: String,
    /// Display name; absent on rare bare accounts.
    #[serde(default)]
    pub name: Option<String>,
}

/// Client for Google's OAuth endpoints.
pub struct GoogleClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: SecretString,
    redirect_uri: String,
}

impl GoogleClient {
    /// Create a new Google OAuth client.
    #[must_use]
    pub fn new(config: &GoogleConfig, redirect_uri: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri,
        }
    }

    /// Build the consent-screen URL the login route redirects to.
    ///
    /// The `state` nonce is verified by the callback against the session to
    /// tie the two halves of the flow together.
    #[must_use]
    pub fn authorization_url(&self, state: &str) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", SCOPES)
            .append_pair("state", state)
            .finish();

        format!("{AUTHORIZATION_ENDPOINT}?{query}")
    }

    /// Exchange an authorization code for an access token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Http` if the call fails or Google answers with
    /// an error status.
    pub async fn exchange_code(&self, code: &str) -> Result<String, AuthError> {
        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
        }

        let response = self
            .http
            .post(TOKEN_ENDPOINT)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.expose_secret()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<TokenResponse>()
            .await?;

        Ok(response.access_token)
    }

    /// Fetch the profile of the account that granted the token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Http` if the call fails or Google answers with
    /// an error status.
    /// Returns `AuthError::MalformedResponse` if the profile has no email.
    pub async fn fetch_userinfo(&self, access_token: &str) -> Result<GoogleUserInfo, AuthError> {
        let info = self
            .http
            .get(USERINFO_ENDPOINT)
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?
            .json::<GoogleUserInfo>()
            .await?;

        if info.email.is_empty() {
            return Err(AuthError::MalformedResponse("missing email".to_owned()));
        }

        Ok(info)
    }
}
