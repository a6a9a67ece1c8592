// GitHub OAuth client: authorize URL construction, code exchange, profile fetch

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use url::Url;

use crate::errors::AuthError;
use crate::models::GitHubUser;
use crate::settings::OctogateSettings;

/// Outbound calls that take longer than this are treated as failed
const OUTBOUND_TIMEOUT_SECS: u64 = 10;

/// Token endpoint response, parsed leniently
///
/// GitHub reports exchange failures as a 200 with `error` fields in the
/// body, so every field is optional and the caller inspects what arrived.
#[derive(Debug, Default, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Client for the GitHub web-application OAuth flow
///
/// Built once at startup from settings and shared across handlers. Endpoint
/// URLs come from settings so tests can aim the client at a mock server.
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    authorize_url: Url,
    token_url: String,
    user_api_url: String,
    redirect_uri: String,
    scope: String,
}

impl GitHubClient {
    /// Build the client from settings, validating what must be present
    ///
    /// # Errors
    ///
    /// Returns an error if the client credentials are missing, the authorize
    /// URL does not parse, or the HTTP client cannot be constructed.
    pub fn from_settings(settings: &OctogateSettings) -> Result<Self> {
        let github = &settings.github;

        if github.client_id.is_empty() {
            return Err(anyhow!(
                "GitHub client_id is not configured (set GITHUB_CLIENT_ID)"
            ));
        }
        if github.client_secret.is_empty() {
            return Err(anyhow!(
                "GitHub client_secret is not configured (set GITHUB_CLIENT_SECRET)"
            ));
        }

        let authorize_url = Url::parse(&github.authorize_url)
            .with_context(|| format!("invalid authorize URL: {}", github.authorize_url))?;

        // Must byte-match the callback URL registered with the OAuth app
        let redirect_uri = format!(
            "{}/github_callback",
            settings.application.redirect_base_url.trim_end_matches('/')
        );

        // GitHub's API rejects requests without a User-Agent
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(OUTBOUND_TIMEOUT_SECS))
            .user_agent(concat!("octogate/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            client_id: github.client_id.clone(),
            client_secret: github.client_secret.clone(),
            authorize_url,
            token_url: github.token_url.clone(),
            user_api_url: github.user_api_url.clone(),
            redirect_uri,
            scope: github.scope.clone(),
        })
    }

    /// The URL the browser is sent to for the consent screen
    // TODO: append a `state` pair backed by a short-lived cookie and compare
    // it in the callback before exchanging the code
    #[must_use]
    pub fn authorization_url(&self) -> String {
        let mut url = self.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("scope", &self.scope);

        url.to_string()
    }

    /// Exchange an authorization code for an access token
    ///
    /// # Errors
    ///
    /// Returns `Upstream` when the token endpoint is unreachable and
    /// `TokenExchange` when it answers without an access token; the latter
    /// carries the provider's error description, or the raw body when there
    /// is none.
    pub async fn exchange_code(&self, code: &str) -> Result<String, AuthError> {
        let mut params = HashMap::new();
        params.insert("client_id", self.client_id.as_str());
        params.insert("client_secret", self.client_secret.as_str());
        params.insert("code", code);
        params.insert("redirect_uri", self.redirect_uri.as_str());
        params.insert("accept", "json");

        log::debug!("Exchanging authorization code at {}", self.token_url);

        let response = self
            .http
            .post(&self.token_url)
            .header("Accept", "application/json")
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::Upstream(format!("token request failed: {e}")))?;

        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Upstream(format!("token response unreadable: {e}")))?;

        // Exchange failures arrive as error fields in the body, not as an
        // HTTP error status
        let token_response: TokenResponse = serde_json::from_str(&body).unwrap_or_default();

        match token_response.access_token {
            Some(token) if !token.is_empty() => {
                log::info!("Access token received: {}...", token_prefix(&token));
                Ok(token)
            }
            _ => {
                if let Some(error) = &token_response.error {
                    log::warn!("Token exchange rejected by GitHub: {error}");
                }
                Err(AuthError::TokenExchange(
                    token_response.error_description.unwrap_or(body),
                ))
            }
        }
    }

    /// Fetch the authenticated user's profile with a bearer token
    ///
    /// The response is parsed leniently; a body without the expected fields
    /// simply yields an empty profile, which the caller turns into a "Guest"
    /// session.
    ///
    /// # Errors
    ///
    /// Returns `Upstream` when the API is unreachable or the body is not JSON.
    pub async fn fetch_user(&self, access_token: &str) -> Result<GitHubUser, AuthError> {
        let response = self
            .http
            .get(&self.user_api_url)
            .header("Authorization", format!("token {access_token}"))
            .header("Accept", "application/vnd.github.v3+json")
            .send()
            .await
            .map_err(|e| AuthError::Upstream(format!("user profile request failed: {e}")))?;

        response
            .json::<GitHubUser>()
            .await
            .map_err(|e| AuthError::Upstream(format!("user profile response unreadable: {e}")))
    }
}

/// First few characters of a token, safe to log
fn token_prefix(token: &str) -> String {
    token.chars().take(5).collect()
}
