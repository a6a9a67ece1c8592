// GitHub OAuth callback: exchange the code, fetch the profile, seal the session

use actix_web::{web, HttpResponse};
use log::{info, warn};
use serde::Deserialize;

use crate::errors::AuthError;
use crate::github::GitHubClient;
use crate::models::AuthSession;
use crate::session::SessionManager;

#[derive(Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
}

/// Handle the redirect back from GitHub
///
/// On success the full session record is sealed into one cookie and the
/// browser is sent home. Nothing is written on any failure path, so a failed
/// callback leaves the previous login state untouched.
///
/// # Errors
///
/// - `AuthorizationDenied` (400) when no authorization code arrived
/// - `TokenExchange` (500) when GitHub yields no access token for the code
/// - `Upstream` (502) when GitHub cannot be reached
/// - `Session` (500) when the cookie cannot be sealed
pub async fn github_callback(
    query: web::Query<CallbackQuery>,
    github: web::Data<GitHubClient>,
    session_manager: web::Data<SessionManager>,
) -> Result<HttpResponse, AuthError> {
    if let Some(error) = &query.error {
        warn!("GitHub callback carried an error parameter: {error}");
    }

    let code = match query.code.as_deref() {
        Some(code) if !code.is_empty() => code,
        _ => return Err(AuthError::AuthorizationDenied),
    };

    let access_token = github.exchange_code(code).await?;
    let user = github.fetch_user(&access_token).await?;

    let session = AuthSession::new(access_token, user);
    info!("Retrieved GitHub user data: {}", session.username);

    let cookie = session_manager
        .create_session_cookie(&session)
        .map_err(|e| AuthError::Session(e.to_string()))?;

    Ok(HttpResponse::Found()
        .cookie(cookie)
        .append_header(("Location", "/"))
        .finish())
}
