// Login entry point and logout

use actix_web::{web, HttpResponse, Result};
use log::info;

use crate::github::GitHubClient;
use crate::session::SessionManager;

/// Send the browser to GitHub's consent screen
///
/// No caller input is incorporated into the redirect; the URL is a pure
/// function of configuration.
pub async fn github_login(github: web::Data<GitHubClient>) -> Result<HttpResponse> {
    let auth_url = github.authorization_url();
    info!("Redirecting to GitHub OAuth: {auth_url}");

    Ok(HttpResponse::Found()
        .append_header(("Location", auth_url))
        .finish())
}

/// Clear the session cookie and return to the root page
///
/// Idempotent: logging out without a session still redirects home.
pub async fn logout(session_manager: web::Data<SessionManager>) -> Result<HttpResponse> {
    info!("Logging out, clearing session cookie");

    Ok(HttpResponse::Found()
        .cookie(session_manager.clear_session_cookie())
        .append_header(("Location", "/"))
        .finish())
}
