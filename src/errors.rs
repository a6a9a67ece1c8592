// Error taxonomy for the login flow, mapped onto HTTP statuses

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

/// Everything that can go wrong between the callback arriving and the
/// session cookie being written
///
/// Handlers return these and let actix render the response. None of the
/// variants mutate session state; the user recovers by restarting the flow
/// from `/login/github`.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The provider sent the browser back without an authorization code,
    /// typically because the user declined the consent screen
    #[error("Error: GitHub authorization failed. Code not found.")]
    AuthorizationDenied,

    /// The token endpoint answered but produced no access token; carries the
    /// provider's error description or its raw response body
    #[error("Error getting access token: {0}")]
    TokenExchange(String),

    /// The provider could not be reached or returned an unreadable response
    #[error("GitHub request failed: {0}")]
    Upstream(String),

    /// The session record could not be sealed into a cookie
    #[error("Session error: {0}")]
    Session(String),
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::AuthorizationDenied => StatusCode::BAD_REQUEST,
            Self::TokenExchange(_) | Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Plain diagnostic text, deliberately unstyled
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}
