use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// Session record sealed into the `octogate_session` cookie
/// A decryptable cookie is the definition of "logged in"
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AuthSession {
    pub access_token: String,
    pub username: String,
    pub user_id: Option<i64>,
    pub email: Option<String>,
    pub authenticated_at: DateTime<Utc>,
}

impl AuthSession {
    /// Build a session from a freshly exchanged token and the profile it unlocked
    ///
    /// All fields are committed together so a readable cookie always carries
    /// the complete record. GitHub can omit `login` on some token types, in
    /// which case the username falls back to "Guest".
    #[must_use]
    pub fn new(access_token: String, user: GitHubUser) -> Self {
        Self {
            access_token,
            username: user.login.unwrap_or_else(|| "Guest".to_string()),
            user_id: user.id,
            email: user.email,
            authenticated_at: Utc::now(),
        }
    }
}

/// Subset of the GitHub `/user` profile this service cares about
/// Every field is optional; accounts with a private email return null
#[derive(Deserialize, Clone, Debug, Default)]
pub struct GitHubUser {
    pub login: Option<String>,
    pub id: Option<i64>,
    pub email: Option<String>,
}
