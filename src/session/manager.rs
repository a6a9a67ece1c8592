//! Stateless encrypted session handling
//!
//! The `SessionManager` seals an [`AuthSession`] into a single AES-256-GCM
//! encrypted cookie and reads it back on later requests. There is no
//! server-side store; a cookie that decrypts is the session.

use actix_web::cookie::Cookie;
use actix_web::HttpRequest;
use anyhow::Result;

use crate::models::AuthSession;
use crate::session::cookie::{create_expired_cookie, CookieOptions, SESSION_COOKIE};
use crate::settings::OctogateSettings;
use crate::utils::crypto::{decrypt_data, derive_encryption_key, encrypt_data};

#[derive(Clone)]
pub struct SessionManager {
    encryption_key: [u8; 32],
    cookie_secure: bool,
    session_duration_hours: u64,
}

impl SessionManager {
    /// Create a new session manager from raw key material
    ///
    /// The key is run through `derive_encryption_key`, so any secret length
    /// is accepted.
    #[must_use]
    pub fn new(key: &[u8], cookie_secure: bool, session_duration_hours: u64) -> Self {
        Self {
            encryption_key: derive_encryption_key(key),
            cookie_secure,
            session_duration_hours,
        }
    }

    #[must_use]
    pub fn from_settings(settings: &OctogateSettings) -> Self {
        Self::new(
            settings.session.session_secret.as_bytes(),
            settings.cookies.secure,
            settings.session.session_duration_hours,
        )
    }

    /// Read and decrypt the session from request cookies
    ///
    /// A missing, corrupt, or otherwise undecryptable cookie is treated as
    /// logged out, never as an error. Stale cookies from a previous secret
    /// fall out here.
    #[must_use]
    pub fn session_from_request(&self, req: &HttpRequest) -> Option<AuthSession> {
        let cookie = req.cookie(SESSION_COOKIE)?;
        match decrypt_data::<AuthSession>(cookie.value(), &self.encryption_key) {
            Ok(session) => Some(session),
            Err(e) => {
                log::warn!("Discarding session cookie that failed decryption: {e}");
                None
            }
        }
    }

    /// Seal a session record into the session cookie
    ///
    /// # Errors
    ///
    /// Returns an error if encryption fails
    pub fn create_session_cookie(&self, session: &AuthSession) -> Result<Cookie<'static>> {
        let value = encrypt_data(session, &self.encryption_key)?;
        let options = CookieOptions {
            secure: self.cookie_secure,
            max_age: actix_web::cookie::time::Duration::hours(
                i64::try_from(self.session_duration_hours).unwrap_or(24),
            ),
            ..Default::default()
        };

        Ok(Cookie::build(SESSION_COOKIE, value)
            .http_only(options.http_only)
            .secure(options.secure)
            .same_site(options.same_site)
            .path(options.path)
            .max_age(options.max_age)
            .finish())
    }

    /// Build an expired cookie that clears the session
    #[must_use]
    pub fn clear_session_cookie(&self) -> Cookie<'static> {
        create_expired_cookie(SESSION_COOKIE, self.cookie_secure)
    }

    /// The derived 32-byte encryption key (exposed for tests that need to
    /// inspect sealed cookies)
    #[must_use]
    pub fn encryption_key(&self) -> &[u8; 32] {
        &self.encryption_key
    }

    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }
}
