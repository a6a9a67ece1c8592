use actix_web::cookie::Cookie;

/// Name of the single session cookie this service issues
pub const SESSION_COOKIE: &str = "octogate_session";

/// Options for cookie creation
pub struct CookieOptions {
    pub http_only: bool,
    pub secure: bool,
    pub same_site: actix_web::cookie::SameSite,
    pub path: String,
    pub max_age: actix_web::cookie::time::Duration,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            http_only: true,
            secure: true,
            // Lax so the cookie still rides the navigation back from GitHub
            same_site: actix_web::cookie::SameSite::Lax,
            path: "/".to_string(),
            max_age: actix_web::cookie::time::Duration::hours(24),
        }
    }
}

/// Create an expired cookie to clear a specific cookie
#[must_use]
pub fn create_expired_cookie(name: &str, secure: bool) -> Cookie<'static> {
    Cookie::build(name.to_owned(), "")
        .http_only(true)
        .secure(secure)
        .same_site(actix_web::cookie::SameSite::Lax)
        .path("/")
        .max_age(actix_web::cookie::time::Duration::seconds(-1))
        .finish()
}
