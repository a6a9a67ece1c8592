//! Session management
//!
//! Stateless encrypted sessions carried in a single cookie.
//!
//! - [`manager`] - Sealing and reading the encrypted session cookie
//! - [`cookie`] - Cookie names, options, and expiry helpers

pub mod cookie;
pub mod manager;

// Re-export commonly used items for convenience
pub use cookie::{create_expired_cookie, CookieOptions, SESSION_COOKIE};
pub use manager::SessionManager;
