// HTTP request handlers and route wiring
pub mod auth;
pub mod callback;
pub mod pages;

// Re-export the main handler functions
pub use auth::{github_login, logout};
pub use callback::github_callback;
pub use pages::{health, index};

use actix_web::web;

/// Wire up every route this service serves
///
/// Shared between `main` and the integration tests so both exercise the
/// same surface.
pub fn configure_services(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/login/github", web::get().to(github_login))
        .route("/github_callback", web::get().to(github_callback))
        .route("/logout", web::get().to(logout))
        .route("/ping", web::get().to(health));
}
