#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the octogate application
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod errors;
pub mod github;
pub mod handlers;
pub mod models;
pub mod session;
pub mod settings;
pub mod utils;

/// Re-export commonly used items
pub use errors::AuthError;
pub use github::GitHubClient;
pub use handlers::configure_services;
pub use models::AuthSession;
pub use session::SessionManager;
pub use settings::OctogateSettings;
