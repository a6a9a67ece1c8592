#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use actix_web::{middleware::Logger, web, App, HttpServer};
use octogate::{handlers::configure_services, GitHubClient, OctogateSettings, SessionManager};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load configuration from Settings.toml and environment variables
    // This also loads .env file and initializes the logger
    let settings = OctogateSettings::load()
        .map_err(|e| std::io::Error::other(format!("Failed to load settings: {e}")))?;

    let github = GitHubClient::from_settings(&settings)
        .map_err(|e| std::io::Error::other(format!("Failed to configure GitHub client: {e}")))?;
    let session_manager = SessionManager::from_settings(&settings);

    start_server(github, session_manager, settings).await
}

/// Start the server with stateless sessions
///
/// # Errors
///
/// Returns an error if:
/// - Server binding fails
/// - Server fails to start
async fn start_server(
    github: GitHubClient,
    session_manager: SessionManager,
    settings: OctogateSettings,
) -> std::io::Result<()> {
    let bind_address = settings.get_bind_address();
    print_startup_info(&bind_address, &settings);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(github.clone()))
            .app_data(web::Data::new(session_manager.clone()))
            .wrap(Logger::default())
            .configure(configure_services)
    })
    .bind(&bind_address)?
    .run()
    .await
}

fn print_startup_info(bind_address: &str, settings: &OctogateSettings) {
    println!("Starting Octogate GitHub login service on http://{bind_address}");
    println!();
    println!("Endpoints:");
    println!("  GET  /                - Home page (login state aware)");
    println!("  GET  /login/github    - Redirect to GitHub authorization");
    println!("  GET  /github_callback - OAuth callback (exchanges code for a session)");
    println!("  GET  /logout          - Clear session");
    println!("  GET  /ping            - Health check");
    println!();
    println!("OAuth callback URL to register with GitHub:");
    println!(
        "  {}/github_callback",
        settings.application.redirect_base_url
    );
}
