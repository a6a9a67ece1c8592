use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OctogateSettings {
    pub application: ApplicationSettings,
    pub github: GitHubSettings,
    pub session: SessionSettings,
    pub cookies: CookieSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    /// Public base URL the OAuth callback is derived from; must match the
    /// callback URL registered with GitHub exactly
    pub redirect_base_url: String,
}

/// GitHub OAuth application credentials and endpoints
///
/// The endpoint URLs default to the public GitHub service and exist as
/// settings so tests can point the client at a local mock server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubSettings {
    pub client_id: String,
    pub client_secret: String,
    pub authorize_url: String,
    pub token_url: String,
    pub user_api_url: String,
    pub scope: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    pub session_secret: String,
    pub session_duration_hours: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieSettings {
    pub secure: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            redirect_base_url: "http://localhost:8080".to_string(),
        }
    }
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            authorize_url: "https://github.com/login/oauth/authorize".to_string(),
            token_url: "https://github.com/login/oauth/access_token".to_string(),
            user_api_url: "https://api.github.com/user".to_string(),
            scope: "user:email".to_string(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            session_secret: String::new(), // Will be generated if empty
            session_duration_hours: 24,
        }
    }
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            secure: true, // Default to secure cookies
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl OctogateSettings {
    /// Load settings from configuration files and environment variables
    ///
    /// Priority, highest to lowest: environment variables, Settings.toml in
    /// the current directory, built-in defaults. A `.env` file in the current
    /// directory is read into the process environment first.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Settings file cannot be read
    /// - TOML parsing fails
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_env_file();

        // Load base settings from TOML or defaults
        let mut settings = Self::load_base_settings()?;

        // Apply environment variable overrides
        Self::apply_env_overrides(&mut settings);

        // Logging comes up last so the resolved level applies
        Self::initialize_logging(&settings);

        Ok(settings)
    }

    /// Load base settings from Settings.toml or use defaults
    fn load_base_settings() -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings = Self::default();

        let config_path = std::path::PathBuf::from("Settings.toml");
        if config_path.exists() {
            let toml_content = fs::read_to_string(&config_path)?;
            settings = basic_toml::from_str(&toml_content)?;
            println!("✓ Loaded base settings from {}", config_path.display());
        }

        Ok(settings)
    }

    /// Apply environment variable overrides to settings
    fn apply_env_overrides(settings: &mut Self) {
        Self::apply_application_env_overrides(&mut settings.application);
        Self::apply_github_env_overrides(&mut settings.github);
        Self::apply_session_env_overrides(&mut settings.session);
        Self::apply_cookie_env_overrides(&mut settings.cookies);
        Self::apply_logging_env_overrides(&mut settings.logging);
    }

    /// Apply environment overrides for application settings
    fn apply_application_env_overrides(app_settings: &mut ApplicationSettings) {
        if let Ok(host) = std::env::var("HOST") {
            app_settings.host = host;
        }
        if let Ok(port_str) = std::env::var("PORT") {
            if let Ok(port) = port_str.parse::<u16>() {
                app_settings.port = port;
            }
        }
        if let Ok(redirect_base_url) = std::env::var("REDIRECT_BASE_URL") {
            app_settings.redirect_base_url = redirect_base_url;
        }
    }

    /// Apply environment overrides for GitHub OAuth settings
    pub fn apply_github_env_overrides(github_settings: &mut GitHubSettings) {
        if let Ok(client_id) = std::env::var("GITHUB_CLIENT_ID") {
            github_settings.client_id = client_id;
        }
        if let Ok(client_secret) = std::env::var("GITHUB_CLIENT_SECRET") {
            github_settings.client_secret = client_secret;
        }
        if let Ok(authorize_url) = std::env::var("GITHUB_AUTHORIZE_URL") {
            github_settings.authorize_url = authorize_url;
        }
        if let Ok(token_url) = std::env::var("GITHUB_TOKEN_URL") {
            github_settings.token_url = token_url;
        }
        if let Ok(user_api_url) = std::env::var("GITHUB_USER_API_URL") {
            github_settings.user_api_url = user_api_url;
        }
        if let Ok(scope) = std::env::var("GITHUB_SCOPE") {
            github_settings.scope = scope;
        }
    }

    /// Apply environment overrides for session settings
    pub fn apply_session_env_overrides(session_settings: &mut SessionSettings) {
        Self::apply_numeric_env_override(
            "SESSION_DURATION_HOURS",
            &mut session_settings.session_duration_hours,
        );

        // Handle session secret with special logic
        Self::handle_session_secret_override(session_settings);
    }

    /// Helper function to apply numeric environment variable overrides
    fn apply_numeric_env_override(env_var: &str, target: &mut u64) {
        if let Ok(value_str) = std::env::var(env_var) {
            if let Ok(value) = value_str.parse::<u64>() {
                *target = value;
            }
        }
    }

    /// Helper function to handle session secret environment override and generation
    fn handle_session_secret_override(session_settings: &mut SessionSettings) {
        let env_secret_set = std::env::var("SESSION_SECRET").is_ok_and(|secret| {
            if secret.is_empty() {
                false
            } else {
                session_settings.session_secret = secret;
                true
            }
        });

        // Generate random session secret if no environment variable was set and current value is empty
        if !env_secret_set && session_settings.session_secret.is_empty() {
            session_settings.session_secret = Self::generate_random_session_secret();
            Self::warn_about_generated_secret(&session_settings.session_secret);
        }
    }

    /// Generate a cryptographically secure random session secret
    ///
    /// Generates 32 bytes (256 bits) of entropy for AES-256 compatibility
    fn generate_random_session_secret() -> String {
        use rand::RngCore;
        let mut secret = [0u8; 32]; // 256 bits for AES-256
        rand::rng().fill_bytes(&mut secret);
        general_purpose::STANDARD.encode(secret)
    }

    /// Display warnings about using a generated session secret
    fn warn_about_generated_secret(secret: &str) {
        eprintln!("⚠️  WARNING: Using auto-generated session secret");
        eprintln!("📝 Generated secret: {secret}");
        eprintln!("🔒 For production use, set the SESSION_SECRET environment variable");
        eprintln!("   or configure session_secret in Settings.toml");
        eprintln!("💡 Existing sessions will not survive a restart unless the secret is pinned");
    }

    /// Apply environment overrides for cookie settings
    fn apply_cookie_env_overrides(cookie_settings: &mut CookieSettings) {
        if let Ok(cookie_secure_str) = std::env::var("COOKIE_SECURE") {
            if let Ok(cookie_secure) = cookie_secure_str.parse::<bool>() {
                cookie_settings.secure = cookie_secure;
            }
        }
    }

    /// Apply environment overrides for logging settings
    fn apply_logging_env_overrides(logging_settings: &mut LoggingSettings) {
        if let Ok(log_level) = std::env::var("RUST_LOG") {
            logging_settings.level = log_level;
        }
    }

    /// Load environment variables from .env file
    fn load_env_file() {
        if let Ok(contents) = std::fs::read_to_string(".env") {
            for line in contents.lines() {
                if let Some((key, value)) = line.split_once('=') {
                    std::env::set_var(key.trim(), value.trim());
                }
            }
        }
    }

    /// Bring up env_logger with the configured level as the fallback filter
    ///
    /// `RUST_LOG` still wins when set. Initialization is best-effort so tests
    /// that load settings repeatedly do not panic on the second logger.
    fn initialize_logging(settings: &Self) {
        let env = env_logger::Env::default().default_filter_or(&settings.logging.level);
        let _ = env_logger::Builder::from_env(env).try_init();
    }

    /// Get the bind address for the server
    #[must_use]
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.application.host, self.application.port)
    }
}
