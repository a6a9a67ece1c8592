// Root page in its two states, plus the health check

use actix_web::{web, HttpRequest, HttpResponse, Result};

use crate::models::HealthResponse;
use crate::session::SessionManager;

/// Root page: renders the logged-in or logged-out view purely from the
/// decrypted session cookie
pub async fn index(
    req: HttpRequest,
    session_manager: web::Data<SessionManager>,
) -> Result<HttpResponse> {
    let body = match session_manager.session_from_request(&req) {
        Some(session) => render_logged_in(&session.username),
        None => render_logged_out().to_string(),
    };

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}

/// Health check endpoint
pub async fn health() -> Result<HttpResponse> {
    let response = HealthResponse {
        status: "ok".to_string(),
        message: "Octogate GitHub login service is running".to_string(),
    };
    Ok(HttpResponse::Ok().json(response))
}

/// Logged-in view greeting the user by name
///
/// The username is the only untrusted value rendered anywhere, so it is
/// HTML-escaped here at the template boundary.
fn render_logged_in(username: &str) -> String {
    let username = html_escape::encode_text(username);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Logged In</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <link href="https://fonts.googleapis.com/css2?family=Inter:wght@400;500;600;700&display=swap" rel="stylesheet">
    <style>{shared}{page}</style>
</head>
<body class="bg-gray-100 flex items-center justify-center p-4">
    <div class="container">
        <h2 class="text-3xl font-bold text-gray-800 mb-4">Logged In!</h2>
        <p class="text-gray-700 text-lg mb-6">Welcome, {username}!</p>
        <a href="/logout" class="button">Logout</a>
    </div>
</body>
</html>"#,
        shared = shared_styles(),
        page = logged_in_styles(),
    )
}

/// Logged-out view with the single login action
///
/// Fully static so the logged-out rendering is the same bytes on every
/// request.
const fn render_logged_out() -> &'static str {
    r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Login with GitHub</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <link href="https://fonts.googleapis.com/css2?family=Inter:wght@400;500;600;700&display=swap" rel="stylesheet">
    <style>
        body { font-family: 'Inter', sans-serif; background-color: #f0f2f5; display: flex; justify-content: center; align-items: center; min-height: 100vh; margin: 0; }
        .container { background-color: #ffffff; border-radius: 12px; box-shadow: 0 4px 20px rgba(0, 0, 0, 0.1); padding: 32px; text-align: center; max-width: 400px; width: 100%; }
        .github-button {
            display: inline-flex;
            align-items: center;
            gap: 8px;
            padding: 12px 24px;
            background-color: #24292e;
            color: white;
            font-weight: 600;
            border-radius: 8px;
            border: none;
            cursor: pointer;
            transition: background-color 0.2s ease-in-out;
        }
        .github-button:hover {
            background-color: #333;
        }
        .github-icon {
            width: 24px;
            height: 24px;
            fill: currentColor;
        }
    </style>
</head>
<body class="bg-gray-100 flex items-center justify-center p-4">
    <div class="container">
        <h2 class="text-3xl font-bold text-gray-800 mb-6">Login to My App</h2>
        <a href="/login/github" class="github-button">
            <svg class="github-icon" viewBox="0 0 16 16" version="1.1" aria-hidden="true">
                <path d="M8 0c4.42 0 8 3.58 8 8a8.013 8.013 0 0 1-5.45 7.59c-.4.08-.55-.17-.55-.38 0-.19.01-.82.01-1.49-2.01.37-2.53-.49-2.69-.94-.09-.23-.48-.94-.82-1.13-.28-.15-.68-.52-.01-.53.63-.01 1.08.58 1.23.82.72 1.21 1.87.87 2.33.66.07-.52.28-.87.51-1.07-1.78-.2-3.64-.89-3.64-3.95 0-.87.31-1.59.82-2.15-.08-.2-.36-1.02.08-2.12 0 0 .67-.21 2.2.82.64-.18 1.32-.27 2-.27.68 0 1.36.09 2 .27 1.53-1.03 2.2-.82 2.2-.82.44 1.1.16 1.92.08 2.12.51.56.82 1.27.82 2.15 0 3.07-1.87 3.75-3.65 3.95.29.25.54.73.54 1.48 0 1.07.01 1.93.01 2.2 0 .21.15.46.55.38A8.013 8.013 0 0 0 16 8c0-4.42-3.58-8-8-8Z"></path>
            </svg>
            Login with GitHub
        </a>
    </div>
</body>
</html>"##
}

const fn shared_styles() -> &'static str {
    r"
        body { font-family: 'Inter', sans-serif; background-color: #f0f2f5; display: flex; justify-content: center; align-items: center; min-height: 100vh; margin: 0; }
        .container { background-color: #ffffff; border-radius: 12px; box-shadow: 0 4px 20px rgba(0, 0, 0, 0.1); padding: 32px; text-align: center; max-width: 400px; width: 100%; }
    "
}

const fn logged_in_styles() -> &'static str {
    r"
        .button { padding: 10px 20px; background-color: #ef4444; color: white; font-weight: 600; border-radius: 8px; border: none; cursor: pointer; transition: background-color 0.2s ease-in-out; }
        .button:hover { background-color: #dc2626; }
    "
}
