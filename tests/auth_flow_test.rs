// Integration tests for the GitHub login flow, driven through the real route
// table with GitHub stood in by a local mock server
use actix_web::cookie::Cookie;
use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string_contains, header as header_match, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use octogate::models::GitHubUser;
use octogate::session::SESSION_COOKIE;
use octogate::{configure_services, AuthSession, GitHubClient, OctogateSettings, SessionManager};

/// Settings pointing every GitHub endpoint at the given base URL
fn test_settings(github_base: &str) -> OctogateSettings {
    let mut settings = OctogateSettings::default();
    settings.application.redirect_base_url = "http://localhost:8080".to_string();
    settings.github.client_id = "test-client-id".to_string();
    settings.github.client_secret = "test-client-secret".to_string();
    settings.github.authorize_url = format!("{github_base}/login/oauth/authorize");
    settings.github.token_url = format!("{github_base}/login/oauth/access_token");
    settings.github.user_api_url = format!("{github_base}/user");
    settings.session.session_secret = "an-integration-test-session-key!".to_string();
    settings.cookies.secure = false;
    settings
}

/// Build the application with the real route table
macro_rules! test_app {
    ($settings:expr) => {{
        let github = GitHubClient::from_settings($settings).expect("GitHub client should build");
        let session_manager = SessionManager::from_settings($settings);
        test::init_service(
            App::new()
                .app_data(web::Data::new(github))
                .app_data(web::Data::new(session_manager))
                .configure(configure_services),
        )
        .await
    }};
}

fn alice_session() -> AuthSession {
    AuthSession::new(
        "gho_testtoken123".to_string(),
        GitHubUser {
            login: Some("alice".to_string()),
            id: Some(42),
            email: None,
        },
    )
}

fn location_of(resp: &actix_web::dev::ServiceResponse) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("response should carry a Location header")
        .to_string()
}

#[actix_web::test]
async fn test_home_page_offers_login_when_logged_out() {
    let settings = test_settings("http://github.test");
    let app = test_app!(&settings);

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"));

    let body = String::from_utf8_lossy(&test::read_body(resp).await).to_string();
    assert!(body.contains("Login with GitHub"));
    assert!(body.contains("href=\"/login/github\""));
    assert!(
        !body.contains("Welcome,"),
        "logged-out page should not greet anyone"
    );
}

#[actix_web::test]
async fn test_home_page_greets_session_user() {
    let settings = test_settings("http://github.test");
    let session_manager = SessionManager::from_settings(&settings);
    let cookie = session_manager
        .create_session_cookie(&alice_session())
        .expect("should seal session cookie");

    let app = test_app!(&settings);
    let req = test::TestRequest::get().uri("/").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8_lossy(&test::read_body(resp).await).to_string();
    assert!(body.contains("Welcome, alice!"));
    assert!(body.contains("href=\"/logout\""));
}

#[actix_web::test]
async fn test_home_page_treats_tampered_cookie_as_logged_out() {
    let settings = test_settings("http://github.test");
    let app = test_app!(&settings);

    let req = test::TestRequest::get()
        .uri("/")
        .cookie(Cookie::new(SESSION_COOKIE, "not-a-sealed-session"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8_lossy(&test::read_body(resp).await).to_string();
    assert!(body.contains("Login with GitHub"));
    assert!(!body.contains("Welcome,"));
}

#[actix_web::test]
async fn test_login_redirects_to_consent_screen() {
    let settings = test_settings("http://github.test");
    let app = test_app!(&settings);

    let req = test::TestRequest::get().uri("/login/github").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    let location = location_of(&resp);
    assert!(location.starts_with("http://github.test/login/oauth/authorize?"));

    let url = Url::parse(&location).expect("Location should be a valid URL");
    let pairs: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
    assert_eq!(pairs["client_id"], "test-client-id");
    assert_eq!(pairs["redirect_uri"], "http://localhost:8080/github_callback");
    assert_eq!(pairs["scope"], "user:email");

    // Reserved characters must be percent-encoded on the wire
    assert!(location.contains("scope=user%3Aemail"));
    assert!(location.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fgithub_callback"));
}

#[actix_web::test]
async fn test_callback_without_code_is_bad_request() {
    let settings = test_settings("http://github.test");
    let app = test_app!(&settings);

    let req = test::TestRequest::get().uri("/github_callback").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(
        resp.response().cookies().next().is_none(),
        "failed callback must not set any cookie"
    );
    let body = String::from_utf8_lossy(&test::read_body(resp).await).to_string();
    assert_eq!(body, "Error: GitHub authorization failed. Code not found.");
}

#[actix_web::test]
async fn test_callback_with_empty_code_is_bad_request() {
    let settings = test_settings("http://github.test");
    let app = test_app!(&settings);

    let req = test::TestRequest::get()
        .uri("/github_callback?code=")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_callback_completes_login_and_seals_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .and(header_match("accept", "application/json"))
        .and(body_string_contains("code=test-auth-code"))
        .and(body_string_contains("client_id=test-client-id"))
        .and(body_string_contains("client_secret=test-client-secret"))
        .and(body_string_contains(
            "redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fgithub_callback",
        ))
        .and(body_string_contains("accept=json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "gho_testtoken123",
            "token_type": "bearer",
            "scope": "user:email"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header_match("authorization", "token gho_testtoken123"))
        .and(header_match("accept", "application/vnd.github.v3+json"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": "alice",
            "id": 42,
            "email": null,
            "avatar_url": "https://avatars.githubusercontent.com/u/42",
            "name": "Alice Example"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = test_settings(&server.uri());
    let session_manager = SessionManager::from_settings(&settings);
    let app = test_app!(&settings);

    let req = test::TestRequest::get()
        .uri("/github_callback?code=test-auth-code")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location_of(&resp), "/");

    let session_cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .expect("successful callback should set the session cookie")
        .into_owned();

    let session: AuthSession = octogate::utils::crypto::decrypt_data(
        session_cookie.value(),
        session_manager.encryption_key(),
    )
    .expect("session cookie should decrypt with the configured secret");

    assert_eq!(session.access_token, "gho_testtoken123");
    assert_eq!(session.username, "alice");
    assert_eq!(session.user_id, Some(42));
    assert_eq!(session.email, None);

    // The sealed cookie logs the browser in on the next request
    let req = test::TestRequest::get()
        .uri("/")
        .cookie(session_cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body = String::from_utf8_lossy(&test::read_body(resp).await).to_string();
    assert!(body.contains("Welcome, alice!"));
}

#[actix_web::test]
async fn test_callback_reports_provider_rejection() {
    let server = MockServer::start().await;

    // GitHub reports a bad code as 200 with error fields in the body
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "bad_verification_code",
            "error_description": "The code passed is incorrect or expired."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = test_settings(&server.uri());
    let app = test_app!(&settings);

    let req = test::TestRequest::get()
        .uri("/github_callback?code=expired-code")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        resp.response().cookies().next().is_none(),
        "failed exchange must not set any cookie"
    );
    let body = String::from_utf8_lossy(&test::read_body(resp).await).to_string();
    assert_eq!(
        body,
        "Error getting access token: The code passed is incorrect or expired."
    );
}

#[actix_web::test]
async fn test_callback_surfaces_raw_body_when_token_response_is_not_json() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("upstream had a bad day"))
        .expect(1)
        .mount(&server)
        .await;

    let settings = test_settings(&server.uri());
    let app = test_app!(&settings);

    let req = test::TestRequest::get()
        .uri("/github_callback?code=some-code")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = String::from_utf8_lossy(&test::read_body(resp).await).to_string();
    assert_eq!(body, "Error getting access token: upstream had a bad day");
}

#[actix_web::test]
async fn test_callback_when_github_is_unreachable_is_bad_gateway() {
    // Port 1 on loopback refuses connections
    let settings = test_settings("http://127.0.0.1:1");
    let app = test_app!(&settings);

    let req = test::TestRequest::get()
        .uri("/github_callback?code=some-code")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert!(resp.response().cookies().next().is_none());
    let body = String::from_utf8_lossy(&test::read_body(resp).await).to_string();
    assert!(body.starts_with("GitHub request failed:"));
}

#[actix_web::test]
async fn test_callback_without_profile_login_becomes_guest() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "gho_guesttoken"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let settings = test_settings(&server.uri());
    let session_manager = SessionManager::from_settings(&settings);
    let app = test_app!(&settings);

    let req = test::TestRequest::get()
        .uri("/github_callback?code=some-code")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    let session_cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .expect("callback should still produce a session")
        .into_owned();

    let session: AuthSession = octogate::utils::crypto::decrypt_data(
        session_cookie.value(),
        session_manager.encryption_key(),
    )
    .expect("session cookie should decrypt");

    assert_eq!(session.username, "Guest");
    assert_eq!(session.user_id, None);
    assert_eq!(session.email, None);
}

#[actix_web::test]
async fn test_logout_clears_session_and_redirects_home() {
    let settings = test_settings("http://github.test");
    let session_manager = SessionManager::from_settings(&settings);
    let cookie = session_manager
        .create_session_cookie(&alice_session())
        .expect("should seal session cookie");

    let app = test_app!(&settings);
    let req = test::TestRequest::get()
        .uri("/logout")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location_of(&resp), "/");

    let cleared = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .expect("logout should overwrite the session cookie")
        .into_owned();
    assert_eq!(cleared.value(), "");
    assert!(
        cleared.max_age().expect("cleared cookie should carry Max-Age").whole_seconds() < 0,
        "cleared cookie must expire immediately"
    );

    // Whatever the browser still carries after logout no longer logs in
    let req = test::TestRequest::get().uri("/").cookie(cleared).to_request();
    let resp = test::call_service(&app, req).await;
    let body = String::from_utf8_lossy(&test::read_body(resp).await).to_string();
    assert!(body.contains("Login with GitHub"));
    assert!(!body.contains("Welcome,"));
}

#[actix_web::test]
async fn test_logout_without_session_is_idempotent() {
    let settings = test_settings("http://github.test");
    let app = test_app!(&settings);

    let req = test::TestRequest::get().uri("/logout").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location_of(&resp), "/");
}

#[actix_web::test]
async fn test_full_round_trip_restores_identical_logged_out_page() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "gho_roundtrip"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": "alice",
            "id": 42,
            "email": null
        })))
        .mount(&server)
        .await;

    let settings = test_settings(&server.uri());
    let app = test_app!(&settings);

    // Fresh visit, logged out
    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    let fresh_page = test::read_body(resp).await;

    // Log in through the callback
    let req = test::TestRequest::get()
        .uri("/github_callback?code=some-code")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    let session_cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .expect("callback should set the session cookie")
        .into_owned();

    // Log out again
    let req = test::TestRequest::get()
        .uri("/logout")
        .cookie(session_cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    let cleared = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .expect("logout should overwrite the session cookie")
        .into_owned();

    // The page after the whole trip is byte-identical to the fresh one
    let req = test::TestRequest::get().uri("/").cookie(cleared).to_request();
    let resp = test::call_service(&app, req).await;
    let after_trip_page = test::read_body(resp).await;

    assert_eq!(fresh_page, after_trip_page);
}

#[actix_web::test]
async fn test_ping_health_check() {
    let settings = test_settings("http://github.test");
    let app = test_app!(&settings);

    let req = test::TestRequest::get().uri("/ping").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}
