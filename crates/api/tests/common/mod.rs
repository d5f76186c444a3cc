#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use cybersim_api::auth::jwt::{generate_access_token, JwtConfig};
use cybersim_api::auth::password::hash_password;
use cybersim_api::config::ServerConfig;
use cybersim_api::router::build_app_router;
use cybersim_api::state::AppState;
use cybersim_assistant::{AssistantConfig, GenerativeClient};
use cybersim_core::roles::{ROLE_ADMIN, ROLE_USER};
use cybersim_db::models::user::{CreateUser, User};
use cybersim_db::repositories::UserRepo;
use cybersim_mail::LogMailer;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hs256".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        support_email: "support@cybersim.test".to_string(),
        email_from: "noreply@cybersim.test".to_string(),
        admin_emails: vec!["instructor@cybersim.test".to_string()],
    }
}

/// Build the full application router and return the in-memory mailer so
/// tests can inspect outgoing email. The assistant has no API key, so every
/// `/ai` reply comes from the fallback table.
pub fn build_test_app_with_mailer(pool: PgPool) -> (Router, Arc<LogMailer>) {
    build_test_app_with_assistant(pool, AssistantConfig::disabled())
}

/// Build the application with a specific assistant configuration, e.g. a
/// key pointed at an unreachable host.
pub fn build_test_app_with_assistant(
    pool: PgPool,
    assistant: AssistantConfig,
) -> (Router, Arc<LogMailer>) {
    let config = test_config();
    let mailer = Arc::new(LogMailer::new());
    let assistant = GenerativeClient::new(assistant).expect("assistant client should build");

    let state = AppState::new(pool, config.clone(), mailer.clone(), assistant);
    (build_app_router(state, &config), mailer)
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_mailer(pool).0
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

/// Insert a user directly with [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, username: &str, role: &'static str) -> User {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role,
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Sign an access token for `user` with the test config.
pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &user.role, &test_config().jwt).expect("token should sign")
}

/// Create a regular user and return it with an access token.
pub async fn user_with_token(pool: &PgPool, username: &str) -> (User, String) {
    let user = create_user(pool, username, ROLE_USER).await;
    let token = token_for(&user);
    (user, token)
}

/// Create an admin and return it with an access token.
pub async fn admin_with_token(pool: &PgPool, username: &str) -> (User, String) {
    let user = create_user(pool, username, ROLE_ADMIN).await;
    let token = token_for(&user);
    (user, token)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
