//! HTTP-level integration tests for the `/auth` endpoints.
//!
//! Covers registration, login, lockout, token refresh, logout, profile and
//! manual progress reporting.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{
    body_json, get, get_auth, post_json, post_json_auth, user_with_token, TEST_PASSWORD,
};
use cybersim_api::bootstrap::grant_configured_admins;
use cybersim_core::roles::{ROLE_ADMIN, ROLE_USER};
use cybersim_db::repositories::UserRepo;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

async fn login(app: axum::Router, email: &str, password: &str) -> axum::response::Response {
    post_json(
        app,
        "/api/auth/login",
        json!({ "email": email, "password": password }),
    )
    .await
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_returns_201_with_tokens(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({
        "username": "neo",
        "email": "Neo@Matrix.io",
        "password": "followtherabbit",
    });
    let response = post_json(app, "/api/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["data"]["access_token"].is_string());
    assert!(json["data"]["refresh_token"].is_string());
    assert_eq!(json["data"]["expires_in"], 900);
    assert_eq!(json["data"]["user"]["email"], "neo@matrix.io");
    assert_eq!(json["data"]["user"]["role"], "user");
    assert!(json["data"]["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_duplicate_email_returns_409(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = json!({ "username": "trinity", "email": "t@matrix.io", "password": "password123" });

    let first = post_json(app.clone(), "/api/auth/register", body.clone()).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json(app, "/api/auth/register", body).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_rejects_invalid_input(pool: PgPool) {
    let app = common::build_test_app(pool);

    let cases = [
        json!({ "username": "ab", "email": "a@b.co", "password": "password123" }),
        json!({ "username": "morpheus", "email": "not-an-email", "password": "password123" }),
        json!({ "username": "morpheus", "email": "m@b.co", "password": "short" }),
    ];
    for body in cases {
        let response = post_json(app.clone(), "/api/auth/register", body.clone()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn configured_admin_email_registers_as_admin(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({
        "username": "instructor",
        "email": "Instructor@CyberSim.test",
        "password": "teachthelab",
    });
    let response = post_json(app, "/api/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["user"]["role"], ROLE_ADMIN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn configured_admins_are_granted_at_startup(pool: PgPool) {
    let user = common::create_user(&pool, "promoted", ROLE_USER).await;
    let emails = vec!["promoted@test.com".to_string(), "nobody@test.com".to_string()];

    assert_eq!(grant_configured_admins(&pool, &emails).await.unwrap(), 1);
    let row = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(row.role, ROLE_ADMIN);

    // Already admin: nothing changes.
    assert_eq!(grant_configured_admins(&pool, &emails).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn session_stores_user_agent_and_client_address(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let body = json!({ "username": "tracked", "email": "tracked@test.com", "password": "password123" });
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/register")
        .header("Content-Type", "application/json")
        .header("User-Agent", "Mozilla/5.0 (Windows NT 10.0; Win64; x64)")
        .header("X-Forwarded-For", "198.51.100.23, 10.0.0.2")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let user_id = body_json(response).await["data"]["user"]["id"].as_i64().unwrap();

    let (user_agent, ip_address): (Option<String>, Option<String>) = sqlx::query_as(
        "SELECT user_agent, ip_address FROM user_sessions WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(user_agent.as_deref(), Some("Mozilla/5.0 (Windows NT 10.0; Win64; x64)"));
    assert_eq!(ip_address.as_deref(), Some("198.51.100.23"));
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_success_and_wrong_password(pool: PgPool) {
    common::create_user(&pool, "loginuser", ROLE_USER).await;
    let app = common::build_test_app(pool);

    let ok = login(app.clone(), "loginuser@test.com", TEST_PASSWORD).await;
    assert_eq!(ok.status(), StatusCode::OK);
    let json = body_json(ok).await;
    assert_eq!(json["data"]["user"]["username"], "loginuser");

    let bad = login(app.clone(), "loginuser@test.com", "incorrect").await;
    assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);

    let ghost = login(app, "ghost@test.com", TEST_PASSWORD).await;
    assert_eq!(ghost.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_locks_after_five_failures(pool: PgPool) {
    let user = common::create_user(&pool, "locked", ROLE_USER).await;
    let app = common::build_test_app(pool.clone());

    for _ in 0..5 {
        let response = login(app.clone(), "locked@test.com", "wrong-password").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let row = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(row.locked_until.is_some());

    // Even the correct password is refused while locked.
    let response = login(app, "locked@test.com", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Refresh / logout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn refresh_rotates_token(pool: PgPool) {
    common::create_user(&pool, "refresher", ROLE_USER).await;
    let app = common::build_test_app(pool);

    let json = body_json(login(app.clone(), "refresher@test.com", TEST_PASSWORD).await).await;
    let refresh_token = json["data"]["refresh_token"].as_str().unwrap().to_string();

    let response = post_json(
        app.clone(),
        "/api/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let rotated = body_json(response).await;
    assert_ne!(rotated["data"]["refresh_token"], refresh_token.as_str());

    // The old token was revoked by the rotation.
    let reused = post_json(
        app,
        "/api/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(reused.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn logout_revokes_refresh_tokens(pool: PgPool) {
    common::create_user(&pool, "leaver", ROLE_USER).await;
    let app = common::build_test_app(pool);

    let json = body_json(login(app.clone(), "leaver@test.com", TEST_PASSWORD).await).await;
    let access = json["data"]["access_token"].as_str().unwrap().to_string();
    let refresh = json["data"]["refresh_token"].as_str().unwrap().to_string();

    let response = post_json_auth(app.clone(), "/api/auth/logout", json!({}), &access).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(app, "/api/auth/refresh", json!({ "refresh_token": refresh })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Profile / progress
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn profile_requires_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/auth/profile").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app, "/api/auth/profile", "garbage").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn progress_shows_up_in_profile(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "learner").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/auth/progress",
        json!({ "lab_slug": "xss" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["score"], 100);
    assert_eq!(json["data"]["category"], "attack");

    let response = get_auth(app, "/api/auth/profile", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["user"]["username"], "learner");
    assert_eq!(json["data"]["progress"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"]["summary"]["attack_labs_completed"], 1);
    assert_eq!(json["data"]["summary"]["total_score"], 100);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn progress_rejects_bad_lab_or_score(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "cheater").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/auth/progress",
        json!({ "lab_slug": "time-travel" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json_auth(
        app,
        "/api/auth/progress",
        json!({ "lab_slug": "system-hardening", "score": 151 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
