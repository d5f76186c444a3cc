//! HTTP-level integration tests for the `/ai` assistant proxy.
//!
//! The test app has no generative API key, so every reply comes from the
//! fallback keyword table.

mod common;

use axum::http::StatusCode;
use std::time::Duration;

use common::{body_json, get, post_json};
use cybersim_assistant::AssistantConfig;
use cybersim_core::responder::{ASSISTANT_LABS, ASSISTANT_SQL_INJECTION};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn chat_falls_back_without_api_key(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({
        "message": "Which lab should I try first?",
        "conversation_history": [
            { "type": "user", "text": "hi" },
            { "type": "bot", "text": "Hello!" },
        ],
    });
    let response = post_json(app, "/api/ai/chat", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["fallback"], true);
    assert_eq!(json["data"]["response"], ASSISTANT_LABS);
    assert!(json["data"]["timestamp"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sql_wins_over_other_keywords(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({ "message": "My account has a lab about SQL, any error tips?" });
    let json = body_json(post_json(app, "/api/ai/chat", body).await).await;
    assert_eq!(json["data"]["response"], ASSISTANT_SQL_INJECTION);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_message_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/ai/chat", json!({ "message": "" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ask_falls_back_without_api_key(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({ "question": "Explain blind SQL injection", "context": "sql-injection" });
    let response = post_json(app, "/api/ai/ask", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["fallback"], true);
    assert_eq!(json["data"]["answer"], ASSISTANT_SQL_INJECTION);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_reports_unconfigured(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/api/ai/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "unconfigured");
    assert_eq!(json["data"]["api_key_configured"], false);
    assert_eq!(json["data"]["model"], "gemini-pro");
}

fn unreachable_assistant() -> AssistantConfig {
    AssistantConfig {
        api_key: Some("SUPERSECRETKEY123".into()),
        model: "gemini-pro".into(),
        api_url: "http://127.0.0.1:9".into(),
        timeout: Duration::from_secs(2),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_failure_does_not_expose_api_key(pool: PgPool) {
    let (app, _mailer) = common::build_test_app_with_assistant(pool, unreachable_assistant());

    let response = get(app, "/api/ai/health").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "error");
    assert_eq!(json["data"]["api_key_configured"], true);
    assert_eq!(json["data"]["error"], "Generative API unreachable");
    assert!(!json.to_string().contains("SUPERSECRETKEY123"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unreachable_service_falls_back(pool: PgPool) {
    let (app, _mailer) = common::build_test_app_with_assistant(pool, unreachable_assistant());

    let body = json!({ "message": "Which lab should I try first?" });
    let json = body_json(post_json(app, "/api/ai/chat", body).await).await;
    assert_eq!(json["data"]["fallback"], true);
    assert_eq!(json["data"]["response"], ASSISTANT_LABS);
}
