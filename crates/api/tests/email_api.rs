//! HTTP-level integration tests for support tickets and their email.

mod common;

use axum::http::StatusCode;
use chrono::{Datelike, Utc};
use common::{admin_with_token, body_json, get_auth, post_auth, post_json_auth, user_with_token};
use serde_json::json;
use sqlx::PgPool;

fn ticket(subject: &str, priority: &str) -> serde_json::Value {
    json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "subject": subject,
        "message": "The <script> lab output looks wrong",
        "category": "labs",
        "priority": priority,
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_ticket_numbers_and_emails(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "ada").await;
    let (app, mailer) = common::build_test_app_with_mailer(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/email/send",
        ticket("XSS lab", "urgent"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let expected = format!("CSE-{}-1001", Utc::now().year());
    assert_eq!(json["data"]["ticket_number"], expected.as_str());
    assert_eq!(json["data"]["status"], "open");
    assert_eq!(json["data"]["estimated_response"], "2-4 hours");

    let sent = mailer.sent().await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].to, "support@cybersim.test");
    assert_eq!(sent[0].reply_to.as_deref(), Some("ada@example.com"));
    assert_eq!(sent[0].subject, format!("[URGENT] {expected} - XSS lab"));
    assert!(sent[0].html.contains("&lt;script&gt;"));
    assert!(!sent[0].html.contains("<script>"));
    assert_eq!(sent[1].to, "ada@example.com");
    assert_eq!(sent[1].subject, format!("Support Ticket Created: {expected}"));

    let second = post_json_auth(app, "/api/email/send", ticket("Again", "low"), &token).await;
    let json = body_json(second).await;
    assert_eq!(
        json["data"]["ticket_number"],
        format!("CSE-{}-1002", Utc::now().year()).as_str()
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_ticket_requests_return_400(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "ada").await;
    let (app, mailer) = common::build_test_app_with_mailer(pool);

    let mut missing = ticket("", "normal");
    missing["name"] = json!("");
    let response = post_json_auth(app.clone(), "/api/email/send", missing, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Missing required fields: name, subject");

    let mut bad_email = ticket("Hi", "normal");
    bad_email["email"] = json!("ada-at-example");
    let response = post_json_auth(app.clone(), "/api/email/send", bad_email, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut bad_category = ticket("Hi", "normal");
    bad_category["category"] = json!("sales");
    let response = post_json_auth(app, "/api/email/send", bad_category, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(mailer.sent().await.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn tickets_are_private_to_owner(pool: PgPool) {
    let (_owner, owner_token) = user_with_token(&pool, "owner").await;
    let (_other, other_token) = user_with_token(&pool, "snoop").await;
    let app = common::build_test_app(pool);

    let json = body_json(
        post_json_auth(app.clone(), "/api/email/send", ticket("Mine", "normal"), &owner_token).await,
    )
    .await;
    let number = json["data"]["ticket_number"].as_str().unwrap().to_string();
    let uri = format!("/api/email/ticket/{number}");

    let response = get_auth(app.clone(), &uri, &owner_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app.clone(), &uri, &other_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(app.clone(), "/api/email/ticket/CSE-1999-1", &owner_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(get_auth(app, "/api/email/tickets", &other_token).await).await;
    assert_eq!(json["data"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_is_newest_first(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "ada").await;
    let app = common::build_test_app(pool);

    for subject in ["first", "second", "third"] {
        post_json_auth(app.clone(), "/api/email/send", ticket(subject, "normal"), &token).await;
    }

    let json = body_json(get_auth(app, "/api/email/tickets", &token).await).await;
    let subjects: Vec<_> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["subject"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(subjects, ["third", "second", "first"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_response_updates_ticket_and_emails(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "ada").await;
    let (_admin, admin_token) = admin_with_token(&pool, "staff").await;
    let (app, mailer) = common::build_test_app_with_mailer(pool);

    let json = body_json(
        post_json_auth(app.clone(), "/api/email/send", ticket("Broken", "high"), &token).await,
    )
    .await;
    let number = json["data"]["ticket_number"].as_str().unwrap().to_string();
    let uri = format!("/api/email/ticket/{number}/response");
    let body = json!({ "response": "Fixed in the latest build", "status": "resolved" });

    // Regular users cannot respond.
    let response = post_json_auth(app.clone(), &uri, body.clone(), &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(app, &uri, body, &admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "resolved");
    assert_eq!(json["data"]["responses"][0]["responded_by"], "Support Team");
    assert_eq!(json["data"]["responses"][0]["response"], "Fixed in the latest build");

    let sent = mailer.sent().await;
    let last = sent.last().unwrap();
    assert_eq!(last.to, "ada@example.com");
    assert_eq!(last.subject, format!("Re: {number} - Broken"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_owner_can_close(pool: PgPool) {
    let (_owner, owner_token) = user_with_token(&pool, "owner").await;
    let (_admin, admin_token) = admin_with_token(&pool, "staff").await;
    let app = common::build_test_app(pool);

    let json = body_json(
        post_json_auth(app.clone(), "/api/email/send", ticket("Close me", "low"), &owner_token).await,
    )
    .await;
    let number = json["data"]["ticket_number"].as_str().unwrap().to_string();
    let uri = format!("/api/email/ticket/{number}/close");

    let response = post_auth(app.clone(), &uri, &admin_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_auth(app, &uri, &owner_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "closed");
    assert!(json["data"]["closed_at"].is_string());
}
