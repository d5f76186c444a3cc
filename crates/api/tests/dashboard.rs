//! Integration tests for `GET /api/dashboard`.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, user_with_token};
use cybersim_db::models::lab_progress::RecordCompletion;
use cybersim_db::repositories::LabProgressRepo;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn new_user_is_recruit(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "rookie").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/dashboard", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["total_labs"], 8);
    assert_eq!(json["data"]["completed_labs"], 0);
    assert_eq!(json["data"]["total_score"], 0);
    assert_eq!(json["data"]["rank"], "Recruit");
    assert_eq!(json["data"]["next_rank_at"], 300);
    assert_eq!(json["data"]["recent_activity"], serde_json::json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stats_follow_completions(pool: PgPool) {
    let (user, token) = user_with_token(&pool, "veteran").await;
    let completions = [
        ("xss", "attack", 100),
        ("sql-injection", "attack", 100),
        ("command-injection", "attack", 100),
        ("directory-traversal", "attack", 100),
        ("system-hardening", "defense", 150),
        ("web-app-testing", "defense", 170),
    ];
    for (slug, category, score) in completions {
        let input = RecordCompletion {
            lab_slug: slug.to_string(),
            category: category.to_string(),
            score,
        };
        LabProgressRepo::record(&pool, user.id, &input).await.unwrap();
    }
    let app = common::build_test_app(pool);

    let json = body_json(get_auth(app, "/api/dashboard", &token).await).await;
    assert_eq!(json["data"]["completed_labs"], 6);
    assert_eq!(json["data"]["attack_labs_completed"], 4);
    assert_eq!(json["data"]["defense_labs_completed"], 2);
    assert_eq!(json["data"]["total_score"], 720);
    assert_eq!(json["data"]["rank"], "Operative");
    assert_eq!(json["data"]["next_rank_at"], 1200);
    assert_eq!(json["data"]["recent_activity"].as_array().unwrap().len(), 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dashboard_requires_auth(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/api/dashboard").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
