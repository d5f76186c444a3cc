use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify seed data.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    cybersim_db::health_check(&pool).await.unwrap();

    let roles: Vec<(i64, String)> = sqlx::query_as("SELECT id, name FROM roles ORDER BY id")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(
        roles,
        vec![(1, "admin".to_string()), (2, "user".to_string())]
    );

    let articles: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM articles")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(articles.0, 10, "knowledge base should ship with 10 articles");
}

/// Seeded article slugs are unique and every seeded article has content.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_seed_articles_well_formed(pool: PgPool) {
    let empty: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM articles WHERE length(content) = 0 OR length(description) = 0",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(empty.0, 0);

    let distinct: (i64,) = sqlx::query_as("SELECT COUNT(DISTINCT slug) FROM articles")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(distinct.0, 10);
}
