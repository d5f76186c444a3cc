//! Repository for the `articles` table.

use cybersim_core::articles::{DEFAULT_AUTHOR, DEFAULT_DIFFICULTY, DEFAULT_READ_TIME};
use sqlx::PgPool;

use crate::models::article::{Article, CreateArticle};

const COLUMNS: &str = "id, title, slug, category, difficulty, description, content, tags, \
    read_time, author, practice_link, created_at, updated_at";

/// Provides read and create operations for articles.
pub struct ArticleRepo;

impl ArticleRepo {
    /// Insert an article under `slug`. Omitted optional fields take the
    /// knowledge-base defaults.
    pub async fn create(
        pool: &PgPool,
        input: &CreateArticle,
        slug: &str,
    ) -> Result<Article, sqlx::Error> {
        let query = format!(
            "INSERT INTO articles
                (title, slug, category, difficulty, description, content, tags,
                 read_time, author, practice_link)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(&input.title)
            .bind(slug)
            .bind(&input.category)
            .bind(input.difficulty.as_deref().unwrap_or(DEFAULT_DIFFICULTY))
            .bind(&input.description)
            .bind(&input.content)
            .bind(input.tags.clone().unwrap_or_default())
            .bind(input.read_time.unwrap_or(DEFAULT_READ_TIME))
            .bind(input.author.as_deref().unwrap_or(DEFAULT_AUTHOR))
            .bind(&input.practice_link)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Article>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM articles WHERE slug = $1");
        sqlx::query_as::<_, Article>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List articles newest first, with optional category, difficulty and
    /// free-text filters.
    ///
    /// `search` matches case-insensitively against title, description and
    /// tags. `%` and `_` in the search term are treated literally.
    pub async fn list(
        pool: &PgPool,
        category: Option<&str>,
        difficulty: Option<&str>,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Article>, sqlx::Error> {
        let pattern = search.map(|s| format!("%{}%", escape_like(s)));
        let query = format!(
            "SELECT {COLUMNS} FROM articles
             WHERE ($1::TEXT IS NULL OR category = $1)
               AND ($2::TEXT IS NULL OR difficulty = $2)
               AND ($3::TEXT IS NULL
                    OR title ILIKE $3
                    OR description ILIKE $3
                    OR array_to_string(tags, ' ') ILIKE $3)
             ORDER BY created_at DESC, id DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(category)
            .bind(difficulty)
            .bind(pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}

/// Escape LIKE metacharacters so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
