//! Knowledge-base article model and DTOs.

use cybersim_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `articles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Article {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub category: String,
    pub difficulty: String,
    pub description: String,
    pub content: String,
    pub tags: Vec<String>,
    pub read_time: i32,
    pub author: String,
    pub practice_link: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an article. Omitted optional fields take the
/// knowledge-base defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateArticle {
    pub title: String,
    /// Generated from the title if `None`.
    pub slug: Option<String>,
    pub category: String,
    pub difficulty: Option<String>,
    pub description: String,
    pub content: String,
    pub tags: Option<Vec<String>>,
    pub read_time: Option<i32>,
    pub author: Option<String>,
    pub practice_link: Option<String>,
}

/// Filters accepted by the article listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleFilter {
    pub category: Option<String>,
    pub difficulty: Option<String>,
    /// Case-insensitive match against title, description and tags.
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
