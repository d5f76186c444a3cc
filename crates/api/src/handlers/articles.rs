//! Handlers for the knowledge-base `/articles` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cybersim_core::articles::{
    self, clamp_limit, clamp_offset, generate_slug, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT,
};
use cybersim_core::error::CoreError;
use cybersim_db::models::article::{Article, ArticleFilter, CreateArticle};
use cybersim_db::repositories::ArticleRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AdminUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Treat blank query parameters as absent.
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// GET /api/articles
///
/// List articles newest first. Supports `category`, `difficulty`, `search`,
/// `limit` and `offset` query parameters.
pub async fn list_articles(
    State(state): State<AppState>,
    Query(filter): Query<ArticleFilter>,
) -> AppResult<Json<DataResponse<Vec<Article>>>> {
    let category = non_blank(&filter.category);
    let difficulty = non_blank(&filter.difficulty);
    let search = non_blank(&filter.search);

    if let Some(category) = category {
        articles::validate_category(category)?;
    }
    if let Some(difficulty) = difficulty {
        articles::validate_difficulty(difficulty)?;
    }

    let limit = clamp_limit(filter.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(filter.offset);

    let items = ArticleRepo::list(&state.pool, category, difficulty, search, limit, offset).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/articles/{slug}
pub async fn get_article(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<Article>>> {
    let article = ArticleRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByKey {
                entity: "Article",
                key: slug,
            })
        })?;
    Ok(Json(DataResponse { data: article }))
}

/// POST /api/articles
///
/// Admin only. The slug is generated from the title when omitted. A
/// duplicate slug is rejected with 409 by the unique constraint.
pub async fn create_article(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(input): Json<CreateArticle>,
) -> AppResult<(StatusCode, Json<DataResponse<Article>>)> {
    articles::validate_title(&input.title)?;
    articles::validate_category(&input.category)?;
    if let Some(difficulty) = &input.difficulty {
        articles::validate_difficulty(difficulty)?;
    }
    articles::validate_description(&input.description)?;
    articles::validate_content(&input.content)?;
    if let Some(tags) = &input.tags {
        articles::validate_tags(tags)?;
    }
    if let Some(read_time) = input.read_time {
        articles::validate_read_time(read_time)?;
    }

    let slug = match &input.slug {
        Some(slug) => slug.trim().to_string(),
        None => generate_slug(&input.title),
    };
    articles::validate_slug(&slug)?;

    let article = ArticleRepo::create(&state.pool, &input, &slug).await?;

    tracing::info!(
        user_id = admin.user_id,
        slug = %article.slug,
        "Article created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: article })))
}
