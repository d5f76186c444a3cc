//! Route definitions for the `/articles` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::articles;
use crate::state::AppState;

/// Routes mounted at `/articles`.
///
/// ```text
/// GET  /        -> list_articles
/// POST /        -> create_article (admin)
/// GET  /{slug}  -> get_article
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(articles::list_articles).post(articles::create_article),
        )
        .route("/{slug}", get(articles::get_article))
}
