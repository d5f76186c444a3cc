use axum::routing::{get, post};
use axum::Router;

use crate::handlers::ai;
use crate::state::AppState;

/// Routes mounted at `/ai`.
///
/// ```text
/// POST /chat    -> chat
/// POST /ask     -> ask
/// GET  /health  -> health
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chat", post(ai::chat))
        .route("/ask", post(ai::ask))
        .route("/health", get(ai::health))
}
