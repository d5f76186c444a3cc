use axum::routing::{get, post};
use axum::Router;

use crate::handlers::defense;
use crate::state::AppState;

/// Routes mounted at `/defense`.
///
/// ```text
/// GET  /labs               -> list_labs
/// POST /log                -> log_command (requires auth)
/// GET  /status/{user_id}   -> status (self or admin)
/// POST /reset              -> reset (self or admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/labs", get(defense::list_labs))
        .route("/log", post(defense::log_command))
        .route("/status/{user_id}", get(defense::status))
        .route("/reset", post(defense::reset))
}
