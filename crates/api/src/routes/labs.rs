use axum::routing::{get, post};
use axum::Router;

use crate::handlers::labs;
use crate::state::AppState;

/// Routes mounted at `/labs`.
///
/// ```text
/// GET  /               -> list_labs
/// GET  /{slug}         -> get_session (requires auth)
/// POST /{slug}/start   -> start_lab (requires auth)
/// POST /{slug}/input   -> submit_input (requires auth)
/// POST /{slug}/flag    -> submit_flag (requires auth)
/// POST /{slug}/reset   -> reset_lab (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(labs::list_labs))
        .route("/{slug}", get(labs::get_session))
        .route("/{slug}/start", post(labs::start_lab))
        .route("/{slug}/input", post(labs::submit_input))
        .route("/{slug}/flag", post(labs::submit_flag))
        .route("/{slug}/reset", post(labs::reset_lab))
}
