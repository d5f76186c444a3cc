use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::chat;
use crate::state::AppState;

/// Routes mounted at `/chat`. All require auth.
///
/// ```text
/// GET    /messages/{session_id}  -> get_messages
/// POST   /message                -> send_message
/// DELETE /session/{session_id}   -> clear_session
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/messages/{session_id}", get(chat::get_messages))
        .route("/message", post(chat::send_message))
        .route("/session/{session_id}", delete(chat::clear_session))
}
