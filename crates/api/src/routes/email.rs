//! Route definitions for support tickets.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::email;
use crate::state::AppState;

/// Routes mounted at `/email`. All require auth.
///
/// ```text
/// POST /send                              -> send_ticket
/// GET  /tickets                           -> list_tickets
/// GET  /ticket/{ticket_number}            -> get_ticket (owner or admin)
/// POST /ticket/{ticket_number}/response   -> add_response (admin)
/// POST /ticket/{ticket_number}/close      -> close_ticket (owner)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/send", post(email::send_ticket))
        .route("/tickets", get(email::list_tickets))
        .route("/ticket/{ticket_number}", get(email::get_ticket))
        .route("/ticket/{ticket_number}/response", post(email::add_response))
        .route("/ticket/{ticket_number}/close", post(email::close_ticket))
}
