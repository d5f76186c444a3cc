pub mod ai;
pub mod articles;
pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod defense;
pub mod email;
pub mod health;
pub mod labs;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                            register (public)
/// /auth/login                               login (public)
/// /auth/refresh                             refresh (public)
/// /auth/logout                              logout (requires auth)
/// /auth/profile                             profile (requires auth)
/// /auth/progress                            record lab completion (requires auth)
///
/// /articles                                 list (public), create (admin)
/// /articles/{slug}                          get (public)
///
/// /ai/chat                                  assistant chat (public)
/// /ai/ask                                   tutor question (public)
/// /ai/health                                generative API status (public)
///
/// /chat/messages/{session_id}               transcript (requires auth)
/// /chat/message                             send message (requires auth)
/// /chat/session/{session_id}                clear session (requires auth)
///
/// /email/send                               create ticket (requires auth)
/// /email/tickets                            caller's tickets (requires auth)
/// /email/ticket/{ticket_number}             get ticket (owner or admin)
/// /email/ticket/{ticket_number}/response    add response (admin)
/// /email/ticket/{ticket_number}/close       close ticket (owner)
///
/// /labs                                     catalog (public)
/// /labs/{slug}                              session snapshot (requires auth)
/// /labs/{slug}/start                        start (requires auth)
/// /labs/{slug}/input                        send input (requires auth)
/// /labs/{slug}/flag                         submit flag (requires auth)
/// /labs/{slug}/reset                        reset (requires auth)
///
/// /defense/labs                             defense catalog (public)
/// /defense/log                              log a command (requires auth)
/// /defense/status/{user_id}                 status (self or admin)
/// /defense/reset                            reset (self or admin)
///
/// /dashboard                                learner stats (requires auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/articles", articles::router())
        .nest("/ai", ai::router())
        .nest("/chat", chat::router())
        .nest("/email", email::router())
        .nest("/labs", labs::router())
        .nest("/defense", defense::router())
        .nest("/dashboard", dashboard::router())
}
