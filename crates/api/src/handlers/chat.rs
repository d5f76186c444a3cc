//! Handlers for the live support chat (`/chat`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::store::ChatMessage;

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    #[serde(alias = "sessionId")]
    pub session_id: String,
    pub message: String,
}

/// The user's message and the agent's reply, in order.
#[derive(Debug, Serialize)]
pub struct Exchange {
    pub user_message: ChatMessage,
    pub agent_message: ChatMessage,
}

/// GET /api/chat/messages/{session_id}
///
/// Unknown sessions return an empty list.
pub async fn get_messages(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(session_id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<ChatMessage>>>> {
    let messages = state.chat.messages(&session_id).await;
    Ok(Json(DataResponse { data: messages }))
}

/// POST /api/chat/message
///
/// Append the user's message, route it through the support agent table and
/// append the reply.
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<SendMessageRequest>,
) -> AppResult<Json<DataResponse<Exchange>>> {
    if input.session_id.trim().is_empty() || input.message.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Session ID and message are required".into(),
        ));
    }

    let reply = state.support_router.route(&input.message);
    let user_message = ChatMessage::from_user(auth.user_id, input.message);
    let agent_message = ChatMessage::from_agent(reply.text);

    state
        .chat
        .append(
            &input.session_id,
            [user_message.clone(), agent_message.clone()],
        )
        .await;

    tracing::debug!(
        user_id = auth.user_id,
        session_id = %input.session_id,
        rule = reply.rule.unwrap_or("default"),
        "Chat message answered",
    );

    Ok(Json(DataResponse {
        data: Exchange {
            user_message,
            agent_message,
        },
    }))
}

/// DELETE /api/chat/session/{session_id}
///
/// Always 204, whether or not the session existed.
pub async fn clear_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<String>,
) -> AppResult<StatusCode> {
    let existed = state.chat.clear(&session_id).await;
    tracing::info!(user_id = auth.user_id, %session_id, existed, "Chat session cleared");
    Ok(StatusCode::NO_CONTENT)
}
