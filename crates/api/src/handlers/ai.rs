//! Handlers for the `/ai` assistant proxy.
//!
//! Replies come from the generative API when it is configured and
//! reachable. Otherwise the assistant keyword router answers and the
//! response is marked `fallback`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use cybersim_assistant::prompt::{chat_prompt, tutor_prompt};
use cybersim_assistant::{AssistantError, ChatTurn};
use cybersim_core::types::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, alias = "conversationHistory")]
    pub conversation_history: Vec<ChatTurn>,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub fallback: bool,
    pub timestamp: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AskReply {
    pub answer: String,
    pub fallback: bool,
}

#[derive(Debug, Serialize)]
pub struct AssistantHealth {
    /// `operational`, `unconfigured` or `error`.
    pub status: &'static str,
    pub model: String,
    pub api_key_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Ask the generative API, falling back to the keyword table on any
/// failure. Returns the text and whether the fallback answered.
async fn generate_or_fallback(state: &AppState, prompt: &str, message: &str) -> (String, bool) {
    match state.assistant.generate(prompt).await {
        Ok(text) => (text, false),
        Err(err) => {
            match &err {
                AssistantError::NotConfigured => {
                    tracing::debug!("Generative API not configured, using fallback")
                }
                other => tracing::warn!(error = %other, "Generative API call failed, using fallback"),
            }
            (state.assistant_router.route(message).text, true)
        }
    }
}

/// POST /api/ai/chat
pub async fn chat(
    State(state): State<AppState>,
    Json(input): Json<ChatRequest>,
) -> AppResult<Json<DataResponse<ChatReply>>> {
    if input.message.trim().is_empty() {
        return Err(AppError::BadRequest("Message is required".into()));
    }

    let prompt = chat_prompt(&input.conversation_history, &input.message);
    let (response, fallback) = generate_or_fallback(&state, &prompt, &input.message).await;

    Ok(Json(DataResponse {
        data: ChatReply {
            response,
            fallback,
            timestamp: Utc::now(),
        },
    }))
}

/// POST /api/ai/ask
pub async fn ask(
    State(state): State<AppState>,
    Json(input): Json<AskRequest>,
) -> AppResult<Json<DataResponse<AskReply>>> {
    if input.question.trim().is_empty() {
        return Err(AppError::BadRequest("Question is required".into()));
    }

    let prompt = tutor_prompt(&input.question, input.context.as_deref());
    let (answer, fallback) = generate_or_fallback(&state, &prompt, &input.question).await;

    Ok(Json(DataResponse {
        data: AskReply { answer, fallback },
    }))
}

/// GET /api/ai/health
///
/// 200 when the service answers a probe or no key is configured, 503 when
/// a configured service fails the probe.
pub async fn health(
    State(state): State<AppState>,
) -> (StatusCode, Json<DataResponse<AssistantHealth>>) {
    let model = state.assistant.model().to_string();

    if !state.assistant.is_configured() {
        let body = AssistantHealth {
            status: "unconfigured",
            model,
            api_key_configured: false,
            test_response: None,
            error: None,
        };
        return (StatusCode::OK, Json(DataResponse { data: body }));
    }

    match state.assistant.probe().await {
        Ok(text) => (
            StatusCode::OK,
            Json(DataResponse {
                data: AssistantHealth {
                    status: "operational",
                    model,
                    api_key_configured: true,
                    test_response: Some(text),
                    error: None,
                },
            }),
        ),
        Err(err) => {
            tracing::warn!(error = %err, "Generative API health probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(DataResponse {
                    data: AssistantHealth {
                        status: "error",
                        model,
                        api_key_configured: true,
                        test_response: None,
                        error: Some(err.public_message()),
                    },
                }),
            )
        }
    }
}
