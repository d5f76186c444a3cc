use std::sync::Arc;

use cybersim_assistant::GenerativeClient;
use cybersim_core::responder::{self, KeywordRouter};
use cybersim_mail::Mailer;

use crate::config::ServerConfig;
use crate::store::{ChatStore, LabStore, TicketStore};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: cybersim_db::DbPool,
    /// Server configuration (JWT settings, mail addresses).
    pub config: Arc<ServerConfig>,
    /// Outgoing email transport (SMTP or log-only).
    pub mailer: Arc<dyn Mailer>,
    /// Generative-text client behind `/ai`.
    pub assistant: Arc<GenerativeClient>,
    /// Canned replies for the live support chat.
    pub support_router: Arc<KeywordRouter>,
    /// Canned replies used when the generative service is unavailable.
    pub assistant_router: Arc<KeywordRouter>,
    pub chat: Arc<ChatStore>,
    pub tickets: Arc<TicketStore>,
    pub labs: Arc<LabStore>,
}

impl AppState {
    /// Assemble state with empty in-memory stores and the built-in keyword
    /// routers.
    pub fn new(
        pool: cybersim_db::DbPool,
        config: ServerConfig,
        mailer: Arc<dyn Mailer>,
        assistant: GenerativeClient,
    ) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            mailer,
            assistant: Arc::new(assistant),
            support_router: Arc::new(responder::support_agent()),
            assistant_router: Arc::new(responder::assistant_fallback()),
            chat: Arc::new(ChatStore::new()),
            tickets: Arc::new(TicketStore::new()),
            labs: Arc::new(LabStore::new()),
        }
    }
}
