use std::collections::HashMap;

use chrono::Utc;
use cybersim_core::responder::SUPPORT_AGENT_NAME;
use cybersim_core::types::{DbId, Timestamp};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Agent,
}

/// One line of a support chat.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub sender: Sender,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<&'static str>,
    pub timestamp: Timestamp,
}

impl ChatMessage {
    pub fn from_user(user_id: DbId, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: Sender::User,
            text: text.into(),
            user_id: Some(user_id),
            agent_name: None,
            timestamp: Utc::now(),
        }
    }

    pub fn from_agent(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: Sender::Agent,
            text: text.into(),
            user_id: None,
            agent_name: Some(SUPPORT_AGENT_NAME),
            timestamp: Utc::now(),
        }
    }
}

/// Chat transcripts keyed by client-chosen session id.
#[derive(Debug, Default)]
pub struct ChatStore {
    sessions: RwLock<HashMap<String, Vec<ChatMessage>>>,
}

impl ChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages in a session, oldest first. Unknown sessions are empty.
    pub async fn messages(&self, session_id: &str) -> Vec<ChatMessage> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Append messages to a session, creating it on first use.
    pub async fn append(&self, session_id: &str, messages: impl IntoIterator<Item = ChatMessage>) {
        self.sessions
            .write()
            .await
            .entry(session_id.to_string())
            .or_default()
            .extend(messages);
    }

    /// Drop a session. Returns `true` if it existed.
    pub async fn clear(&self, session_id: &str) -> bool {
        self.sessions.write().await.remove(session_id).is_some()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
