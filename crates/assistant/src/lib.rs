//! Client for the hosted generative-text API behind the AI assistant.
//!
//! The assistant is optional: without an API key [`GenerativeClient`]
//! reports itself unconfigured and callers answer from the local keyword
//! table instead.

pub mod client;
pub mod config;
pub mod prompt;

pub use client::{AssistantError, GenerativeClient};
pub use config::AssistantConfig;
pub use prompt::{ChatTurn, Speaker};
