//! Prompt construction for the chat and tutor endpoints.

use serde::Deserialize;

/// Number of prior conversation turns included in a chat prompt.
pub const MAX_HISTORY_TURNS: usize = 5;

/// Persona and catalog description prepended to every chat prompt.
pub const SYSTEM_CONTEXT: &str = "You are CyberSim AI Assistant, a helpful and knowledgeable cybersecurity training assistant. You help users with:

1. Training Labs - Guide users through attack and defense simulations
2. Account Issues - Help with login, password, and profile problems
3. Technical Support - Troubleshoot bugs and errors
4. Learning Resources - Explain cybersecurity concepts and techniques
5. Progress Tracking - Help users understand their learning progress

Available Labs:
ATTACK LABS:
- SQL Injection - Learn database attack techniques
- Cross-Site Scripting (XSS) - Exploit client-side vulnerabilities
- Command Injection - Execute arbitrary system commands
- Directory Traversal - Access unauthorized files

DEFENSE LABS:
- System Hardening - Secure Linux systems
- Network Security - Configure firewalls and IDS
- Incident Response - Handle security incidents
- Web App Testing - Test application security

Be helpful, concise, and provide actionable advice. Keep responses under 200 words unless explaining complex topics.";

/// Who said a line in the conversation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    /// Anything other than `user` is treated as the assistant.
    #[serde(other)]
    Assistant,
}

/// One prior line of conversation as sent by the chat widget.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatTurn {
    #[serde(rename = "type", alias = "sender")]
    pub speaker: Speaker,
    pub text: String,
}

/// Build the chat prompt: persona, the last [`MAX_HISTORY_TURNS`] turns,
/// then the new message with an open `Assistant:` line.
pub fn chat_prompt(history: &[ChatTurn], message: &str) -> String {
    let mut prompt = String::with_capacity(SYSTEM_CONTEXT.len() + message.len() + 256);
    prompt.push_str(SYSTEM_CONTEXT);
    prompt.push_str("\n\n");

    let start = history.len().saturating_sub(MAX_HISTORY_TURNS);
    for turn in &history[start..] {
        let who = match turn.speaker {
            Speaker::User => "User",
            Speaker::Assistant => "Assistant",
        };
        prompt.push_str(who);
        prompt.push_str(": ");
        prompt.push_str(&turn.text);
        prompt.push('\n');
    }

    prompt.push_str("User: ");
    prompt.push_str(message);
    prompt.push_str("\nAssistant:");
    prompt
}

/// Build the tutor prompt for a single question, focused on `context`.
pub fn tutor_prompt(question: &str, context: Option<&str>) -> String {
    let focus = context
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or("general cybersecurity concepts");
    format!(
        "You are a cybersecurity tutor for CyberSim, an educational platform.\n\
         Your role is to help students learn cybersecurity concepts through practical simulations.\n\
         Be concise, educational, and encouraging. Provide hints rather than direct answers when appropriate.\n\
         Focus on: {focus}\n\n\
         Student question: {question}"
    )
}
