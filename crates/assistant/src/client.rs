//! HTTP client for the `generateContent` endpoint.

use serde::{Deserialize, Serialize};

use crate::config::AssistantConfig;

/// Prompt sent by the health probe.
const PROBE_PROMPT: &str = "Say hello in one word";

/// Header carrying the API key. The key never goes into the URL, so
/// transport errors cannot echo it.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Errors from the generative API layer.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    /// No API key is configured.
    #[error("AI service not configured")]
    NotConfigured,

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("Generative API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The response carried no candidate text.
    #[error("Generative API returned no text")]
    EmptyResponse,
}

impl From<reqwest::Error> for AssistantError {
    fn from(err: reqwest::Error) -> Self {
        AssistantError::Request(err.without_url())
    }
}

impl AssistantError {
    /// Short description safe to return to API callers. Upstream bodies and
    /// transport details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AssistantError::NotConfigured => "AI service not configured".to_string(),
            AssistantError::Request(err) if err.is_timeout() => {
                "Generative API timed out".to_string()
            }
            AssistantError::Request(_) => "Generative API unreachable".to_string(),
            AssistantError::Api { status, .. } => {
                format!("Generative API returned status {status}")
            }
            AssistantError::EmptyResponse => "Generative API returned no text".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Pull `candidates[0].content.parts[0].text` out of a response body.
fn extract_text(response: GenerateResponse) -> Result<String, AssistantError> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .filter(|t| !t.trim().is_empty())
        .ok_or(AssistantError::EmptyResponse)
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Client for a single generative model.
pub struct GenerativeClient {
    client: reqwest::Client,
    config: AssistantConfig,
}

impl GenerativeClient {
    /// Build a client whose requests are bounded by `config.timeout`.
    pub fn new(config: AssistantConfig) -> Result<Self, AssistantError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Generate a completion for a single prompt string.
    pub async fn generate(&self, prompt: &str) -> Result<String, AssistantError> {
        let key = self
            .config
            .api_key
            .as_deref()
            .ok_or(AssistantError::NotConfigured)?;

        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        tracing::debug!(model = %self.config.model, prompt_len = prompt.len(), "Calling generative API");

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.config.api_url, self.config.model
            ))
            .header(API_KEY_HEADER, key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AssistantError::Api {
                status: status.as_u16(),
                body,
            });
        }

        extract_text(response.json::<GenerateResponse>().await?)
    }

    /// Send a trivial prompt to confirm the service answers.
    pub async fn probe(&self) -> Result<String, AssistantError> {
        self.generate(PROBE_PROMPT).await
    }
}
