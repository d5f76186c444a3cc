use std::time::Duration;

/// Default model used when `GEMINI_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "gemini-pro";

/// Default base URL of the generative language API.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Generative API settings.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// `None` disables the external call entirely.
    pub api_key: Option<String>,
    pub model: String,
    pub api_url: String,
    pub timeout: Duration,
}

impl AssistantConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable              | Required | Default                                            |
    /// |-----------------------|----------|----------------------------------------------------|
    /// | `GEMINI_API_KEY`      | no       | unset (fallback answers only)                      |
    /// | `GEMINI_MODEL`        | no       | `gemini-pro`                                       |
    /// | `GEMINI_API_URL`      | no       | `https://generativelanguage.googleapis.com/v1beta` |
    /// | `GEMINI_TIMEOUT_SECS` | no       | `30`                                               |
    pub fn from_env() -> Self {
        let timeout_secs: u64 = std::env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            api_url: std::env::var("GEMINI_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Configuration with no API key, used by tests and offline runs.
    pub fn disabled() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
