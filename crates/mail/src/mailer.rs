//! Mail transport abstraction and its two implementations.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tokio::sync::Mutex;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// A sender, recipient or reply-to address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// SmtpConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Connection settings for the SMTP relay.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
}

impl SmtpConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` unless the host and both credentials are set, in
    /// which case the caller should fall back to [`LogMailer`].
    ///
    /// | Variable        | Required | Default |
    /// |-----------------|----------|---------|
    /// | `SMTP_HOST`     | yes      |         |
    /// | `SMTP_PORT`     | no       | `587`   |
    /// | `SMTP_USER`     | yes      |         |
    /// | `SMTP_PASSWORD` | yes      |         |
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());
        Some(Self {
            host: var("SMTP_HOST")?,
            port: var("SMTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            user: var("SMTP_USER")?,
            password: var("SMTP_PASSWORD")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Message + trait
// ---------------------------------------------------------------------------

/// A fully rendered HTML email ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;

    /// Short label for startup logging.
    fn kind(&self) -> &'static str;
}

// ---------------------------------------------------------------------------
// SmtpMailer
// ---------------------------------------------------------------------------

/// Sends email through an SMTP relay with STARTTLS.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(
                config.user.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { transport })
    }
}

/// Assemble the MIME message for an [`OutgoingEmail`].
fn build_message(email: &OutgoingEmail) -> Result<Message, MailError> {
    let mut builder = Message::builder()
        .from(email.from.parse()?)
        .to(email.to.parse()?)
        .subject(email.subject.clone())
        .header(ContentType::TEXT_HTML);
    if let Some(reply_to) = &email.reply_to {
        builder = builder.reply_to(reply_to.parse()?);
    }
    builder
        .body(email.html.clone())
        .map_err(|e| MailError::Build(e.to_string()))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let message = build_message(email)?;
        self.transport.send(message).await?;
        tracing::info!(to = %email.to, subject = %email.subject, "Email sent");
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "smtp"
    }
}

// ---------------------------------------------------------------------------
// LogMailer
// ---------------------------------------------------------------------------

/// Logs outgoing email instead of sending it and keeps a copy in memory.
#[derive(Default)]
pub struct LogMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl LogMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every email "sent" so far, oldest first.
    pub async fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        // Same validation as the SMTP path so bad addresses surface in dev too.
        build_message(email)?;
        tracing::info!(
            to = %email.to,
            from = %email.from,
            subject = %email.subject,
            "Email would be sent (no SMTP relay configured)"
        );
        self.sent.lock().await.push(email.clone());
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "log"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn email(to: &str) -> OutgoingEmail {
        OutgoingEmail {
            from: "noreply@cybersim.com".into(),
            to: to.into(),
            reply_to: Some("ada@example.com".into()),
            subject: "Support Ticket Created: CSE-2026-1001".into(),
            html: "<p>hello</p>".into(),
        }
    }

    fn smtp_from(vars: &[(&str, &str)]) -> Option<SmtpConfig> {
        SmtpConfig::from_lookup(|name| {
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        })
    }

    #[test]
    fn smtp_config_requires_credentials() {
        assert!(smtp_from(&[("SMTP_HOST", "smtp.example.com")]).is_none());
        assert!(smtp_from(&[("SMTP_HOST", "smtp.example.com"), ("SMTP_USER", "mailer")]).is_none());
        assert!(smtp_from(&[
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_USER", "mailer"),
            ("SMTP_PASSWORD", ""),
        ])
        .is_none());
        assert!(smtp_from(&[("SMTP_USER", "mailer"), ("SMTP_PASSWORD", "secret")]).is_none());

        let config = smtp_from(&[
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_USER", "mailer"),
            ("SMTP_PASSWORD", "secret"),
        ])
        .unwrap();
        assert_eq!(config.port, DEFAULT_SMTP_PORT);
        assert_eq!(config.user, "mailer");
    }

    #[test]
    fn smtp_config_reads_port() {
        let config = smtp_from(&[
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_PORT", "2525"),
            ("SMTP_USER", "mailer"),
            ("SMTP_PASSWORD", "secret"),
        ])
        .unwrap();
        assert_eq!(config.port, 2525);
    }

    #[tokio::test]
    async fn log_mailer_records_messages() {
        let mailer = LogMailer::new();
        mailer.send(&email("ada@example.com")).await.unwrap();
        mailer.send(&email("support@cybersim.com")).await.unwrap();

        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].to, "support@cybersim.com");
        assert_eq!(mailer.kind(), "log");
    }

    #[tokio::test]
    async fn log_mailer_rejects_bad_address() {
        let mailer = LogMailer::new();
        let err = mailer.send(&email("not-an-email")).await.unwrap_err();
        assert_matches!(err, MailError::Address(_));
        assert!(mailer.sent().await.is_empty());
    }

    #[test]
    fn message_carries_reply_to() {
        let message = build_message(&email("ada@example.com")).unwrap();
        let headers = String::from_utf8(message.formatted()).unwrap();
        assert!(headers.contains("Reply-To: ada@example.com"));
        assert!(headers.contains("Content-Type: text/html"));
    }

    #[test]
    fn mail_error_display_build() {
        let err = MailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }
}
